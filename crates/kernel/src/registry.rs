use anyhow::anyhow;
use std::sync::Arc;

use crate::receiver::ReceiverFactory;
use crate::settings::Settings;

/// Static registration of a receiver factory, collected with `inventory`
pub struct FactoryRegistration {
    pub component_type: &'static str,
    pub build: fn(&Settings) -> ReceiverFactory,
}

inventory::collect!(FactoryRegistration);

/// Registry of receiver factories keyed by component type
pub struct FactoryRegistry {
    factories: Vec<Arc<ReceiverFactory>>,
}

impl FactoryRegistry {
    /// Create an empty factory registry
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Build a registry from every factory linked into the binary
    pub fn from_inventory(settings: &Settings) -> anyhow::Result<Self> {
        let mut registry = Self::new();
        let mut registrations: Vec<&FactoryRegistration> =
            inventory::iter::<FactoryRegistration>.into_iter().collect();
        registrations.sort_by_key(|registration| registration.component_type);

        for registration in registrations {
            tracing::debug!(
                component = registration.component_type,
                "registering linked receiver factory"
            );
            registry.register((registration.build)(settings))?;
        }

        Ok(registry)
    }

    /// Register a factory; each component type may only be registered once
    pub fn register(&mut self, factory: ReceiverFactory) -> anyhow::Result<()> {
        let component_type = factory.component_type();
        if self.get(component_type.as_str()).is_some() {
            return Err(anyhow!(
                "receiver factory '{}' is already registered",
                component_type
            ));
        }

        tracing::info!(
            component = %component_type,
            signals = ?factory.signals(),
            "registered receiver factory"
        );
        self.factories.push(Arc::new(factory));
        Ok(())
    }

    /// Get all registered factories in registration order
    pub fn factories(&self) -> impl Iterator<Item = &Arc<ReceiverFactory>> {
        self.factories.iter()
    }

    /// Get a factory by component type
    pub fn get(&self, component_type: &str) -> Option<&Arc<ReceiverFactory>> {
        self.factories
            .iter()
            .find(|factory| factory.component_type().as_str() == component_type)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentConfig, ComponentType};
    use std::any::Any;

    #[derive(Debug)]
    struct EmptyConfig;

    impl ComponentConfig for EmptyConfig {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn factory(name: &'static str) -> ReceiverFactory {
        ReceiverFactory::new(ComponentType::new(name), || Box::new(EmptyConfig))
    }

    #[test]
    fn test_factory_registry_creation() {
        let registry = FactoryRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.factories().count(), 0);
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = FactoryRegistry::new();
        registry.register(factory("first")).unwrap();
        registry.register(factory("second")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("second").is_some());
        assert!(registry.get("missing").is_none());

        let order: Vec<&str> = registry
            .factories()
            .map(|factory| factory.component_type().as_str())
            .collect();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = FactoryRegistry::new();
        registry.register(factory("first")).unwrap();

        let err = registry.register(factory("first")).unwrap_err();
        assert!(err.to_string().contains("already registered"));
        assert_eq!(registry.len(), 1);
    }
}
