//! Components shared by several pipelines.
//!
//! A receiver that serves more than one signal is created once per distinct
//! configuration and handed to every pipeline that asks for it. Each
//! successful [`SharedComponents::get_or_add_with`] takes a reference on the shared
//! entry. The wrapped component is started on the first `start` and shut down
//! when the last reference is released, at which point the entry is removed.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use anyhow::bail;
use async_trait::async_trait;
use collector_kernel::{Component, HostCtx};

type Entries<K, C> = Mutex<HashMap<K, Arc<SharedComponent<K, C>>>>;

/// Registry of shared components keyed by configuration equality
pub struct SharedComponents<K, C> {
    entries: Arc<Entries<K, C>>,
}

impl<K, C> SharedComponents<K, C>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    C: Component + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Return the component registered for `key`, creating it with `create` if absent.
    ///
    /// The registry lock is held while `create` runs, so concurrent callers with
    /// an equal key observe a single construction. A failed construction is
    /// returned to the caller and leaves no entry behind.
    pub fn get_or_add<F, E>(&self, key: &K, create: F) -> Result<Arc<SharedComponent<K, C>>, E>
    where
        F: FnOnce() -> Result<C, E>,
    {
        self.get_or_add_with(key, create, |_| Ok(()))
    }

    /// Like [`get_or_add`](Self::get_or_add), running `attach` on the component
    /// before a reference is taken.
    ///
    /// `attach` runs under the registry lock. When it fails no reference is
    /// taken and a freshly built component is discarded, so an existing entry
    /// is left exactly as it was.
    pub fn get_or_add_with<F, A, E>(
        &self,
        key: &K,
        create: F,
        attach: A,
    ) -> Result<Arc<SharedComponent<K, C>>, E>
    where
        F: FnOnce() -> Result<C, E>,
        A: FnOnce(&C) -> Result<(), E>,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = entries.get(key) {
            attach(existing.component())?;
            existing.refs.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(
                refs = existing.ref_count(),
                "reusing shared component"
            );
            return Ok(existing.clone());
        }

        let component = create()?;
        attach(&component)?;
        let shared = Arc::new(SharedComponent {
            key: key.clone(),
            component: Arc::new(component),
            refs: AtomicUsize::new(1),
            state: tokio::sync::Mutex::new(Lifecycle::Created),
            entries: Arc::downgrade(&self.entries),
        });
        entries.insert(key.clone(), shared.clone());
        tracing::debug!(shared = entries.len(), "created shared component");

        Ok(shared)
    }

    /// Look up an entry without taking a reference on it
    pub fn get(&self, key: &K) -> Option<Arc<SharedComponent<K, C>>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, C> Default for SharedComponents<K, C>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    C: Component + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> Clone for SharedComponents<K, C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Started,
    Stopped,
}

/// Handle to a component shared between pipelines
pub struct SharedComponent<K, C> {
    key: K,
    component: Arc<C>,
    // Only modified while the registry lock is held.
    refs: AtomicUsize,
    state: tokio::sync::Mutex<Lifecycle>,
    entries: Weak<Entries<K, C>>,
}

impl<K, C> SharedComponent<K, C>
where
    K: Eq + Hash,
{
    /// The wrapped component
    pub fn component(&self) -> &Arc<C> {
        &self.component
    }

    /// Number of outstanding references handed out by `get_or_add_with`
    pub fn ref_count(&self) -> usize {
        self.refs.load(Ordering::SeqCst)
    }

    // Drops one reference and reports whether it was the last; the entry is
    // then removed from its registry. Only `shutdown` calls this, so the last
    // release always stops a started component.
    fn release(&self) -> bool {
        let Some(entries) = self.entries.upgrade() else {
            return self.decrement() == Some(1);
        };
        let mut entries = entries.lock().unwrap_or_else(PoisonError::into_inner);

        if self.decrement() != Some(1) {
            return false;
        }
        if entries
            .get(&self.key)
            .is_some_and(|entry| std::ptr::eq(Arc::as_ptr(entry), self))
        {
            entries.remove(&self.key);
        }
        true
    }

    fn decrement(&self) -> Option<usize> {
        self.refs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |refs| refs.checked_sub(1))
            .ok()
    }
}

#[async_trait]
impl<K, C> Component for SharedComponent<K, C>
where
    K: Eq + Hash + Send + Sync,
    C: Component,
{
    /// Start the wrapped component on the first call; later calls are no-ops
    async fn start(&self, ctx: &HostCtx<'_>) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        if self.ref_count() == 0 {
            bail!("shared component has no references left");
        }
        match *state {
            Lifecycle::Created => {
                self.component.start(ctx).await?;
                *state = Lifecycle::Started;
            }
            Lifecycle::Started => {}
            Lifecycle::Stopped => bail!("shared component was already shut down"),
        }
        Ok(())
    }

    /// Release one reference; the last one shuts the wrapped component down
    async fn shutdown(&self) -> anyhow::Result<()> {
        if !self.release() {
            return Ok(());
        }

        let mut state = self.state.lock().await;
        if *state == Lifecycle::Started {
            self.component.shutdown().await?;
        }
        *state = Lifecycle::Stopped;
        tracing::debug!("shared component shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collector_kernel::settings::Settings;

    #[derive(Default)]
    struct Tracked {
        id: usize,
        started: AtomicUsize,
        stopped: AtomicUsize,
    }

    #[async_trait]
    impl Component for Tracked {
        async fn start(&self, _ctx: &HostCtx<'_>) -> anyhow::Result<()> {
            self.started.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn shutdown(&self) -> anyhow::Result<()> {
            self.stopped.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn tracked(id: usize) -> Result<Tracked, String> {
        Ok(Tracked {
            id,
            ..Default::default()
        })
    }

    #[test]
    fn test_equal_keys_share_one_instance() {
        let shared = SharedComponents::<String, Tracked>::new();

        let first = shared.get_or_add(&"a".to_string(), || tracked(1)).unwrap();
        let second = shared.get_or_add(&"a".to_string(), || tracked(2)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.component().id, 1);
        assert_eq!(first.ref_count(), 2);
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn test_distinct_keys_get_distinct_instances() {
        let shared = SharedComponents::<String, Tracked>::new();

        let first = shared.get_or_add(&"a".to_string(), || tracked(1)).unwrap();
        let second = shared.get_or_add(&"b".to_string(), || tracked(2)).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(first.component(), second.component()));
        assert_eq!(shared.len(), 2);
    }

    #[test]
    fn test_failed_construction_is_not_cached() {
        let shared = SharedComponents::<String, Tracked>::new();

        let result = shared.get_or_add(&"a".to_string(), || Err("boom".to_string()));
        assert_eq!(result.err(), Some("boom".to_string()));
        assert!(shared.is_empty());

        let retried = shared.get_or_add(&"a".to_string(), || tracked(7)).unwrap();
        assert_eq!(retried.component().id, 7);
    }

    #[test]
    fn test_concurrent_callers_construct_once() {
        let shared = SharedComponents::<String, Tracked>::new();
        let constructions = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    shared
                        .get_or_add(&"a".to_string(), || {
                            constructions.fetch_add(1, Ordering::SeqCst);
                            tracked(1)
                        })
                        .unwrap();
                });
            }
        });

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert_eq!(shared.get(&"a".to_string()).unwrap().ref_count(), 8);
    }

    #[test]
    fn test_release_of_last_reference_removes_entry() {
        let shared = SharedComponents::<String, Tracked>::new();
        let handle = shared.get_or_add(&"a".to_string(), || tracked(1)).unwrap();

        assert!(handle.release());
        assert!(shared.is_empty());
        assert!(!handle.release());
    }

    #[tokio::test]
    async fn test_start_once_and_shutdown_on_last_reference() {
        let shared = SharedComponents::<String, Tracked>::new();
        let settings = Settings::default();
        let ctx = HostCtx {
            settings: &settings,
        };

        let traces = shared.get_or_add(&"a".to_string(), || tracked(1)).unwrap();
        let logs = shared.get_or_add(&"a".to_string(), || tracked(2)).unwrap();

        traces.start(&ctx).await.unwrap();
        logs.start(&ctx).await.unwrap();
        assert_eq!(traces.component().started.load(Ordering::SeqCst), 1);

        traces.shutdown().await.unwrap();
        assert_eq!(traces.component().stopped.load(Ordering::SeqCst), 0);
        assert_eq!(shared.len(), 1);

        logs.shutdown().await.unwrap();
        assert_eq!(traces.component().stopped.load(Ordering::SeqCst), 1);
        assert!(shared.is_empty());

        assert!(traces.start(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_without_start_skips_component() {
        let shared = SharedComponents::<String, Tracked>::new();
        let handle = shared.get_or_add(&"a".to_string(), || tracked(1)).unwrap();

        handle.shutdown().await.unwrap();

        assert_eq!(handle.component().stopped.load(Ordering::SeqCst), 0);
        assert!(shared.is_empty());
    }

    #[test]
    fn test_failed_attach_takes_no_reference() {
        let shared = SharedComponents::<String, Tracked>::new();
        let first = shared.get_or_add(&"a".to_string(), || tracked(1)).unwrap();

        let result = shared.get_or_add_with(
            &"a".to_string(),
            || tracked(2),
            |_| Err("already attached".to_string()),
        );

        assert_eq!(result.err(), Some("already attached".to_string()));
        assert_eq!(first.ref_count(), 1);
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn test_failed_attach_discards_fresh_component() {
        let shared = SharedComponents::<String, Tracked>::new();

        let result = shared.get_or_add_with(
            &"a".to_string(),
            || tracked(1),
            |_| Err("rejected".to_string()),
        );

        assert!(result.is_err());
        assert!(shared.is_empty());
    }

    #[tokio::test]
    async fn test_running_component_stops_after_rejected_attach() {
        let shared = SharedComponents::<String, Tracked>::new();
        let settings = Settings::default();
        let ctx = HostCtx {
            settings: &settings,
        };

        let pipeline = shared.get_or_add(&"a".to_string(), || tracked(1)).unwrap();
        pipeline.start(&ctx).await.unwrap();

        let rejected = shared.get_or_add_with(
            &"a".to_string(),
            || tracked(2),
            |_| Err("already attached".to_string()),
        );
        assert!(rejected.is_err());

        pipeline.shutdown().await.unwrap();

        assert_eq!(pipeline.component().started.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.component().stopped.load(Ordering::SeqCst), 1);
        assert!(shared.is_empty());
    }

    #[tokio::test]
    async fn test_start_without_references_is_rejected() {
        let shared = SharedComponents::<String, Tracked>::new();
        let settings = Settings::default();
        let ctx = HostCtx {
            settings: &settings,
        };

        let handle = shared.get_or_add(&"a".to_string(), || tracked(1)).unwrap();
        assert!(handle.release());

        assert!(handle.start(&ctx).await.is_err());
        assert_eq!(handle.component().started.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_new_instance_after_teardown() {
        let shared = SharedComponents::<String, Tracked>::new();
        let old = shared.get_or_add(&"a".to_string(), || tracked(1)).unwrap();
        old.release();

        let fresh = shared.get_or_add(&"a".to_string(), || tracked(2)).unwrap();

        assert!(!Arc::ptr_eq(&old, &fresh));
        assert!(!old.release());
        assert_eq!(shared.len(), 1);
    }
}
