//! Props merged into every rendered page.
//!
//! The registry holds one immutable [`Props`] snapshot behind an atomic
//! pointer. A render loads the current snapshot once and never observes a
//! half-applied registration; a registration clones the snapshot, merges into
//! the clone and swaps it in. Registering while traffic is live is therefore
//! safe, though the common case is registering everything at startup.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::debug;

use crate::props::{PropValue, Props};

pub struct SharedProps {
    current: ArcSwap<Props>,
}

impl SharedProps {
    pub fn new() -> Self {
        Self { current: ArcSwap::from_pointee(Props::new()) }
    }

    /// Sets one shared prop, replacing any previous value under `key`.
    pub fn share(&self, key: impl Into<String>, value: impl Into<PropValue>) {
        let key = key.into();
        let value = value.into();
        debug!(key = %key, "sharing prop");
        self.current.rcu(|current| {
            let mut next = Props::clone(current);
            next.insert(key.clone(), value.clone());
            next
        });
    }

    /// Merges `props` into the shared set with the usual right-biased rules.
    pub fn share_multi(&self, props: Props) {
        debug!(count = props.len(), "sharing props");
        self.current.rcu(|current| {
            let mut next = Props::clone(current);
            next.merge(props.clone());
            next
        });
    }

    /// The snapshot every render of the current request should read.
    pub fn snapshot(&self) -> Arc<Props> {
        self.current.load_full()
    }
}

impl Default for SharedProps {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn share_and_share_multi_accumulate() {
        let shared = SharedProps::new();
        shared.share("app", "demo");
        shared.share_multi(Props::new().with("auth", Props::new().with("user", "alice")));
        shared.share_multi(Props::new().with("auth", Props::new().with("role", "admin")));

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.len(), 2);
        let auth = snapshot.get("auth").and_then(PropValue::as_map).unwrap();
        assert_eq!(auth.len(), 2);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_registration() {
        let shared = SharedProps::new();
        shared.share("a", 1);
        let before = shared.snapshot();
        shared.share("b", 2);

        assert_eq!(before.len(), 1);
        assert_eq!(shared.snapshot().len(), 2);
    }

    #[test]
    fn concurrent_registration_loses_nothing() {
        let shared = Arc::new(SharedProps::new());
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || shared.share(format!("key{i}"), i))
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(shared.snapshot().len(), 8);
    }
}
