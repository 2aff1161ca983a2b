use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback receiving one captured line.
pub type LineCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered set of line subscribers.
///
/// Insertion order is notification order and the same callback may be
/// registered more than once. Delivery runs over a snapshot taken before the
/// first callback, and the lock is never held while a callback runs, so
/// callbacks may subscribe or unsubscribe (including themselves) freely.
#[derive(Default)]
pub struct SubscriberSet {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, LineCallback)>>,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: LineCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, callback));
        id
    }

    /// Removes the subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock();
        match entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Calls every subscriber registered at the time of the call, in order.
    pub fn deliver(&self, line: &str) {
        let snapshot: Vec<LineCallback> = self
            .entries
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(line);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> LineCallback {
        let log = Arc::clone(log);
        Arc::new(move |line: &str| log.lock().push(format!("{tag}:{line}")))
    }

    #[test]
    fn delivers_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let set = SubscriberSet::new();
        set.subscribe(recorder(&log, "a"));
        set.subscribe(recorder(&log, "b"));

        set.deliver("x");

        assert_eq!(*log.lock(), vec!["a:x", "b:x"]);
    }

    #[test]
    fn same_callback_twice_is_called_twice() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let set = SubscriberSet::new();
        let callback = recorder(&log, "a");
        set.subscribe(Arc::clone(&callback));
        set.subscribe(callback);

        set.deliver("x");

        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn unsubscribe_twice_is_noop() {
        let set = SubscriberSet::new();
        let id = set.subscribe(Arc::new(|_: &str| {}));
        assert!(set.unsubscribe(id));
        assert!(!set.unsubscribe(id));
        assert!(set.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let set = SubscriberSet::new();
        let a = set.subscribe(Arc::new(|_: &str| {}));
        let b = set.subscribe(Arc::new(|_: &str| {}));
        assert_ne!(a, b);
        assert_eq!(set.len(), 2);
    }
}
