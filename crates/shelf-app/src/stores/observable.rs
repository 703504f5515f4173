//! Observable state cell.
//!
//! A thin wrapper over [`tokio::sync::watch`]: the store keeps the sending
//! half and hands consumers receivers, so consumers can read and await
//! changes but never write.

use tokio::sync::watch;

pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// Holds the channel's read lock while `f` runs, so keep `f` short and
    /// never publish from inside it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Read-only handle that is notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Replace the value and notify subscribers, returning the old value.
    pub fn set(&self, value: T) -> T {
        self.tx.send_replace(value)
    }
}

impl<T: Clone + PartialEq> Observable<T> {
    /// Replace the value, notifying subscribers only if it actually changed.
    pub fn set_if_changed(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_returns_previous_value() {
        let cell = Observable::new(1);
        assert_eq!(cell.set(2), 1);
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn test_with_reads_current_value_in_place() {
        let cell = Observable::new(vec![1, 2, 3]);
        assert_eq!(cell.with(|v| v.iter().sum::<i32>()), 6);

        cell.set(vec![4]);
        assert_eq!(cell.with(|v| v.len()), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let cell = Observable::new(false);
        let mut rx = cell.subscribe();

        cell.set(true);

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }

    #[test]
    fn test_set_if_changed_skips_equal_values() {
        let cell = Observable::new(Some(5));
        let rx = cell.subscribe();

        assert!(!cell.set_if_changed(Some(5)));
        assert!(!rx.has_changed().unwrap());

        assert!(cell.set_if_changed(Some(7)));
        assert!(rx.has_changed().unwrap());
    }
}
