// ============================================================================
// REACTIVITY - observable state with subscribers
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// Shared state that notifies its subscribers after every change.
///
/// Clones share both the value and the subscriber list.
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<(usize, Callback)>>>,
    next_id: Rc<RefCell<usize>>,
}

/// Handle returned by `subscribe`, used to stop listening
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Subscription(usize);

impl<T> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(RefCell::new(0)),
        }
    }

    /// Reads the value without cloning it
    pub fn with<R>(&self, reader: impl FnOnce(&T) -> R) -> R {
        reader(&self.value.borrow())
    }

    /// Replaces the value and notifies subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Mutates the value in place and notifies subscribers
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        updater(&mut self.value.borrow_mut());
        self.notify();
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        let id = {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            *next
        };
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        Subscription(id)
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.subscribers
            .borrow_mut()
            .retain(|(id, _)| *id != subscription.0);
    }

    pub fn clear_subscribers(&self) {
        self.subscribers.borrow_mut().clear();
    }

    fn notify(&self) {
        // Snapshot first: a callback may read the state or (un)subscribe
        let callbacks: Vec<Callback> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl<T: Clone> ReactiveState<T> {
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

impl<T: Default> Default for ReactiveState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn subscribers_see_updates() {
        let state = ReactiveState::new(1);
        let seen = Rc::new(Cell::new(0));

        let reader = state.clone();
        let sink = seen.clone();
        state.subscribe(move || sink.set(reader.get()));

        state.update(|v| *v += 41);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn clones_share_subscribers() {
        let state = ReactiveState::new(String::new());
        let calls = Rc::new(Cell::new(0));
        let sink = calls.clone();
        state.subscribe(move || sink.set(sink.get() + 1));

        let view = state.clone();
        view.set("changed".to_string());
        assert_eq!(calls.get(), 1);
        assert_eq!(state.get(), "changed");
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let state = ReactiveState::new(0u8);
        let calls = Rc::new(Cell::new(0));
        let sink = calls.clone();
        let subscription = state.subscribe(move || sink.set(sink.get() + 1));

        state.set(1);
        state.unsubscribe(subscription);
        state.set(2);
        assert_eq!(calls.get(), 1);
    }
}
