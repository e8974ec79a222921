use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// System color-scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }
}

pub type AppearanceListener = Box<dyn Fn(Appearance)>;

/// Ambient source of the system color-scheme preference.
pub trait SystemAppearance {
    /// Current preference, or `None` when the host cannot tell.
    fn current(&self) -> Option<Appearance>;

    /// Registers `listener` for preference changes. The listener stays attached until
    /// the returned subscription is detached or dropped.
    fn subscribe(&self, listener: AppearanceListener) -> AppearanceSubscription;
}

/// Owned registration with a [`SystemAppearance`] source.
#[must_use = "dropping the subscription detaches the listener"]
pub struct AppearanceSubscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl AppearanceSubscription {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Subscription for sources that never report changes.
    pub fn inert() -> Self {
        Self { detach: None }
    }

    pub fn detach(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for AppearanceSubscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

/// Source for hosts without any preference signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAppearance;

impl SystemAppearance for NoAppearance {
    fn current(&self) -> Option<Appearance> {
        None
    }

    fn subscribe(&self, _listener: AppearanceListener) -> AppearanceSubscription {
        AppearanceSubscription::inert()
    }
}

#[derive(Default)]
struct ManualState {
    current: Option<Appearance>,
    listeners: BTreeMap<u64, Rc<dyn Fn(Appearance)>>,
    next_listener_id: u64,
}

/// In-memory preference source that the embedding host drives explicitly.
#[derive(Clone, Default)]
pub struct ManualAppearance {
    state: Rc<RefCell<ManualState>>,
}

impl ManualAppearance {
    pub fn new(current: Option<Appearance>) -> Self {
        let source = Self::default();
        source.state.borrow_mut().current = current;
        source
    }

    /// Updates the preference and notifies every attached listener.
    pub fn set(&self, appearance: Appearance) {
        let listeners = {
            let mut state = self.state.borrow_mut();
            state.current = Some(appearance);
            state.listeners.values().cloned().collect::<Vec<_>>()
        };

        // Listeners run without the borrow held so they may read `current()`.
        for listener in listeners {
            listener(appearance);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

impl SystemAppearance for ManualAppearance {
    fn current(&self) -> Option<Appearance> {
        self.state.borrow().current
    }

    fn subscribe(&self, listener: AppearanceListener) -> AppearanceSubscription {
        let listener_id = {
            let mut state = self.state.borrow_mut();
            let listener_id = state.next_listener_id;
            state.next_listener_id += 1;
            state.listeners.insert(listener_id, Rc::from(listener));
            listener_id
        };

        let state: Weak<RefCell<ManualState>> = Rc::downgrade(&self.state);
        AppearanceSubscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().listeners.remove(&listener_id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn listeners_receive_changes_until_detached() {
        let source = ManualAppearance::new(Some(Appearance::Light));
        let seen = Rc::new(Cell::new(None));

        let seen_by_listener = Rc::clone(&seen);
        let subscription = source.subscribe(Box::new(move |appearance| {
            seen_by_listener.set(Some(appearance));
        }));

        source.set(Appearance::Dark);
        assert_eq!(seen.get(), Some(Appearance::Dark));
        assert_eq!(source.current(), Some(Appearance::Dark));

        subscription.detach();
        assert_eq!(source.listener_count(), 0);

        source.set(Appearance::Light);
        assert_eq!(seen.get(), Some(Appearance::Dark));
    }

    #[test]
    fn dropping_the_subscription_detaches() {
        let source = ManualAppearance::default();
        {
            let _subscription = source.subscribe(Box::new(|_| {}));
            assert_eq!(source.listener_count(), 1);
        }
        assert_eq!(source.listener_count(), 0);
    }
}
