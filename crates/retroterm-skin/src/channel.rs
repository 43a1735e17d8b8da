//! Theme broadcast channel.
//!
//! A named publish/subscribe object handed explicitly to the producer (the
//! `theme` command's effect executor) and to every display consumer. Delivery
//! is a single synchronous call per subscriber present at send time: no
//! queueing, no retry, no replay for late subscribers. The channel keeps no
//! theme value of its own.

use std::cell::{Cell, RefCell};

use crate::theme::Theme;

/// Handle returned by [`ThemeChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Theme)>;

/// Named single-producer, many-consumer theme channel.
pub struct ThemeChannel {
    name: String,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    /// Ids whose listeners are taken out by a send in progress.
    in_flight: RefCell<Vec<SubscriptionId>>,
    /// In-flight ids unsubscribed before their send finished.
    removed_during_send: RefCell<Vec<SubscriptionId>>,
    next_id: Cell<u64>,
}

impl ThemeChannel {
    /// Name used when a session builds its own channel.
    pub const DEFAULT_NAME: &'static str = "theme-change";

    /// Create an empty channel called `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            listeners: RefCell::new(Vec::new()),
            in_flight: RefCell::new(Vec::new()),
            removed_during_send: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Channel name, as configured.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a consumer. It sees every broadcast sent from now on.
    pub fn subscribe(&self, listener: impl FnMut(Theme) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    /// Remove a consumer. Returns `false` for an unknown id.
    ///
    /// Called from inside a broadcast, the removal takes effect when the
    /// send finishes; the listener is not called again.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        if listeners.len() != before {
            return true;
        }
        drop(listeners);
        let mut removed = self.removed_during_send.borrow_mut();
        if !self.in_flight.borrow().contains(&id) || removed.contains(&id) {
            return false;
        }
        removed.push(id);
        true
    }

    /// Deliver `theme` to every current subscriber; returns how many saw it.
    pub fn broadcast(&self, theme: Theme) -> usize {
        // Listeners are taken out for the duration of the send so a listener
        // may subscribe or unsubscribe without a RefCell conflict.
        let mut active = std::mem::take(&mut *self.listeners.borrow_mut());
        let ids: Vec<SubscriptionId> = active.iter().map(|(id, _)| *id).collect();
        self.in_flight.borrow_mut().extend(&ids);
        let mut delivered = 0;
        for (id, listener) in active.iter_mut() {
            if self.removed_during_send.borrow().contains(id) {
                continue;
            }
            listener(theme);
            delivered += 1;
        }

        let mut in_flight = self.in_flight.borrow_mut();
        in_flight.retain(|id| !ids.contains(id));
        let mut removed = self.removed_during_send.borrow_mut();
        active.retain(|(id, _)| !removed.contains(id));
        // Removals aimed at an enclosing send stay pending for it.
        removed.retain(|id| in_flight.contains(id));
        drop(removed);
        drop(in_flight);

        let mut listeners = self.listeners.borrow_mut();
        let added_during_send = std::mem::take(&mut *listeners);
        *listeners = active;
        listeners.extend(added_during_send);
        drop(listeners);

        log::debug!(
            "Channel '{}' broadcast {theme} to {delivered} subscriber(s)",
            self.name
        );
        delivered
    }

    /// Number of registered consumers.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Default for ThemeChannel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl std::fmt::Debug for ThemeChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeChannel")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn recorder(channel: &ThemeChannel) -> Rc<RefCell<Vec<Theme>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        channel.subscribe(move |t| sink.borrow_mut().push(t));
        seen
    }

    #[test]
    fn every_subscriber_gets_one_delivery() {
        let channel = ThemeChannel::default();
        let a = recorder(&channel);
        let b = recorder(&channel);
        assert_eq!(channel.broadcast(Theme::Blue), 2);
        assert_eq!(*a.borrow(), vec![Theme::Blue]);
        assert_eq!(*b.borrow(), vec![Theme::Blue]);
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let channel = ThemeChannel::default();
        channel.broadcast(Theme::Red);
        let late = recorder(&channel);
        assert!(late.borrow().is_empty());
        channel.broadcast(Theme::Amber);
        assert_eq!(*late.borrow(), vec![Theme::Amber]);
    }

    #[test]
    fn broadcast_without_subscribers_is_harmless() {
        let channel = ThemeChannel::new("themes");
        assert_eq!(channel.broadcast(Theme::Purple), 0);
        assert_eq!(channel.name(), "themes");
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let channel = ThemeChannel::default();
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        let id = channel.subscribe(move |_| *sink.borrow_mut() += 1);
        channel.broadcast(Theme::Blue);
        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        channel.broadcast(Theme::Red);
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn listener_may_subscribe_during_broadcast() {
        let channel = Rc::new(ThemeChannel::default());
        let inner = Rc::clone(&channel);
        let late_hits = Rc::new(RefCell::new(0));
        let hits = Rc::clone(&late_hits);
        let mut armed = true;
        channel.subscribe(move |_| {
            if armed {
                armed = false;
                let hits = Rc::clone(&hits);
                inner.subscribe(move |_| *hits.borrow_mut() += 1);
            }
        });
        assert_eq!(channel.broadcast(Theme::Blue), 1);
        assert_eq!(channel.subscriber_count(), 2);
        assert_eq!(channel.broadcast(Theme::Red), 2);
        assert_eq!(*late_hits.borrow(), 1);
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_broadcast() {
        let channel = Rc::new(ThemeChannel::default());
        let inner = Rc::clone(&channel);
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let slot = Rc::clone(&own_id);
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let removed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&removed);
        let id = channel.subscribe(move |_| {
            counter.set(counter.get() + 1);
            if let Some(id) = slot.get() {
                flag.set(inner.unsubscribe(id));
            }
        });
        own_id.set(Some(id));

        assert_eq!(channel.broadcast(Theme::Blue), 1);
        assert!(removed.get());
        assert_eq!(channel.subscriber_count(), 0);
        assert_eq!(channel.broadcast(Theme::Red), 0);
        assert_eq!(hits.get(), 1);
        assert!(!channel.unsubscribe(id));
    }

    #[test]
    fn listener_may_unsubscribe_a_later_listener_mid_send() {
        let channel = Rc::new(ThemeChannel::default());
        let inner = Rc::clone(&channel);
        let victim: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let target = Rc::clone(&victim);
        channel.subscribe(move |_| {
            if let Some(id) = target.take() {
                assert!(inner.unsubscribe(id));
            }
        });
        let seen = recorder(&channel);
        // The recorder was the second subscription.
        victim.set(Some(SubscriptionId(1)));

        assert_eq!(channel.broadcast(Theme::Amber), 1);
        assert!(seen.borrow().is_empty());
        assert_eq!(channel.subscriber_count(), 1);
    }
}
