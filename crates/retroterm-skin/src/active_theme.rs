//! Runtime theme tracked from the broadcast channel.
//!
//! `ActiveTheme` is the stock display subscriber: it attaches to a
//! [`ThemeChannel`], remembers the most recent theme it was sent and resolves
//! it to a [`Palette`]. Renderers hold an `ActiveTheme` instead of subscribing
//! themselves. Dropping it detaches from the channel.

use std::cell::Cell;
use std::rc::Rc;

use crate::channel::{SubscriptionId, ThemeChannel};
use crate::theme::{Palette, Theme};

/// Last-received theme, starting at [`Theme::default`].
#[derive(Debug)]
pub struct ActiveTheme {
    current: Rc<Cell<Theme>>,
    changes: Rc<Cell<u32>>,
    channel: Rc<ThemeChannel>,
    subscription: SubscriptionId,
}

impl ActiveTheme {
    /// Subscribe to `channel`, starting from the default theme.
    pub fn attach(channel: &Rc<ThemeChannel>) -> Self {
        Self::attach_with(channel, Theme::default())
    }

    /// Subscribe to `channel`, starting from `initial`.
    pub fn attach_with(channel: &Rc<ThemeChannel>, initial: Theme) -> Self {
        let current = Rc::new(Cell::new(initial));
        let changes = Rc::new(Cell::new(0));
        let slot = Rc::clone(&current);
        let counter = Rc::clone(&changes);
        let subscription = channel.subscribe(move |theme| {
            slot.set(theme);
            counter.set(counter.get() + 1);
        });
        log::debug!(
            "Active theme attached to '{}' starting at {initial}",
            channel.name()
        );
        Self {
            current,
            changes,
            channel: Rc::clone(channel),
            subscription,
        }
    }

    /// Last theme received.
    pub fn current(&self) -> Theme {
        self.current.get()
    }

    /// Palette for the last theme received.
    pub fn palette(&self) -> Palette {
        self.current.get().palette()
    }

    /// Number of broadcasts received since attaching.
    pub fn changes(&self) -> u32 {
        self.changes.get()
    }
}

impl Drop for ActiveTheme {
    fn drop(&mut self) {
        self.channel.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_default() {
        let channel = Rc::new(ThemeChannel::default());
        let active = ActiveTheme::attach(&channel);
        assert_eq!(active.current(), Theme::Green);
        assert_eq!(active.changes(), 0);
    }

    #[test]
    fn follows_broadcasts() {
        let channel = Rc::new(ThemeChannel::default());
        let active = ActiveTheme::attach(&channel);
        channel.broadcast(Theme::Amber);
        assert_eq!(active.current(), Theme::Amber);
        assert_eq!(active.palette(), Theme::Amber.palette());
        channel.broadcast(Theme::Red);
        assert_eq!(active.current(), Theme::Red);
        assert_eq!(active.changes(), 2);
    }

    #[test]
    fn same_theme_is_still_delivered() {
        let channel = Rc::new(ThemeChannel::default());
        let active = ActiveTheme::attach_with(&channel, Theme::Blue);
        channel.broadcast(Theme::Blue);
        assert_eq!(active.current(), Theme::Blue);
        assert_eq!(active.changes(), 1);
    }

    #[test]
    fn drop_detaches() {
        let channel = Rc::new(ThemeChannel::default());
        {
            let _active = ActiveTheme::attach(&channel);
            assert_eq!(channel.subscriber_count(), 1);
        }
        assert_eq!(channel.subscriber_count(), 0);
    }
}
