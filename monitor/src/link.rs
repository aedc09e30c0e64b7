//! Bookkeeping for one USB attach session.
//!
//! A device stack keeps reporting the state it reached in an earlier session until the host
//! resets the bus again, so "configured" only means something once a bus reset has been seen
//! after the most recent attach.

/// Device state as reported by the USB stack after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// The host reset the bus. The device has no address yet.
    Default,
    Addressed,
    Configured,
    Suspend,
}

/// Tracks whether the host enumerated the device during the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkSession {
    up: bool,
    reset_seen: bool,
    state: Option<LinkState>,
}

impl LinkSession {
    pub const fn new() -> Self {
        LinkSession {
            up: false,
            reset_seen: false,
            state: None,
        }
    }

    /// Starts a session. Whatever the stack reported before does not count.
    pub fn up(&mut self) {
        self.up = true;
        self.reset_seen = false;
        self.state = None;
    }

    pub fn down(&mut self) {
        self.up = false;
        self.reset_seen = false;
        self.state = None;
    }

    pub fn is_up(&self) -> bool {
        self.up
    }

    /// Feeds the state read back after a poll. Ignored while the session is down.
    pub fn observe(&mut self, state: LinkState) {
        if !self.up {
            return;
        }
        if state == LinkState::Default {
            self.reset_seen = true;
        }
        self.state = Some(state);
    }

    /// The host reset the bus and configured the device since [`LinkSession::up`].
    pub fn enumerated(&self) -> bool {
        self.up && self.reset_seen && self.state == Some(LinkState::Configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_then_configure_enumerates() {
        let mut link = LinkSession::new();
        link.up();
        link.observe(LinkState::Default);
        assert!(!link.enumerated());
        link.observe(LinkState::Addressed);
        link.observe(LinkState::Configured);
        assert!(link.enumerated());
    }

    #[test]
    fn configured_left_over_from_last_session_does_not_count() {
        let mut link = LinkSession::new();
        link.up();
        link.observe(LinkState::Default);
        link.observe(LinkState::Configured);
        link.down();

        link.up();
        link.observe(LinkState::Configured);
        assert!(!link.enumerated());

        link.observe(LinkState::Default);
        link.observe(LinkState::Configured);
        assert!(link.enumerated());
    }

    #[test]
    fn down_ends_the_session() {
        let mut link = LinkSession::new();
        link.up();
        link.observe(LinkState::Default);
        link.observe(LinkState::Configured);
        link.down();

        assert!(!link.is_up());
        assert!(!link.enumerated());
        link.observe(LinkState::Default);
        link.observe(LinkState::Configured);
        assert!(!link.enumerated());
    }

    #[test]
    fn suspend_drops_enumeration_until_configured_again() {
        let mut link = LinkSession::new();
        link.up();
        link.observe(LinkState::Default);
        link.observe(LinkState::Configured);
        link.observe(LinkState::Suspend);
        assert!(!link.enumerated());
        link.observe(LinkState::Configured);
        assert!(link.enumerated());
    }
}
