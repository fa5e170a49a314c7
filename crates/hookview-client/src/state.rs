//! Connection state machine.

use std::fmt;

use serde::Serialize;

/// The viewer's connection to the relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Not connected.
    #[default]
    Disconnected,
    /// Attempting to connect.
    Connecting,
    /// Connected and receiving events.
    Connected,
    /// Could not connect after the bounded retries.
    Error,
}

/// What can happen to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// User asked to connect with a valid target.
    ConnectIntent,
    /// User asked to disconnect.
    DisconnectIntent,
    /// Transport reported an open connection.
    Opened,
    /// Every attempt failed or timed out.
    Failed,
    /// An open connection went away.
    Dropped,
}

impl ConnectionState {
    /// Next state for `trigger`, or `None` if the trigger does not apply.
    ///
    /// `None` covers the no-ops: connecting twice, a late `Opened` after
    /// `Failed`, disconnecting while already disconnected.
    pub fn next(self, trigger: Trigger) -> Option<Self> {
        use ConnectionState::*;
        use Trigger::*;

        match (self, trigger) {
            (Disconnected | Error, ConnectIntent) => Some(Connecting),
            (Connecting, Opened) => Some(Connected),
            (Connecting, Failed) => Some(Error),
            (Connected, Dropped) => Some(Disconnected),
            (Connecting | Connected | Error, DisconnectIntent) => Some(Disconnected),
            _ => None,
        }
    }

    /// Short lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }

    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionState::*;
    use super::Trigger::*;
    use super::*;

    #[test]
    fn test_happy_path() {
        let s = Disconnected.next(ConnectIntent).unwrap();
        assert_eq!(s, Connecting);
        let s = s.next(Opened).unwrap();
        assert_eq!(s, Connected);
        assert_eq!(s.next(Dropped), Some(Disconnected));
    }

    #[test]
    fn test_connect_while_busy_is_noop() {
        assert_eq!(Connecting.next(ConnectIntent), None);
        assert_eq!(Connected.next(ConnectIntent), None);
    }

    #[test]
    fn test_opened_after_failed_does_not_resurrect() {
        let s = Connecting.next(Failed).unwrap();
        assert_eq!(s, Error);
        assert_eq!(s.next(Opened), None);
        assert_eq!(s.next(ConnectIntent), Some(Connecting));
    }

    #[test]
    fn test_disconnect_from_every_state() {
        for s in [Connecting, Connected, Error] {
            assert_eq!(s.next(DisconnectIntent), Some(Disconnected));
        }
        assert_eq!(Disconnected.next(DisconnectIntent), None);
    }

    #[test]
    fn test_drop_only_applies_when_connected() {
        assert_eq!(Connecting.next(Dropped), None);
        assert_eq!(Error.next(Dropped), None);
    }
}
