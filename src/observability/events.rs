//! Observable events of the subscriptions service
//!
//! Every log line names one of these events.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Startup complete, ready to serve
    BootComplete,
    /// Startup failed, process exits
    BootFailed,
    /// Graceful shutdown initiated
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Store
    /// Connection pool established
    StoreConnected,
    /// Embedded migrations applied
    MigrationsApplied,
    /// Dirty migration forced to its version
    MigrationForced,
    /// Statement failed in the store
    StoreFailure,

    // Requests
    /// Request rejected before reaching the store
    RequestRejected,
    /// Request failed in the store
    RequestFailed,
    /// Subscription created
    SubscriptionCreated,
    /// Subscription updated
    SubscriptionUpdated,
    /// Subscription deleted
    SubscriptionDeleted,

    // Server
    /// Listener bound, serving requests
    Serving,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "STARTUP_BEGIN",
            Event::BootComplete => "STARTUP_COMPLETE",
            Event::BootFailed => "STARTUP_FAILED",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::StoreConnected => "STORE_CONNECTED",
            Event::MigrationsApplied => "MIGRATIONS_APPLIED",
            Event::MigrationForced => "MIGRATION_FORCED",
            Event::StoreFailure => "STORE_FAILURE",

            Event::RequestRejected => "REQUEST_REJECTED",
            Event::RequestFailed => "REQUEST_FAILED",
            Event::SubscriptionCreated => "SUBSCRIPTION_CREATED",
            Event::SubscriptionUpdated => "SUBSCRIPTION_UPDATED",
            Event::SubscriptionDeleted => "SUBSCRIPTION_DELETED",

            Event::Serving => "SERVING",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::BootStart,
            Event::BootComplete,
            Event::BootFailed,
            Event::ShutdownStart,
            Event::ShutdownComplete,
            Event::ConfigLoaded,
            Event::StoreConnected,
            Event::MigrationsApplied,
            Event::MigrationForced,
            Event::StoreFailure,
            Event::RequestRejected,
            Event::RequestFailed,
            Event::SubscriptionCreated,
            Event::SubscriptionUpdated,
            Event::SubscriptionDeleted,
            Event::Serving,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::BootFailed.is_fatal());
        assert!(!Event::StoreFailure.is_fatal());
        assert!(!Event::Serving.is_fatal());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::BootStart), "STARTUP_BEGIN");
        assert_eq!(format!("{}", Event::MigrationForced), "MIGRATION_FORCED");
    }
}
