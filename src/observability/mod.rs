//! Observability for the subscriptions service
//!
//! Structured JSON logging of typed lifecycle and request events.
//!
//! ```ignore
//! use subscriptions::observability::{log_event_with_fields, Event, Logger};
//!
//! log_event_with_fields(Event::Serving, &[("addr", "0.0.0.0:8080")]);
//! Logger::error(Event::StoreFailure.as_str(), &[("error", "connection refused")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
