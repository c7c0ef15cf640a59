//! Subscriptions service entry point
//!
//! Parses CLI arguments, dispatches to the selected command, and exits
//! non-zero on failure. All logic lives in the CLI module.

use subscriptions::cli;
use subscriptions::observability::{log_event_with_fields, Event};

fn main() {
    if let Err(e) = cli::run() {
        log_event_with_fields(
            Event::BootFailed,
            &[("code", e.code_str()), ("message", e.message())],
        );
        std::process::exit(1);
    }
}
