use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::schedule::{unmatched_events, ActionEvent};

/// Initialize tracing with the DRAFT_LOG environment variable.
///
/// Defaults to "info" level if DRAFT_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("DRAFT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Log a data-quality warning for every event the scheduler will ignore.
/// Returns how many there were.
pub fn report_unmatched_events(order: &[String], events: &[ActionEvent]) -> usize {
    let unmatched = unmatched_events(order, events);
    for event in &unmatched {
        warn!(
            participant = %event.participant,
            kind = ?event.kind,
            created_at = ?event.created_at,
            "Action log entry matches nobody in this season's rotation"
        );
    }
    unmatched.len()
}
