//! Turn notices for the notification subsystem.
//!
//! The scheduler is polled, so notices are derived by comparing what changed
//! between two polls rather than from individual writes to the log.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::types::{DraftStatus, ProjectedSlot, SlotStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnNotice {
    TurnStarted {
        participant: String,
        slot: usize,
        window_end: DateTime<Utc>,
    },
    Reminder {
        participant: String,
        slot: usize,
        window_end: DateTime<Utc>,
    },
    FinalWarning {
        participant: String,
        slot: usize,
        window_end: DateTime<Utc>,
    },
    AutoPassed {
        participant: String,
        slot: usize,
    },
    OpenSeasonStarted,
}

/// How long before a window closes each warning goes out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoticeLeads {
    pub reminder: Duration,
    pub final_warning: Duration,
}

impl Default for NoticeLeads {
    fn default() -> Self {
        Self {
            reminder: Duration::hours(24),
            final_warning: Duration::hours(2),
        }
    }
}

/// Notices implied by the change from `previous` to `current` projection.
///
/// Slots missing from `previous` count as not yet reached.
pub fn detect_transitions(
    previous: &[ProjectedSlot],
    current: &[ProjectedSlot],
) -> Vec<TurnNotice> {
    let before = |index: usize| {
        previous
            .get(index)
            .map(|s| s.status)
            .unwrap_or(SlotStatus::Future)
    };

    let mut notices = Vec::new();
    for slot in current {
        let was = before(slot.index);
        if slot.status == SlotStatus::Skipped && !was.is_resolved() {
            notices.push(TurnNotice::AutoPassed {
                participant: slot.participant.clone(),
                slot: slot.index,
            });
        }
        if slot.status.is_active() && !was.is_active() {
            notices.push(TurnNotice::TurnStarted {
                participant: slot.participant.clone(),
                slot: slot.index,
                window_end: slot.window_end,
            });
        }
    }

    let all_resolved = |slots: &[ProjectedSlot]| slots.iter().all(|s| s.status.is_resolved());
    let was_open = !previous.is_empty() && all_resolved(previous);
    if !current.is_empty() && all_resolved(current) && !was_open {
        notices.push(TurnNotice::OpenSeasonStarted);
    }
    notices
}

/// Reminder and final-warning notices whose send time falls in `(since, now]`
pub fn deadline_notices(
    status: &DraftStatus,
    since: DateTime<Utc>,
    now: DateTime<Utc>,
    leads: &NoticeLeads,
) -> Vec<TurnNotice> {
    let (Some(participant), Some(slot), Some(window_end)) = (
        status.active_participant.as_ref(),
        status.active_slot,
        status.window_end,
    ) else {
        return Vec::new();
    };

    let due = |lead: Duration| match window_end.checked_sub_signed(lead) {
        Some(at) => since < at && at <= now,
        None => false,
    };

    let mut notices = Vec::new();
    if due(leads.reminder) {
        notices.push(TurnNotice::Reminder {
            participant: participant.clone(),
            slot,
            window_end,
        });
    }
    if due(leads.final_warning) {
        notices.push(TurnNotice::FinalWarning {
            participant: participant.clone(),
            slot,
            window_end,
        });
    }
    notices
}
