use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a participant did during the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Booking,
    Pass,
    Cancellation,
}

/// One entry of the external action log (read-only to the scheduler)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub participant: String,
    pub kind: ActionKind,
    /// Only meaningful for bookings: an unfinalized booking is a draft in progress
    #[serde(default)]
    pub finalized: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl ActionEvent {
    pub fn booking(participant: &str, created_at: DateTime<Utc>, finalized: bool) -> Self {
        Self {
            participant: participant.to_string(),
            kind: ActionKind::Booking,
            finalized,
            created_at: Some(created_at),
            cancelled_at: None,
        }
    }

    pub fn pass(participant: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            participant: participant.to_string(),
            kind: ActionKind::Pass,
            finalized: false,
            created_at: Some(created_at),
            cancelled_at: None,
        }
    }

    pub fn cancellation(
        participant: &str,
        created_at: DateTime<Utc>,
        cancelled_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            participant: participant.to_string(),
            kind: ActionKind::Cancellation,
            finalized: false,
            created_at: Some(created_at),
            cancelled_at,
        }
    }

    /// Whether this event ends the turn it is matched against.
    /// A draft booking (not finalized) is still work in progress.
    pub fn completes_turn(&self) -> bool {
        match self.kind {
            ActionKind::Pass | ActionKind::Cancellation => true,
            ActionKind::Booking => self.finalized,
        }
    }

    /// Instant at which the turn ended, if the log recorded one
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self.kind {
            ActionKind::Cancellation => self.cancelled_at.or(self.created_at),
            _ => self.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftPhase {
    PreDraft,
    #[serde(rename = "ROUND_1")]
    Round1,
    #[serde(rename = "ROUND_2")]
    Round2,
    OpenSeason,
}

impl DraftPhase {
    /// Round number reported to callers: 1, 2, or 3 for open season
    pub fn round_number(self) -> u8 {
        match self {
            DraftPhase::Round2 => 2,
            DraftPhase::OpenSeason => 3,
            DraftPhase::PreDraft | DraftPhase::Round1 => 1,
        }
    }
}

/// Snapshot of the draft at one instant. Recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftStatus {
    pub phase: DraftPhase,
    pub active_participant: Option<String>,
    pub next_participant: Option<String>,
    /// Index into the full turn sequence of the active slot
    pub active_slot: Option<usize>,
    pub window_start: DateTime<Utc>,
    pub window_end: Option<DateTime<Utc>>,
    pub round: u8,
    pub grace_period: bool,
    pub season_start: bool,
}

/// How a single turn slot turned out (or is expected to turn out)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Completed,
    Passed,
    Cancelled,
    /// Window ran out without a completing action
    Skipped,
    Active,
    GracePeriod,
    Future,
}

impl SlotStatus {
    pub fn is_resolved(self) -> bool {
        matches!(
            self,
            SlotStatus::Completed | SlotStatus::Passed | SlotStatus::Cancelled | SlotStatus::Skipped
        )
    }

    pub fn is_active(self) -> bool {
        matches!(self, SlotStatus::Active | SlotStatus::GracePeriod)
    }
}

/// Per-slot entry of the season projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSlot {
    pub index: usize,
    pub participant: String,
    pub round: u8,
    pub status: SlotStatus,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
