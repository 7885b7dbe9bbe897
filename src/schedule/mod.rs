pub mod types;
pub mod anchor;
pub mod options;
pub mod rotation;
mod walk;
pub mod calculator;
pub mod projector;
pub mod notices;

pub use types::{ActionEvent, ActionKind, DraftPhase, DraftStatus, ProjectedSlot, SlotStatus};
pub use anchor::{CivilClock, ANCHOR_HOUR, CIVIL_TIMEZONE};
pub use options::{ScheduleOptions, DEFAULT_TURN_DURATION_HOURS};
pub use rotation::{turn_sequence, RotationPlan};
pub use calculator::{calculate_draft_status, unmatched_events};
pub use projector::project_schedule;
pub use notices::{deadline_notices, detect_transitions, NoticeLeads, TurnNotice};
