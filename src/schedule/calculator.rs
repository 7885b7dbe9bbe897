use chrono::{DateTime, Utc};

use crate::names::same_participant;

use super::options::ScheduleOptions;
use super::rotation::round_for_slot;
use super::types::{ActionEvent, DraftPhase, DraftStatus, SlotStatus};
use super::walk::walk;

/// Works out whose turn it is right now.
///
/// Pure and idempotent: the whole draft is replayed from the rotation order
/// and the action log snapshot on every call. Malformed input never fails;
/// see [`unmatched_events`] for log entries that were ignored.
pub fn calculate_draft_status(
    order: &[String],
    events: &[ActionEvent],
    now: DateTime<Utc>,
    options: &ScheduleOptions,
) -> DraftStatus {
    let walk = walk(order, events, now, options);

    if order.is_empty() {
        return DraftStatus {
            phase: DraftPhase::PreDraft,
            active_participant: None,
            next_participant: None,
            active_slot: None,
            window_start: walk.season_start,
            window_end: None,
            round: DraftPhase::PreDraft.round_number(),
            grace_period: false,
            season_start: false,
        };
    }

    if let Some(index) = walk.active {
        let slot = &walk.slots[index];
        let phase = match round_for_slot(index, order.len()) {
            1 => DraftPhase::Round1,
            _ => DraftPhase::Round2,
        };
        return DraftStatus {
            phase,
            active_participant: Some(slot.participant.clone()),
            next_participant: walk.sequence.get(index + 1).cloned(),
            active_slot: Some(index),
            window_start: slot.window_start,
            window_end: Some(slot.window_end),
            round: phase.round_number(),
            grace_period: slot.status == SlotStatus::GracePeriod,
            season_start: index == 0,
        };
    }

    if !walk.pre_draft && now >= walk.season_start {
        return DraftStatus {
            phase: DraftPhase::OpenSeason,
            active_participant: None,
            next_participant: None,
            active_slot: None,
            window_start: walk.resolved_until,
            window_end: None,
            round: DraftPhase::OpenSeason.round_number(),
            grace_period: false,
            season_start: false,
        };
    }

    DraftStatus {
        phase: DraftPhase::PreDraft,
        active_participant: None,
        next_participant: walk.sequence.first().cloned(),
        active_slot: None,
        window_start: walk.season_start,
        window_end: None,
        round: DraftPhase::PreDraft.round_number(),
        grace_period: false,
        season_start: false,
    }
}

/// Log entries whose participant matches nobody in the rotation order.
///
/// The scheduler ignores these silently; callers should surface them as a
/// data-quality warning.
pub fn unmatched_events<'a>(order: &[String], events: &'a [ActionEvent]) -> Vec<&'a ActionEvent> {
    events
        .iter()
        .filter(|e| !order.iter().any(|p| same_participant(p, &e.participant)))
        .collect()
}
