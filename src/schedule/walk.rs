//! The single turn state machine shared by the calculator and the projector.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::names::normalize_name;

use super::options::ScheduleOptions;
use super::rotation::turn_sequence;
use super::types::{ActionEvent, ActionKind, SlotStatus};

/// Outcome of one slot after walking the log
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SlotOutcome {
    pub participant: String,
    pub status: SlotStatus,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Walk {
    pub season_start: DateTime<Utc>,
    pub sequence: Vec<String>,
    pub slots: Vec<SlotOutcome>,
    pub active: Option<usize>,
    /// Anchor after the last resolved slot (start of open season when nothing is active)
    pub resolved_until: DateTime<Utc>,
    pub pre_draft: bool,
}

/// Events per normalized participant, in the order they consume turn slots.
/// Events for names outside the rotation are dropped.
fn events_by_participant<'a>(
    order: &[String],
    events: &'a [ActionEvent],
) -> HashMap<String, Vec<&'a ActionEvent>> {
    let mut grouped: HashMap<String, Vec<&'a ActionEvent>> = order
        .iter()
        .map(|p| (normalize_name(Some(p)), Vec::new()))
        .collect();

    for event in events {
        if let Some(list) = grouped.get_mut(&normalize_name(Some(&event.participant))) {
            list.push(event);
        }
    }

    // Stable: same-instant events keep log order, undated ones go last
    for list in grouped.values_mut() {
        list.sort_by_key(|e| (e.created_at.is_none(), e.created_at));
    }
    grouped
}

fn completed_status(event: &ActionEvent) -> SlotStatus {
    match event.kind {
        ActionKind::Booking => SlotStatus::Completed,
        ActionKind::Pass => SlotStatus::Passed,
        ActionKind::Cancellation => SlotStatus::Cancelled,
    }
}

/// Walk the snake sequence against the log.
///
/// Slots resolve strictly in order until the first one that is neither
/// completed by an event nor expired; that slot is active. Later slots (and all
/// slots before the draft opens) get a projected window assuming each turn
/// runs its full length.
pub(crate) fn walk(
    order: &[String],
    events: &[ActionEvent],
    now: DateTime<Utc>,
    options: &ScheduleOptions,
) -> Walk {
    let season_start = options.season_start();
    let sequence = turn_sequence(order);
    let by_participant = events_by_participant(order, events);
    let pre_draft = now < season_start && events.is_empty();

    let mut visits: HashMap<String, usize> = HashMap::new();
    let mut slots = Vec::with_capacity(sequence.len());
    let mut anchor = season_start;
    let mut resolved_until = season_start;
    let mut active = None;

    for (index, participant) in sequence.iter().enumerate() {
        let key = normalize_name(Some(participant));
        let visit = visits.entry(key.clone()).or_insert(0);
        let nth = *visit;
        *visit += 1;

        let window_start = anchor;
        let window_limit = options.window_limit(anchor);

        if pre_draft || active.is_some() {
            slots.push(SlotOutcome {
                participant: participant.clone(),
                status: SlotStatus::Future,
                window_start,
                window_end: window_limit,
                resolved_at: None,
            });
            anchor = options.anchor(window_limit);
            continue;
        }

        let event = by_participant.get(&key).and_then(|list| list.get(nth));

        let (status, resolved_at) = match event {
            Some(event) if event.completes_turn() => {
                let completed_at = event.completed_at().unwrap_or(anchor);
                (completed_status(event), Some(completed_at))
            }
            // No event, or a draft booking still in progress: the window decides
            _ if now > window_limit => (SlotStatus::Skipped, Some(window_limit)),
            _ => {
                active = Some(index);
                let early = index != 0 && now < anchor;
                let status = if early {
                    SlotStatus::GracePeriod
                } else {
                    SlotStatus::Active
                };
                (status, None)
            }
        };

        if let Some(resolved_at) = resolved_at {
            // The anchor only ever moves forward
            anchor = anchor.max(options.anchor(resolved_at));
            resolved_until = anchor;
        } else {
            // Project the rest of the season from the end of the active window
            anchor = options.anchor(window_limit);
        }

        slots.push(SlotOutcome {
            participant: participant.clone(),
            status,
            window_start,
            window_end: window_limit,
            resolved_at,
        });
    }

    Walk {
        season_start,
        sequence,
        slots,
        active,
        resolved_until,
        pre_draft,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn order() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    fn options() -> ScheduleOptions {
        // 2025-03-03 10:00 EST
        ScheduleOptions::new(2025)
            .with_season_start(Utc.with_ymd_and_hms(2025, 3, 3, 15, 0, 0).unwrap())
    }

    #[test]
    fn test_events_matched_by_normalized_name() {
        let events = vec![
            ActionEvent::pass("  a ", Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap()),
            ActionEvent::pass("Z", Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap()),
        ];
        let grouped = events_by_participant(&order(), &events);
        assert_eq!(grouped["a"].len(), 1);
        assert!(grouped.get("z").is_none());
    }

    #[test]
    fn test_undated_events_sort_last() {
        let t = Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();
        let mut undated = ActionEvent::pass("A", t);
        undated.created_at = None;
        let events = vec![undated, ActionEvent::booking("A", t, true)];
        let grouped = events_by_participant(&order(), &events);
        assert_eq!(grouped["a"][0].kind, ActionKind::Booking);
        assert_eq!(grouped["a"][1].kind, ActionKind::Pass);
    }

    #[test]
    fn test_pre_draft_projects_every_slot() {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();
        let walk = walk(&order(), &[], now, &options());
        assert!(walk.pre_draft);
        assert_eq!(walk.active, None);
        assert_eq!(walk.slots.len(), 6);
        assert!(walk.slots.iter().all(|s| s.status == SlotStatus::Future));
        assert_eq!(walk.slots[1].window_start, walk.slots[0].window_end);
    }

    #[test]
    fn test_undated_completion_uses_current_anchor() {
        let mut pass = ActionEvent::pass("A", Utc::now());
        pass.created_at = None;
        let now = Utc.with_ymd_and_hms(2025, 3, 3, 16, 0, 0).unwrap();
        let walk = walk(&order(), &[pass], now, &options());
        assert_eq!(walk.slots[0].status, SlotStatus::Passed);
        assert_eq!(walk.slots[0].resolved_at, Some(walk.season_start));
        // B inherits the season start as its window start
        assert_eq!(walk.active, Some(1));
        assert_eq!(walk.slots[1].window_start, walk.season_start);
        assert_eq!(walk.slots[1].window_end, walk.season_start + Duration::hours(48));
    }

    #[test]
    fn test_endless_turn_stays_active() {
        let options = options().with_turn_duration(Duration::MAX);
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let walk = walk(&order(), &[], now, &options);
        assert_eq!(walk.active, Some(0));
        assert_eq!(walk.slots[0].window_end, DateTime::<Utc>::MAX_UTC);
        assert!(walk.slots[1..].iter().all(|s| s.status == SlotStatus::Future));
        assert!(walk.slots.iter().all(|s| s.window_end >= s.window_start));
    }
}
