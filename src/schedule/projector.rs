use chrono::{DateTime, Utc};

use super::options::ScheduleOptions;
use super::rotation::round_for_slot;
use super::types::{ActionEvent, ProjectedSlot};
use super::walk::walk;

/// Status of every slot in the season, past, present and projected.
///
/// Runs the same walk as [`calculate_draft_status`](super::calculate_draft_status),
/// so the boundary between resolved and unresolved slots always agrees.
/// Slots after the active one are projected as if each turn used its full window.
pub fn project_schedule(
    order: &[String],
    events: &[ActionEvent],
    now: DateTime<Utc>,
    options: &ScheduleOptions,
) -> Vec<ProjectedSlot> {
    let count = order.len();
    walk(order, events, now, options)
        .slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| ProjectedSlot {
            index,
            participant: slot.participant,
            round: round_for_slot(index, count),
            status: slot.status,
            window_start: slot.window_start,
            window_end: slot.window_end,
            resolved_at: slot.resolved_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::calculate_draft_status;
    use crate::schedule::types::SlotStatus;
    use chrono::{Duration, TimeZone};

    fn order() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    fn at(day: i64, hour_edt: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour_edt + 4, 0, 0).unwrap() + Duration::days(day)
    }

    fn options() -> ScheduleOptions {
        ScheduleOptions::new(2025).with_season_start(at(0, 10))
    }

    #[test]
    fn test_mixed_history() {
        let events = vec![
            ActionEvent::booking("A", at(0, 14), true),
            ActionEvent::pass("B", at(1, 9)),
            ActionEvent::cancellation("c", at(1, 11), None),
        ];
        let slots = project_schedule(&order(), &events, at(5, 12), &options());
        let statuses: Vec<SlotStatus> = slots.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                SlotStatus::Completed,
                SlotStatus::Passed,
                SlotStatus::Cancelled,
                // C never took the second turn: day 2 10:00 + 48h
                SlotStatus::Skipped,
                SlotStatus::Active,
                SlotStatus::Future,
            ]
        );
        assert_eq!(slots[3].resolved_at, Some(at(4, 10)));
        assert_eq!(slots[4].window_start, at(4, 10));
        assert_eq!(slots[5].window_start, at(6, 10));
        assert_eq!(slots[5].round, 2);
        assert_eq!(slots[0].round, 1);
    }

    #[test]
    fn test_grace_period_slot() {
        let events = vec![ActionEvent::booking("A", at(0, 14), true)];
        let slots = project_schedule(&order(), &events, at(0, 16), &options());
        assert_eq!(slots[1].status, SlotStatus::GracePeriod);
        assert!(slots[2..].iter().all(|s| s.status == SlotStatus::Future));
    }

    #[test]
    fn test_endless_turn_projects_without_overflow() {
        let options = options().with_turn_duration(Duration::MAX);
        let slots = project_schedule(&order(), &[], at(3, 12), &options);
        assert_eq!(slots[0].status, SlotStatus::Active);
        assert!(slots.iter().all(|s| s.window_end == DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_agrees_with_calculator() {
        let events = vec![
            ActionEvent::pass("A", at(0, 11)),
            ActionEvent::booking("B", at(1, 11), false),
        ];
        for day in 0..14 {
            let now = at(day, 12);
            let slots = project_schedule(&order(), &events, now, &options());
            let status = calculate_draft_status(&order(), &events, now, &options());
            let active = slots.iter().position(|s| s.status.is_active());
            assert_eq!(active, status.active_slot, "day {day}");
            if let Some(index) = active {
                assert_eq!(Some(slots[index].window_end), status.window_end);
                assert_eq!(slots[index].window_start, status.window_start);
            }
        }
    }
}
