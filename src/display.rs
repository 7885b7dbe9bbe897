use std::fs::File;
use std::io::Write;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::names::format_display_name;
use crate::schedule::{DraftPhase, DraftStatus, ProjectedSlot, SlotStatus};

/// Formats an instant as civil time, e.g. "Mon 2025-06-02 10:00 EDT"
pub fn format_instant(instant: DateTime<Utc>, timezone: Tz) -> String {
    instant
        .with_timezone(&timezone)
        .format("%a %Y-%m-%d %H:%M %Z")
        .to_string()
}

fn phase_label(phase: DraftPhase) -> &'static str {
    match phase {
        DraftPhase::PreDraft => "Pre-draft",
        DraftPhase::Round1 => "Round 1",
        DraftPhase::Round2 => "Round 2",
        DraftPhase::OpenSeason => "Open season",
    }
}

fn slot_label(status: SlotStatus) -> &'static str {
    match status {
        SlotStatus::Completed => "booked",
        SlotStatus::Passed => "passed",
        SlotStatus::Cancelled => "cancelled",
        SlotStatus::Skipped => "timed out",
        SlotStatus::Active => "ACTIVE",
        SlotStatus::GracePeriod => "ACTIVE (early)",
        SlotStatus::Future => "upcoming",
    }
}

/// Prints the current draft status in a readable format
pub fn print_draft_status(status: &DraftStatus, timezone: Tz) {
    println!("\n=== Draft Status ===");
    println!("Phase: {} (round {})", phase_label(status.phase), status.round);

    match &status.active_participant {
        Some(active) => {
            println!("On the clock: {}", format_display_name(Some(active)));
            println!("  Window opens:  {}", format_instant(status.window_start, timezone));
            if let Some(end) = status.window_end {
                println!("  Window closes: {}", format_instant(end, timezone));
            }
            if status.season_start {
                println!("  First pick of the season");
            }
            if status.grace_period {
                println!("  Early access: previous turn finished ahead of schedule");
            }
        }
        None if status.phase == DraftPhase::OpenSeason => {
            println!(
                "Draft finished; open booking since {}",
                format_instant(status.window_start, timezone)
            );
        }
        None => {
            println!("Draft opens {}", format_instant(status.window_start, timezone));
        }
    }

    if let Some(next) = &status.next_participant {
        println!("Up next: {}", format_display_name(Some(next)));
    }
}

/// Prints every slot of the season
pub fn print_projection(slots: &[ProjectedSlot], timezone: Tz) {
    println!("\n=== Season Schedule ===");
    for slot in slots {
        println!("  {}", slot_line(slot, timezone));
    }
}

fn slot_line(slot: &ProjectedSlot, timezone: Tz) -> String {
    let mut line = format!(
        "R{} #{:<2} {:<24} {:<15} {} -> {}",
        slot.round,
        slot.index + 1,
        format_display_name(Some(&slot.participant)),
        slot_label(slot.status),
        format_instant(slot.window_start, timezone),
        format_instant(slot.window_end, timezone),
    );
    if let Some(resolved) = slot.resolved_at {
        line.push_str(&format!(" (done {})", format_instant(resolved, timezone)));
    }
    line
}

/// Writes the season schedule to a file, one slot per line
pub fn write_projection_to_file(
    slots: &[ProjectedSlot],
    timezone: Tz,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** Season Schedule **")?;
    for slot in slots {
        writeln!(file, "{}", slot_line(slot, timezone))?;
    }

    Ok(())
}
