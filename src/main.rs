use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use draft_turns::config::DraftConfig;
use draft_turns::display::{print_draft_status, print_projection, write_projection_to_file};
use draft_turns::logging::{init_tracing, report_unmatched_events};
use draft_turns::parser::load_action_log;
use draft_turns::schedule::{calculate_draft_status, project_schedule, ActionEvent};
use draft_turns::web;

fn load_events(config: &DraftConfig) -> Result<Vec<ActionEvent>, Box<dyn std::error::Error>> {
    if !Path::new(&config.action_log).exists() {
        warn!("No action log at {}, starting from an empty log", config.action_log);
        return Ok(Vec::new());
    }
    let events = load_action_log(&config.action_log)?;
    info!("Loaded {} action log entries from {}", events.len(), config.action_log);
    Ok(events)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = DraftConfig::load()?;
    if config.bypass_anchor {
        warn!("Anchor rounding is bypassed; deadlines will not snap to the daily boundary");
    }

    let args: Vec<String> = std::env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("status");

    let events = load_events(&config)?;

    // Check if we should run in web mode
    if mode == "web" {
        if let Some(port) = args.get(2).and_then(|p| p.parse::<u16>().ok()) {
            config.server.port = port;
        }
        web::start_server(config, events).await?;
        return Ok(());
    }

    let now = Utc::now();
    let options = config.schedule_options(now)?;
    let order = config.rotation.rotation_order(options.season_year);
    info!("Season {} rotation: {}", options.season_year, order.join(", "));
    report_unmatched_events(&order, &events);

    let timezone = options.clock.timezone;
    match mode {
        "status" => {
            let status = calculate_draft_status(&order, &events, now, &options);
            print_draft_status(&status, timezone);
        }
        "schedule" => {
            let slots = project_schedule(&order, &events, now, &options);
            print_projection(&slots, timezone);
            write_projection_to_file(&slots, timezone, "draft_schedule.txt")?;
            println!("\nSchedule saved to draft_schedule.txt");
        }
        other => {
            eprintln!(
                "Unknown command '{}'. Usage: draft-turns [status|schedule|web [port]]",
                other
            );
            std::process::exit(2);
        }
    }

    Ok(())
}
