//! FlightBar CLI - track a flight's live status from the terminal.
//!
//! Subscribes to one flight and prints every poll state transition until
//! the flight lands, the user interrupts, or `--once` short-circuits after
//! the first result.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tokio::sync::broadcast::error::RecvError;

use flightbar::config::PollerConfig;
use flightbar::logging;
use flightbar::poller::{AlwaysReachable, FlightPoller, HttpFlightClient, PollState};
use flightbar::store::{FlightStore, IniFlightStore};

#[derive(Parser)]
#[command(name = "flightbar")]
#[command(version = flightbar::VERSION)]
#[command(about = "Track a flight's live status from the terminal", long_about = None)]
struct Args {
    /// IATA flight number (e.g. AC123); defaults to the last searched flight
    flight: Option<String>,

    /// Flight data service base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Shared-secret API key for the flight data service
    #[arg(long)]
    api_key: Option<String>,

    /// Refresh interval in minutes
    #[arg(long)]
    interval_mins: Option<u64>,

    /// Fetch the status once and exit instead of polling
    #[arg(long)]
    once: bool,

    /// Path to the config file (default: ~/.flightbar/config.ini)
    #[arg(long)]
    config: Option<PathBuf>,
}

mod render;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _logging_guard =
        match logging::init_logging(logging::default_log_dir(), logging::default_log_file()) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Error initializing logging: {e}");
                process::exit(1);
            }
        };

    let mut config = match &args.config {
        Some(path) => PollerConfig::load_from(path),
        None => PollerConfig::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(api_key) = args.api_key {
        config.api_key = api_key;
    }
    if let Some(mins) = args.interval_mins {
        if mins == 0 {
            eprintln!("Error: --interval-mins must be at least 1");
            process::exit(1);
        }
        config.poll_interval = Duration::from_secs(mins * 60);
    }

    let store = match &args.config {
        Some(path) => IniFlightStore::open(path.clone()),
        None => IniFlightStore::open_default(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    // No argument: fall back to the flight from the previous session
    let flight = match args.flight.clone().or_else(|| store.last_flight_number()) {
        Some(flight) => flight,
        None => {
            eprintln!("Error: no flight number given and none stored from a previous session");
            process::exit(1);
        }
    };

    let client = match HttpFlightClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating HTTP client: {e}");
            process::exit(1);
        }
    };

    let interval_mins = config.poll_interval.as_secs() / 60;
    let poller = FlightPoller::new(client, AlwaysReachable, store, config);
    let mut updates = poller.state_updates();
    let mut changes = poller.status_changes();

    if !args.once {
        println!(
            "Tracking {} (refreshing every {} min, ctrl-c to stop)",
            flight.trim().to_uppercase(),
            interval_mins
        );
    }

    poller.subscribe(&flight, false);

    loop {
        tokio::select! {
            update = updates.recv() => {
                match update {
                    Ok(state) => {
                        println!("{}", render::render_state(&state));
                        match &state {
                            PollState::Ready(snapshot) if snapshot.is_landed() => {
                                println!("Flight landed; tracking stopped.");
                                break;
                            }
                            PollState::Ready(_) if args.once => break,
                            PollState::Failed(_) if args.once => process::exit(1),
                            _ => {}
                        }
                    }
                    // Lagged receivers skip ahead; the next transition
                    // still arrives
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
            change = changes.recv() => {
                if let Ok(change) = change {
                    println!("* {} is now {}", change.flight_no, change.status);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                poller.unsubscribe();
                println!("Stopped.");
                break;
            }
        }
    }
}
