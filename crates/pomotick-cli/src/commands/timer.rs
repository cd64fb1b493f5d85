use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use pomotick_core::storage::{load_ledger, stats_path};
use pomotick_core::{Clock, Event, Settings, SharedSettings, SystemClock, TimerEngine};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::driver::{Driver, DriverCommand};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Wait for a start command instead of starting focus immediately
    #[arg(long)]
    pub idle: bool,
    /// Exit after the first phase completes
    #[arg(long)]
    pub once: bool,
    /// Only print events, not the per-second status line
    #[arg(long, short)]
    pub quiet: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(args))
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// Forward stdin lines from a plain thread.
///
/// A blocking read cannot be cancelled, so it must not live on the runtime:
/// the process exits without waiting for the next line.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn run_loop(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let path = stats_path()?;
    let ledger = Arc::new(load_ledger(&path, clock.clone())?);
    let engine = TimerEngine::new(
        Arc::new(SharedSettings::new(settings)),
        ledger.clone(),
        clock.clone(),
    );
    let mut driver = Driver::new(engine, ledger, clock, path);

    if !args.idle {
        if let Some(event) = driver.command(DriverCommand::Start)? {
            print_event(&event)?;
        }
    }

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    interval.tick().await;

    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let event = driver.heartbeat()?;
                if !args.quiet {
                    eprint!("\r{}   ", driver.status_line());
                    std::io::stderr().flush()?;
                }
                if let Some(event) = event {
                    if !args.quiet {
                        eprintln!();
                    }
                    print_event(&event)?;
                    if args.once && event.is_phase_change() {
                        break;
                    }
                }
            }
            line = lines.recv(), if stdin_open => {
                let Some(line) = line else {
                    stdin_open = false;
                    continue;
                };
                match DriverCommand::parse(&line) {
                    Some(DriverCommand::Quit) => break,
                    Some(command) => {
                        if let Some(event) = driver.command(command)? {
                            print_event(&event)?;
                            if args.once && event.is_phase_change() {
                                break;
                            }
                        }
                    }
                    None => eprintln!("unknown command: {} (g p r s x q)", line.trim()),
                }
            }
        }
    }

    driver.persist()?;
    Ok(())
}
