//! hungry-bear: a bear walks across a field of trees to the honey, forever.
//!
//! Frames go to stdout as JSON lines; logs go to stderr (`RUST_LOG`).

mod cli;
mod output;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use bear_sim::{Broadcaster, Controller, ControllerHandle};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = cli::parse_args(std::env::args().skip(1))?;
    if args.help {
        cli::print_help();
        return Ok(());
    }
    let config = cli::load_config(&args)?;
    log::info!(
        "hungry-bear starting: {}x{} grid, {} trees, dwell {} ms, step {} ms",
        config.width,
        config.height,
        config.obstacle_count,
        config.dwell_ms,
        config.step_ms
    );

    let broadcaster = Arc::new(Broadcaster::new());
    let (_, frames) = broadcaster.attach();
    let printer = output::spawn_stdout(frames)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })?;

    let controller = Controller::new(config, Arc::clone(&broadcaster))?;
    let handle = ControllerHandle::spawn(controller)?;

    while running.load(Ordering::Relaxed) && !handle.is_finished() {
        thread::sleep(Duration::from_millis(100));
    }

    let result = handle.stop();
    // Last sender gone: the printer drains what is queued and exits.
    drop(broadcaster);
    if printer.join().is_err() {
        log::error!("stdout subscriber panicked");
    }
    result?;

    log::info!("hungry-bear shutdown complete");
    Ok(())
}
