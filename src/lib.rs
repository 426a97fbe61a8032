pub mod config;        // YAML configuration
pub mod error;         // Decode errors and glue macros
pub mod options;       // Command line options parsing
pub mod output_writer; // Delimited and JSON output streams
pub mod prelude;       // Common imports and types
pub mod replay;        // Capture replay loop
pub mod se;            // Protocol: frames, messages, devices
pub mod unixtime;      // Unix timestamp handling
pub mod utils;         // Utility functions

// Get the package version from Cargo.toml
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::prelude::*;
use std::io::Write;

/// Initialises logging at `level` unless `RUST_LOG` says otherwise.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger(level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init();
}

/// Main application entry point
///
/// Loads the configuration, opens the outputs and replays the input until
/// it ends or ctrl-c arrives.
pub async fn app(options: Options) -> Result<()> {
    let config = Config::from_options(&options)?;
    init_logger(&config.loglevel);

    info!("se-monitor {} starting", CARGO_PKG_VERSION);
    config.log_summary();

    if !config.output.any() {
        warn!("no outputs configured, decoded data is only logged");
    }
    let mut writer = OutputWriter::from_config(&config)?;

    tokio::select! {
        stats = replay::replay_input(&options.input, &mut writer) => {
            let stats = stats?;
            info!(
                "Replay complete: {} frames, {} device messages, {} skipped, {} failed, {} dropped frames",
                stats.frames, stats.device_messages, stats.skipped, stats.failed, stats.dropped_frames
            );
        }
        r = tokio::signal::ctrl_c() => {
            if let Err(e) = r {
                error!("Failed to listen for ctrl+c: {}", e);
            }
            info!("Interrupted, stopping");
        }
    }

    let counters = writer.counters();
    info!(
        "Records written: {} inverters, {} optimizers, {} json",
        counters.inverters, counters.optimizers, counters.json
    );

    Ok(())
}
