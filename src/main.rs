//! # WH1080 Logger Entry Point
//!
//! Drives the sampling cadence: waits for each whole-minute wall-clock
//! boundary, pulls one sample out of the core pipeline, appends it to the
//! sink, and sleeps until the next tick. Ctrl-C exits cleanly between
//! cycles. All protocol and transport errors are fatal — the process exits
//! and leaves restarting to the service supervisor.
//!
//! Run with `--stdout` to print records to the console instead of the
//! daily CSV files (useful when testing a freshly plugged-in station).

// Test modules
#[cfg(test)]
mod tests;

#[cfg(all(target_os = "linux", feature = "hardware"))]
mod usb_rusb;

use anyhow::Result;
use chrono::{DateTime, Duration, Local, Timelike};

/// First wall-clock tick strictly after `now`: `period_minutes` ahead,
/// truncated to the whole minute. Matches the historical logger's habit of
/// writing samples on round minutes.
#[allow(dead_code)]
fn next_aligned_tick(now: DateTime<Local>, period_minutes: u32) -> DateTime<Local> {
    let tick = now + Duration::minutes(period_minutes.max(1) as i64);
    tick.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(tick)
}

#[cfg(all(target_os = "linux", feature = "hardware"))]
fn run_logger(stdout_mode: bool) -> Result<()> {
    use anyhow::Context as _;
    use log::info;
    use wh1080_lib::config::Config;
    use wh1080_lib::emit::{ConsoleSink, DailyCsvSink, RecordSink};
    use wh1080_lib::sampler::Sampler;

    let config = Config::load();

    let transport = usb_rusb::RusbTransport::open().context("open weather station")?;
    let mut sampler = Sampler::new(transport, config.station.max_rain_jump_mm);

    let mut sink: Box<dyn RecordSink> = if stdout_mode {
        Box::new(ConsoleSink)
    } else {
        Box::new(DailyCsvSink::new(&config.output.data_dir))
    };

    let period = config.sampling.period_minutes;

    // The only suspension points are the inter-cycle sleep and ctrl-c; a
    // cycle itself runs to completion as blocking code.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        info!(
            "program started, first sample at {}",
            next_aligned_tick(Local::now(), period).format("%Y-%m-%d %H:%M:%S")
        );

        loop {
            let tick = next_aligned_tick(Local::now(), period);
            let wait = (tick - Local::now()).to_std().unwrap_or_default();

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    let record = sampler.sample().context("sampling cycle failed")?;
                    sink.emit(&record).context("write output record")?;
                    info!(
                        "sample recorded: out {:.1} °C {} %, wind {:.1} {}, rain +{:.1} mm",
                        record.reading.outdoor_temp_c,
                        record.reading.outdoor_humidity,
                        record.reading.wind_speed_kmh,
                        record.reading.wind_dir,
                        record.derived.rain_delta_mm,
                    );
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, shutting down");
                    break;
                }
            }
        }

        Ok(())
    })
}

/// Main application entry point.
fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    let stdout_mode = std::env::args().any(|arg| arg == "--stdout");

    #[cfg(all(target_os = "linux", feature = "hardware"))]
    {
        return run_logger(stdout_mode);
    }

    #[cfg(not(all(target_os = "linux", feature = "hardware")))]
    {
        let _ = stdout_mode;
        anyhow::bail!(
            "USB support not enabled on this build. Rebuild with --features hardware on Linux \
             to talk to the station."
        );
    }

    #[allow(unreachable_code)]
    Ok(())
}
