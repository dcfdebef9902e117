//! # Sample Emission
//!
//! Formats one [`OutputRecord`] per cycle into the fixed-order CSV line the
//! downstream tooling expects and appends it to a sink.
//!
//! The line format — field order, decimal places, and the trailing comma
//! before the newline — is a compatibility surface shared with existing log
//! parsers. Do not "clean it up".
//!
//! Two sinks are provided: [`DailyCsvSink`] appends to a per-day file named
//! `YYYY-MM-DD-Weather.csv` (the file rolls over naturally because the path
//! is derived from each record's own timestamp), and [`ConsoleSink`] writes
//! the same lines to stdout for development without a data directory.

use crate::OutputRecord;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while writing a record to a sink.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The underlying file or stream rejected the write
    #[error("sink IO: {0}")]
    Io(#[from] io::Error),
}

/// Anything a completed sample can be handed to, once per cycle.
pub trait RecordSink {
    /// Append one record. Failure is fatal for the run; there is no
    /// buffering to recover.
    fn emit(&mut self, record: &OutputRecord) -> Result<(), SinkError>;
}

/// Render a record as its CSV line, without the terminating newline.
///
/// Format:
/// `ts,indoor_hum,outdoor_hum,indoor_t,outdoor_t,dew,chill,wind,gust,dir,rain_delta,rain_total,pressure,`
///
/// Temperatures, speeds, rain and pressure carry one decimal place; the dew
/// point carries two. The trailing comma is intentional.
pub fn format_record(record: &OutputRecord) -> String {
    let r = &record.reading;
    let d = &record.derived;
    format!(
        "{ts},{ih},{oh},{it:.1},{ot:.1},{dp:.2},{wc:.1},{ws:.1},{gs:.1},{dir},{rd:.1},{rt:.1},{ap:.1},",
        ts = record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        ih = r.indoor_humidity,
        oh = r.outdoor_humidity,
        it = r.indoor_temp_c,
        ot = r.outdoor_temp_c,
        dp = d.dew_point_c,
        wc = d.wind_chill_c,
        ws = r.wind_speed_kmh,
        gs = r.gust_speed_kmh,
        dir = r.wind_dir,
        rd = d.rain_delta_mm,
        rt = d.total_rain_mm,
        ap = r.abs_pressure_hpa,
    )
}

/// Appends records to a daily-rotating CSV file under `data_dir`.
pub struct DailyCsvSink {
    data_dir: PathBuf,
}

impl DailyCsvSink {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// File the given record belongs in, named by its timestamp's date.
    fn path_for(&self, record: &OutputRecord) -> PathBuf {
        self.data_dir
            .join(format!("{}-Weather.csv", record.timestamp.format("%Y-%m-%d")))
    }
}

impl RecordSink for DailyCsvSink {
    fn emit(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(record))?;
        writeln!(file, "{}", format_record(record))?;
        // Open-per-write keeps the sink interrupt-safe: there is never an
        // unflushed record when the process is signalled between cycles.
        file.sync_data()?;
        Ok(())
    }
}

/// Writes records to stdout; the development-mode sink.
pub struct ConsoleSink;

impl RecordSink for ConsoleSink {
    fn emit(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", format_record(record))?;
        Ok(())
    }
}
