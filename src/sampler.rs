//! # One-Sample Orchestration
//!
//! Pulls a single complete sample out of the station: locate, read, decode,
//! derive. The scheduler in the binary calls [`Sampler::sample`] once per
//! period; there is no loop or sleep in here.

use crate::decode::{self, DecodeError};
use crate::metrics;
use crate::rain::RainAccumulator;
use crate::station::{Station, StationError, UsbTransport};
use crate::{DerivedReadings, OutputRecord};
use chrono::Local;
use thiserror::Error;

/// Errors from a single sampling cycle. All of these abort the run: a
/// failed cycle is not retried before the next scheduled tick.
#[derive(Error, Debug)]
pub enum SampleError {
    /// Reading station memory failed (transport or bad fixed block)
    #[error(transparent)]
    Station(#[from] StationError),

    /// The current block did not decode
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Owns the station handle and the rain accumulator — all the state the
/// decode pipeline carries between cycles.
pub struct Sampler<T> {
    station: Station<T>,
    rain: RainAccumulator,
}

impl<T: UsbTransport> Sampler<T> {
    pub fn new(transport: T, max_rain_jump_mm: f64) -> Self {
        Self {
            station: Station::new(transport),
            rain: RainAccumulator::new(max_rain_jump_mm),
        }
    }

    /// Produce one timestamped record: fresh device read, decode, derived
    /// metrics, rain accumulation.
    ///
    /// The wind chill formula takes metres per second; the station's wind
    /// field is fed to it unscaled, matching the figures the logger has
    /// always written.
    pub fn sample(&mut self) -> Result<OutputRecord, SampleError> {
        let current = self.station.read_current()?;
        let reading = decode::decode_current_block(&current)?;

        let rain = self.rain.update(reading.rain_counter_mm);
        if rain.delta_mm == 0.0 && reading.rain_counter_mm > rain.total_mm {
            log::warn!(
                "rain counter spike rejected: counter {:.1} mm vs total {:.1} mm",
                reading.rain_counter_mm,
                rain.total_mm
            );
        }

        let derived = DerivedReadings {
            dew_point_c: metrics::dew_point(
                reading.outdoor_temp_c,
                reading.outdoor_humidity as f64,
            ),
            wind_chill_c: metrics::wind_chill(reading.outdoor_temp_c, reading.wind_speed_kmh),
            rain_delta_mm: rain.delta_mm,
            total_rain_mm: rain.total_mm,
        };

        Ok(OutputRecord {
            timestamp: Local::now(),
            reading,
            derived,
        })
    }
}
