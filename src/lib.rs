//! # WH1080 Logger Core Library
//!
//! This library decodes the memory-dump protocol spoken by WH1080-family USB
//! weather stations (vendor `0x1941`, product `0x8021`) and turns the raw
//! 32-byte memory blocks into timestamped weather records.
//!
//! ## Data Flow
//!
//! 1. **Locate**: read the fixed block at offset 0, validate its header and
//!    extract the pointer to the live data block ([`station`])
//! 2. **Decode**: unpack humidity, sign-magnitude temperatures, pressure,
//!    wind components and the cumulative rain counter ([`decode`])
//! 3. **Derive**: dew point and wind chill ([`metrics`]), plus a bounded
//!    per-sample rain delta with spike rejection ([`rain`])
//! 4. **Emit**: one fixed-order CSV line per sample ([`emit`])
//!
//! The USB side is abstracted behind [`station::UsbTransport`], so the whole
//! pipeline runs against canned byte blocks in tests. The binary supplies a
//! `rusb`-backed transport when built with the `hardware` feature.
//!
//! ## Design Notes
//!
//! Decoding is deliberately permissive: apart from the fixed-block header
//! sentinel and the wind-direction index, decoded values are reported as-is
//! with no range checks (a humidity reading above 100 % is the sensor's
//! problem, not ours). The only stateful component is the rain accumulator;
//! everything else is rebuilt from fresh device reads each cycle.

use chrono::{DateTime, Local};

// Module declarations
pub mod config;
pub mod decode;
pub mod emit;
pub mod metrics;
pub mod rain;
pub mod sampler;
pub mod station;

pub use decode::WindDirection;

/// One decoded set of sensor values, unpacked from the station's current
/// 32-byte data block. Immutable after construction.
///
/// Units follow the station's native scaling: temperatures in °C, pressure
/// in hPa, wind speeds in km/h, and the rain counter in millimetres. The
/// rain counter is cumulative and monotonic by device design (it may still
/// wrap or glitch — that is handled by [`rain::RainAccumulator`], not here).
#[derive(Debug, Clone, PartialEq)]
pub struct StationReading {
    /// Indoor relative humidity in percent, raw sensor byte
    pub indoor_humidity: u8,
    /// Outdoor relative humidity in percent, raw sensor byte
    pub outdoor_humidity: u8,
    /// Indoor temperature in °C (sign-magnitude, 0.1 °C resolution)
    pub indoor_temp_c: f64,
    /// Outdoor temperature in °C (sign-magnitude, 0.1 °C resolution)
    pub outdoor_temp_c: f64,
    /// Absolute pressure in hPa (0.1 hPa resolution)
    pub abs_pressure_hpa: f64,
    /// Average wind speed in km/h
    pub wind_speed_kmh: f64,
    /// Gust speed in km/h
    pub gust_speed_kmh: f64,
    /// Wind direction as one of 16 compass points
    pub wind_dir: WindDirection,
    /// Cumulative rain counter in mm (0.3 mm resolution)
    pub rain_counter_mm: f64,
}

/// Values computed from a [`StationReading`] rather than read off the wire.
///
/// `rain_delta_mm` and `total_rain_mm` come from the rain accumulator and
/// therefore depend on the previous cycle, not just the current reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedReadings {
    /// Magnus-approximation dew point in °C
    pub dew_point_c: f64,
    /// Wind chill in °C, never above ambient temperature
    pub wind_chill_c: f64,
    /// Rainfall since the previous sample in mm, spike-filtered
    pub rain_delta_mm: f64,
    /// Running rain total in mm, pinned across rejected spikes
    pub total_rain_mm: f64,
}

/// A complete sample as written to the output sink: decoded values, derived
/// values and the wall-clock time the cycle ran.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    /// Local wall-clock time the sample was taken
    pub timestamp: DateTime<Local>,
    /// Values decoded from the device
    pub reading: StationReading,
    /// Values computed from the reading
    pub derived: DerivedReadings,
}
