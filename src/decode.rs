//! # Current-Block Decoding
//!
//! Bit-level unpacking of the station's 32-byte current data block into a
//! [`StationReading`].
//!
//! Layout of the current block (byte offsets):
//!
//! | bytes | field | transform |
//! |-------|---------------------|-----------------------------------|
//! | 1     | indoor humidity     | raw percent |
//! | 2–3   | indoor temperature  | sign-magnitude LSB/MSB × 0.1 °C |
//! | 4     | outdoor humidity    | raw percent |
//! | 5–6   | outdoor temperature | sign-magnitude LSB/MSB × 0.1 °C |
//! | 7–8   | absolute pressure   | LE u16 × 0.1 hPa |
//! | 9     | wind speed low bits | with `b11 & 0x0F` high nibble, × 0.38 km/h |
//! | 10    | gust speed low bits | with `b11 & 0xF0` high nibble, × 0.38 km/h |
//! | 11    | wind/gust extra     | packed high nibbles |
//! | 12    | wind direction      | index into the 16-point compass |
//! | 13–14 | rain counter        | LE u16 × 0.3 mm, cumulative |
//!
//! Protocol assumption: both the pressure and the rain counter are taken
//! from the *current* block, not the fixed block. Field hunting on real
//! hardware showed the fixed-block variants going stale while these track
//! the sensors.
//!
//! Nothing here is range-checked beyond the wind-direction index. The
//! decode is permissive by contract: out-of-range humidity or pressure is
//! passed through for the consumer to judge.

use crate::StationReading;
use thiserror::Error;

/// Scale factor for sign-magnitude temperature fields (°C per count).
const TEMP_SCALE: f64 = 0.1;
/// Scale factor for the absolute pressure field (hPa per count).
const PRESSURE_SCALE: f64 = 0.1;
/// Scale factor for wind and gust speed (km/h per count).
const WIND_SCALE: f64 = 0.38;
/// Scale factor for the cumulative rain counter (mm per count).
const RAIN_SCALE: f64 = 0.3;

/// Errors raised while unpacking a current block.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Wind direction byte outside the 16-entry compass table
    #[error("bad wind direction index: {0} (expected 0-15)")]
    BadWindDirection(u8),
}

/// The station's 16-point compass rose, in table order starting at north.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindDirection {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

impl WindDirection {
    const TABLE: [WindDirection; 16] = [
        WindDirection::N,
        WindDirection::Nne,
        WindDirection::Ne,
        WindDirection::Ene,
        WindDirection::E,
        WindDirection::Ese,
        WindDirection::Se,
        WindDirection::Sse,
        WindDirection::S,
        WindDirection::Ssw,
        WindDirection::Sw,
        WindDirection::Wsw,
        WindDirection::W,
        WindDirection::Wnw,
        WindDirection::Nw,
        WindDirection::Nnw,
    ];

    /// Look up a direction from the station's 0–15 index.
    pub fn from_index(index: u8) -> Result<Self, DecodeError> {
        Self::TABLE
            .get(index as usize)
            .copied()
            .ok_or(DecodeError::BadWindDirection(index))
    }

    /// Compass-point abbreviation as written to the output record.
    pub fn as_str(&self) -> &'static str {
        match self {
            WindDirection::N => "N",
            WindDirection::Nne => "NNE",
            WindDirection::Ne => "NE",
            WindDirection::Ene => "ENE",
            WindDirection::E => "E",
            WindDirection::Ese => "ESE",
            WindDirection::Se => "SE",
            WindDirection::Sse => "SSE",
            WindDirection::S => "S",
            WindDirection::Ssw => "SSW",
            WindDirection::Sw => "SW",
            WindDirection::Wsw => "WSW",
            WindDirection::W => "W",
            WindDirection::Wnw => "WNW",
            WindDirection::Nw => "NW",
            WindDirection::Nnw => "NNW",
        }
    }
}

impl std::fmt::Display for WindDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode a sign-magnitude field: bit 7 of the MSB is the sign, the
/// remaining 15 bits are the magnitude in counts.
fn sign_magnitude(lsb: u8, msb: u8, scale: f64) -> f64 {
    let magnitude = ((msb & 0x7F) as u16 as f64 * 256.0 + lsb as f64) * scale;
    if msb >> 7 == 1 {
        -magnitude
    } else {
        magnitude
    }
}

/// Unpack one current block into a [`StationReading`].
///
/// Fails only on an out-of-range wind direction index; every other field is
/// decoded unconditionally.
pub fn decode_current_block(block: &[u8; 32]) -> Result<StationReading, DecodeError> {
    let indoor_humidity = block[1];
    let indoor_temp_c = sign_magnitude(block[2], block[3], TEMP_SCALE);

    let outdoor_humidity = block[4];
    let outdoor_temp_c = sign_magnitude(block[5], block[6], TEMP_SCALE);

    let abs_pressure_hpa = u16::from_le_bytes([block[7], block[8]]) as f64 * PRESSURE_SCALE;

    // Wind and gust share byte 11: low nibble extends the wind byte, high
    // nibble extends the gust byte.
    let wind = block[9] as u16;
    let gust = block[10] as u16;
    let wind_extra = block[11] as u16;
    let wind_speed_kmh = (wind + ((wind_extra & 0x0F) << 8)) as f64 * WIND_SCALE;
    let gust_speed_kmh = (gust + ((wind_extra & 0xF0) << 4)) as f64 * WIND_SCALE;

    let wind_dir = WindDirection::from_index(block[12])?;

    let rain_counter_mm = u16::from_le_bytes([block[13], block[14]]) as f64 * RAIN_SCALE;

    Ok(StationReading {
        indoor_humidity,
        outdoor_humidity,
        indoor_temp_c,
        outdoor_temp_c,
        abs_pressure_hpa,
        wind_speed_kmh,
        gust_speed_kmh,
        wind_dir,
        rain_counter_mm,
    })
}
