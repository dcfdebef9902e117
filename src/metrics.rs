//! Dew point & wind chill (Magnus 1844 form / Environment Canada 2001 index)
//!
//! Pure conversions from decoded sensor values; no station state involved.
//! Accuracy: the Magnus constants used here (17.271, 237.7) are good to
//! ±0.4 °C over roughly 0–60 °C; the wind chill index is the standard
//! North American WCT regression.

/// Dew point in °C from air temperature (°C) and relative humidity (%).
///
/// Magnus-form approximation:
/// `gamma = 17.271·T / (237.7 + T) + ln(h/100)`,
/// `dp = 237.7·gamma / (17.271 − gamma)`.
///
/// `humidity_pct` must be in (0, 100]; `ln` of zero or a negative fraction
/// is undefined and the caller is expected to guarantee the domain.
/// At 100 % humidity the log term vanishes and the dew point equals the air
/// temperature.
pub fn dew_point(temp_c: f64, humidity_pct: f64) -> f64 {
    let gamma = (17.271 * temp_c) / (237.7 + temp_c) + (humidity_pct / 100.0).ln();
    (237.7 * gamma) / (17.271 - gamma)
}

/// Wind chill temperature in °C from air temperature (°C) and wind speed
/// in m/s.
///
/// Below 4.8 km/h of wind, or above 10 °C, wind chill is not meaningful and
/// the air temperature is returned unchanged. The result is capped at the
/// air temperature: perceived temperature is never reported above ambient.
pub fn wind_chill(temp_c: f64, wind_ms: f64) -> f64 {
    let wind_kph = 3.6 * wind_ms;

    // Low wind speed, or high temperature, negates any perceived chill
    if wind_kph <= 4.8 || temp_c > 10.0 {
        return temp_c;
    }

    let wct = 13.12 + 0.6215 * temp_c - 11.37 * wind_kph.powf(0.16)
        + 0.3965 * temp_c * wind_kph.powf(0.16);

    wct.min(temp_c)
}
