use tracing::info;

use crate::core::error::ThermoError;

/// Highest raw reading of the 12-bit set-temperature potentiometer.
pub const KNOB_MAX_RAW: u16 = 4095;

// Set-point range in tenths of a degree Fahrenheit.
const MIN_TENTHS: i32 = 650;
const MAX_TENTHS: i32 = 850;

/// Maps a raw knob reading to tenths of a degree, 65.0 ..= 85.0 °F.
///
/// Integer arithmetic, truncating like the board's `map()` helper, so the
/// top of the knob lands exactly on 85.0.
pub fn knob_to_tenths(raw: u16) -> i32 {
    let raw = i32::from(raw.min(KNOB_MAX_RAW));
    raw * (MAX_TENTHS - MIN_TENTHS) / i32::from(KNOB_MAX_RAW) + MIN_TENTHS
}

/// Desired temperature, fed by the knob and by controller commands.
///
/// A controller command pins the set point ("override"). While pinned the knob
/// is ignored, except that turning it all the way up releases the override
/// and hands control back to the knob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPoint {
    fahrenheit: f32,
    overridden: bool,
}

impl SetPoint {
    pub fn from_knob(raw: u16) -> Self {
        Self {
            fahrenheit: knob_to_tenths(raw) as f32 / 10.0,
            overridden: false,
        }
    }

    #[inline]
    pub fn fahrenheit(&self) -> f32 {
        self.fahrenheit
    }

    #[inline]
    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// Feeds a fresh knob reading and returns the effective set point.
    pub fn update_from_knob(&mut self, raw: u16) -> f32 {
        let tenths = knob_to_tenths(raw);
        if self.overridden && tenths != MAX_TENTHS {
            return self.fahrenheit;
        }
        if self.overridden {
            info!(target: "thermoq::device", "knob at maximum; set-point override released");
        }
        self.overridden = false;
        self.fahrenheit = tenths as f32 / 10.0;
        self.fahrenheit
    }

    /// Applies a controller set-temp payload such as `"76.5"`.
    pub fn apply_command(&mut self, topic: &str, payload: &str) -> Result<f32, ThermoError> {
        let value: f32 = payload
            .trim()
            .parse()
            .ok()
            .filter(|v: &f32| v.is_finite())
            .ok_or_else(|| ThermoError::InvalidPayload {
                topic: topic.to_string(),
                payload: payload.to_string(),
            })?;

        self.fahrenheit = (value * 10.0).round() / 10.0;
        self.overridden = true;
        info!(target: "thermoq::device", set_temp = self.fahrenheit, "controller override");
        Ok(self.fahrenheit)
    }
}
