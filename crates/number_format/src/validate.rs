use serde::{Deserialize, Serialize};

use crate::{NumberFormatCache, NumberFormatOptions, options::MAX_FRACTION_DIGITS, parse_number};

/// Largest integer an `f64` represents exactly, `2^53 - 1`.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
/// Smallest integer an `f64` represents exactly, `-(2^53 - 1)`.
pub const MIN_SAFE_INTEGER: f64 = -MAX_SAFE_INTEGER;
/// Step used by stepping operations when none is configured.
pub const DEFAULT_STEP: f64 = 1.0;

const ROUND_TRIP_LOCALE: &str = "en-US";

/// Bounds and step sizes a value is validated against.
///
/// `min` doubles as the origin of the step lattice, so with `min: 1` and
/// `step: 2` the allowed values are `1, 3, 5, ...`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepConfig {
    /// Quantization step. `None` leaves values unsnapped.
    pub step: Option<f64>,
    /// Step applied while the alt modifier is held.
    pub small_step: f64,
    /// Step applied while the shift modifier is held.
    pub large_step: f64,
    /// Lower bound, defaulting to [`MIN_SAFE_INTEGER`].
    pub min: Option<f64>,
    /// Upper bound, defaulting to [`MAX_SAFE_INTEGER`].
    pub max: Option<f64>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            step: None,
            small_step: 0.1,
            large_step: 10.0,
            min: None,
            max: None,
        }
    }
}

impl StepConfig {
    /// Returns a copy quantized to `step`.
    pub fn with_step(mut self, step: Option<f64>) -> Self {
        self.step = step;
        self
    }

    #[allow(missing_docs)]
    pub fn min_or_default(&self) -> f64 {
        self.min.unwrap_or(MIN_SAFE_INTEGER)
    }

    #[allow(missing_docs)]
    pub fn max_or_default(&self) -> f64 {
        self.max.unwrap_or(MAX_SAFE_INTEGER)
    }

    /// Origin of the step lattice.
    pub fn origin(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }
}

/// Clamps `value` into range and snaps it onto the step lattice.
///
/// NaN and `None` validate to `None`. When a bound is not itself on the
/// lattice, a value snapped past it moves one step back inside the range.
pub fn validate_value(
    value: Option<f64>,
    config: &StepConfig,
    options: &NumberFormatOptions,
) -> Option<f64> {
    let value = value.filter(|value| !value.is_nan())?;

    let min = config.min_or_default();
    let max = config.max_or_default();
    let clamped = value.max(min).min(max);

    let Some(step) = config.step.filter(|step| step.is_finite() && *step > 0.0) else {
        return Some(clamped);
    };

    let origin = config.origin();
    let lattice_digits = fraction_digit_count(step).max(fraction_digit_count(origin));
    let snap = |k: f64| snap_to_lattice(origin + k * step, lattice_digits, options);

    let k = ((clamped - origin) / step).round();
    let mut snapped = snap(k);
    if snapped > max {
        snapped = snap(k - 1.0);
    } else if snapped < min {
        snapped = snap(k + 1.0);
    }

    Some(snapped.max(min).min(max))
}

/// Strips binary floating-point noise such as `0.1 + 0.2 = 0.30000000000000004`.
///
/// The value is formatted ungrouped in `en-US` with 15 significant digits
/// (further limited by the options' maximum fraction digits) and parsed back.
pub fn remove_floating_point_errors(value: f64, options: &NumberFormatOptions) -> f64 {
    if !value.is_finite() || value.fract() == 0.0 {
        return value;
    }

    round_trip(value, &options.round_trip())
}

/// Like [`remove_floating_point_errors`], but also rounds to the decimals the
/// lattice can produce. `origin + k * step` loses precision to `origin`'s
/// magnitude, which significant digits of the result alone don't catch.
fn snap_to_lattice(value: f64, lattice_digits: u8, options: &NumberFormatOptions) -> f64 {
    if !value.is_finite() || value.fract() == 0.0 {
        return value;
    }

    let mut round_trip_options = options.round_trip();
    round_trip_options.maximum_fraction_digits = round_trip_options
        .maximum_fraction_digits
        .map(|digits| digits.min(lattice_digits));

    round_trip(value, &round_trip_options)
}

fn round_trip(value: f64, round_trip_options: &NumberFormatOptions) -> f64 {
    let text = NumberFormatCache::global()
        .get_formatter(ROUND_TRIP_LOCALE, round_trip_options)
        .format(value);

    parse_number(&text, ROUND_TRIP_LOCALE, round_trip_options).unwrap_or(value)
}

/// Decimals in the shortest representation of `value`, e.g. `2` for `0.25`.
fn fraction_digit_count(value: f64) -> u8 {
    let text = value.abs().to_string();
    text.split_once('.').map_or(0, |(_, fraction)| {
        fraction.len().min(usize::from(MAX_FRACTION_DIGITS)) as u8
    })
}
