use std::time::Duration;

use gpui::SharedString;
use number_format::{DEFAULT_LOCALE, NumberFormatOptions, StepConfig};
use serde::{Deserialize, Serialize};

use crate::NumberFieldConfigError;

/// Everything a number field needs to know up front.
///
/// Deserializes from camelCase JSON; omitted keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFieldConfig {
    pub id: Option<SharedString>,
    /// Form field name the value is submitted under.
    pub name: Option<SharedString>,
    /// Initial value of an uncontrolled field.
    pub default_value: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub small_step: f64,
    pub large_step: f64,
    pub disabled: bool,
    pub read_only: bool,
    pub required: bool,
    /// Step the value with the mouse wheel while the input is focused.
    pub allow_wheel_scrub: bool,
    pub locale: SharedString,
    pub format: NumberFormatOptions,
    pub scrub: ScrubConfig,
    pub auto_repeat: AutoRepeatTiming,
}

impl Default for NumberFieldConfig {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            default_value: None,
            min: None,
            max: None,
            step: None,
            small_step: 0.1,
            large_step: 10.0,
            disabled: false,
            read_only: false,
            required: false,
            allow_wheel_scrub: false,
            locale: DEFAULT_LOCALE.into(),
            format: NumberFormatOptions::default(),
            scrub: ScrubConfig::default(),
            auto_repeat: AutoRepeatTiming::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrubDirection {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrubConfig {
    pub direction: ScrubDirection,
    /// Pointer travel, in pixels, per committed step.
    pub pixel_sensitivity: f32,
    /// When set, the virtual cursor wraps around the scrub area inflated by
    /// half this distance on each side instead of around the viewport.
    pub teleport_distance: Option<f32>,
    pub cursor_width: f32,
    pub cursor_height: f32,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            direction: ScrubDirection::Horizontal,
            pixel_sensitivity: 2.0,
            teleport_distance: None,
            cursor_width: 0.0,
            cursor_height: 0.0,
        }
    }
}

/// Timing of press-and-hold stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoRepeatTiming {
    pub start_delay_ms: u64,
    pub tick_interval_ms: u64,
    /// How long a touch press waits before it counts as a press rather than a scroll.
    pub touch_confirm_ms: u64,
    /// Touch moves during the confirmation window at which the press is treated as a scroll.
    pub max_touch_moves: u32,
}

impl Default for AutoRepeatTiming {
    fn default() -> Self {
        Self {
            start_delay_ms: 400,
            tick_interval_ms: 60,
            touch_confirm_ms: 50,
            max_touch_moves: 3,
        }
    }
}

impl AutoRepeatTiming {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn touch_confirm(&self) -> Duration {
        Duration::from_millis(self.touch_confirm_ms)
    }
}

impl NumberFieldConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: impl AsRef<str>) -> Result<Self, NumberFieldConfigError> {
        let config: Self = serde_json::from_str(json.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NumberFieldConfigError> {
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            return Err(NumberFieldConfigError::MinGreaterThanMax { min, max });
        }

        if let Some(step) = self.step {
            check_step("step", step)?;
        }
        check_step("smallStep", self.small_step)?;
        check_step("largeStep", self.large_step)?;

        let sensitivity = self.scrub.pixel_sensitivity;
        if !(sensitivity.is_finite() && sensitivity > 0.0) {
            return Err(NumberFieldConfigError::InvalidPixelSensitivity(sensitivity));
        }

        if let Some(distance) = self.scrub.teleport_distance
            && distance < 0.0
        {
            return Err(NumberFieldConfigError::NegativeTeleportDistance(distance));
        }

        self.format.validate()?;

        Ok(())
    }

    /// Replaces every invalid field with its default, logging what was dropped.
    pub(crate) fn sanitize(mut self) -> Self {
        let Err(err) = self.validate() else {
            return self;
        };
        log::warn!("number field config is invalid, falling back to defaults: {err}");

        let defaults = Self::default();

        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            self.min = None;
            self.max = None;
        }
        if self.step.is_some_and(|step| !is_valid_step(step)) {
            self.step = None;
        }
        if !is_valid_step(self.small_step) {
            self.small_step = defaults.small_step;
        }
        if !is_valid_step(self.large_step) {
            self.large_step = defaults.large_step;
        }

        let sensitivity = self.scrub.pixel_sensitivity;
        if !(sensitivity.is_finite() && sensitivity > 0.0) {
            self.scrub.pixel_sensitivity = defaults.scrub.pixel_sensitivity;
        }
        if self.scrub.teleport_distance.is_some_and(|d| d < 0.0) {
            self.scrub.teleport_distance = None;
        }

        if self.format.validate().is_err() {
            self.format = defaults.format;
        }

        self
    }

    /// Bounds and steps in the shape the validator expects.
    pub fn step_config(&self) -> StepConfig {
        StepConfig {
            step: self.step,
            small_step: self.small_step,
            large_step: self.large_step,
            min: self.min,
            max: self.max,
        }
    }
}

fn is_valid_step(step: f64) -> bool {
    step.is_finite() && step > 0.0
}

fn check_step(name: &'static str, value: f64) -> Result<(), NumberFieldConfigError> {
    if is_valid_step(value) {
        Ok(())
    } else {
        Err(NumberFieldConfigError::InvalidStep { name, value })
    }
}
