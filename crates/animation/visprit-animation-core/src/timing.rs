//! Playback timing: durations, cascade delays and easing presets.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;
use crate::style::Style;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    None,
    Forwards,
    Backwards,
    #[default]
    Both,
}

/// Timing descriptor handed to the playback host with a keyframe list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Milliseconds.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    pub easing: String,
    #[serde(default)]
    pub fill: FillMode,
}

impl Timing {
    /// Abrupt jump (reverts).
    pub fn instant() -> Self {
        Self {
            duration: 0.0,
            delay: None,
            easing: LINEAR.to_string(),
            fill: FillMode::Both,
        }
    }

    pub fn without_delay(mut self) -> Self {
        self.delay = None;
        self
    }
}

/// A keyframe list for one target, ready for the playback host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    /// Position of the target within its trigger's target list.
    pub target: usize,
    pub keyframes: Vec<Style>,
    pub timing: Timing,
}

pub const LINEAR: &str = "linear";

/// Named easing presets accepted in `easing`/`easingAlt`.
pub const EASINGS: &[(&str, &str)] = &[
    ("linear", "linear"),
    ("ease", "ease"),
    ("easeIn", "ease-in"),
    ("easeOut", "ease-out"),
    ("easeInOut", "ease-in-out"),
    ("easeInSine", "cubic-bezier(0.12, 0, 0.39, 0)"),
    ("easeOutSine", "cubic-bezier(0.61, 1, 0.88, 1)"),
    ("easeInOutSine", "cubic-bezier(0.37, 0, 0.63, 1)"),
    ("easeInQuad", "cubic-bezier(0.11, 0, 0.5, 0)"),
    ("easeOutQuad", "cubic-bezier(0.5, 1, 0.89, 1)"),
    ("easeInOutQuad", "cubic-bezier(0.45, 0, 0.55, 1)"),
    ("easeInCubic", "cubic-bezier(0.32, 0, 0.67, 0)"),
    ("easeOutCubic", "cubic-bezier(0.33, 1, 0.68, 1)"),
    ("easeInOutCubic", "cubic-bezier(0.65, 0, 0.35, 1)"),
    ("easeInQuart", "cubic-bezier(0.5, 0, 0.75, 0)"),
    ("easeOutQuart", "cubic-bezier(0.25, 1, 0.5, 1)"),
    ("easeInOutQuart", "cubic-bezier(0.76, 0, 0.24, 1)"),
    ("easeInExpo", "cubic-bezier(0.7, 0, 0.84, 0)"),
    ("easeOutExpo", "cubic-bezier(0.16, 1, 0.3, 1)"),
    ("easeInOutExpo", "cubic-bezier(0.87, 0, 0.13, 1)"),
    ("easeInBack", "cubic-bezier(0.36, 0, 0.66, -0.56)"),
    ("easeOutBack", "cubic-bezier(0.34, 1.56, 0.64, 1)"),
    ("easeInOutBack", "cubic-bezier(0.68, -0.6, 0.32, 1.6)"),
];

/// CSS easing for a preset name; unknown or missing names play linearly.
pub fn easing(name: Option<&str>) -> &'static str {
    name.and_then(|n| EASINGS.iter().find(|(k, _)| *k == n))
        .map(|(_, css)| *css)
        .unwrap_or(LINEAR)
}

/// Reads timing keys from a config, switching to the `*Alt` keys when the
/// caller asks for them and the config has `diffOptions` set.
#[derive(Clone, Copy, Debug)]
pub struct TimingSource<'a> {
    config: &'a AnimationConfig,
    alt: bool,
}

impl<'a> TimingSource<'a> {
    pub fn new(config: &'a AnimationConfig, alt: bool) -> Self {
        Self {
            config,
            alt: alt && config.flag("diffOptions"),
        }
    }

    /// `base` or `baseAlt`.
    pub fn key(&self, base: &'static str) -> Cow<'static, str> {
        if self.alt {
            Cow::Owned(format!("{base}Alt"))
        } else {
            Cow::Borrowed(base)
        }
    }

    pub fn number(&self, base: &'static str) -> f64 {
        self.config.number(&self.key(base))
    }

    pub fn text(&self, base: &'static str) -> Option<&'a str> {
        self.config.text(&self.key(base))
    }

    pub fn duration(&self) -> f64 {
        self.number("duration")
    }

    /// Configured delay shifted by the cascade interval for `index`. A zero
    /// or missing delay is returned as is.
    pub fn delay(&self, index: usize) -> Option<f64> {
        let key = self.key("delay");
        if !self.config.is_present(&key) {
            return None;
        }
        let delay = self.config.number(&key);
        if self.config.flag(&key) {
            Some(delay + self.cascade_interval() * index as f64)
        } else {
            Some(delay)
        }
    }

    pub fn cascade_interval(&self) -> f64 {
        self.config.number_or("cascadeInt", 0.0)
    }

    /// Full timing with a preset easing.
    pub fn timing(&self, index: usize) -> Timing {
        Timing {
            duration: self.duration(),
            delay: self.delay(index),
            easing: easing(self.text("easing")).to_string(),
            fill: FillMode::Both,
        }
    }

    /// Full timing with linear easing (spring tracks).
    pub fn linear_timing(&self, index: usize) -> Timing {
        Timing {
            easing: LINEAR.to_string(),
            ..self.timing(index)
        }
    }
}
