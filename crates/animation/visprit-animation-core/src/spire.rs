//! Spire: per-element scroll progress.
//!
//! Converts raw scroll offsets into a signed stride (distance between the
//! element and its configured origin line), a direction-dependent
//! resistance, and the crank `stride / resist` that drives scroll-linked
//! effects. It also owns the one-way latches used by the triggers:
//! `activated`, `peeked` and `unveiled` never go back to false.

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;
use crate::error::ConfigError;
use crate::host::{ElementProbe, Rect, ScrollSample};
use crate::numbers::parse_float;

/// Where along the viewport the stride is measured from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
    /// Element centered in the viewport.
    #[default]
    Center,
    Top,
    Bottom,
    /// Fixed offset from the viewport top, in pixels.
    Pixels(f64),
    /// Offset from the viewport top as a percentage of its height.
    Percent(f64),
}

impl Origin {
    pub fn from_config(config: &AnimationConfig) -> Self {
        match config.text("origin") {
            Some("top") => Origin::Top,
            Some("bottom") => Origin::Bottom,
            Some("custom") if config.flag("originSize") => match config.text("originSize") {
                Some(size) if size.contains('%') => Origin::Percent(parse_float(size)),
                _ => Origin::Pixels(config.number("originSize")),
            },
            _ => Origin::Center,
        }
    }

    /// Offset of the origin line from the viewport top.
    pub fn offset(self, viewport_height: f64, element_height: f64) -> f64 {
        match self {
            Origin::Center => (viewport_height - element_height) / 2.0,
            Origin::Top => 0.0,
            Origin::Bottom => viewport_height - element_height,
            Origin::Pixels(px) => px,
            Origin::Percent(pct) => viewport_height * (pct / 100.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpireSettings {
    pub origin: Origin,
    pub resist_up: f64,
    pub resist_down: f64,
    /// Start disarmed until the stride first changes sign.
    pub has_activate: bool,
    /// Visibility percentage needed to count as peeked.
    pub peek: f64,
}

impl Default for SpireSettings {
    fn default() -> Self {
        Self {
            origin: Origin::Center,
            resist_up: 1.0,
            resist_down: 1.0,
            has_activate: false,
            peek: 0.0,
        }
    }
}

impl SpireSettings {
    /// Read scroll settings. Missing resistances default to 1; a zero or
    /// non-finite resistance is rejected.
    pub fn from_config(config: &AnimationConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            origin: Origin::from_config(config),
            resist_up: resistance(config, "resistUp")?,
            resist_down: resistance(config, "resistDown")?,
            has_activate: config.flag("hasActivate"),
            peek: config.number("peek"),
        })
    }
}

fn resistance(config: &AnimationConfig, key: &'static str) -> Result<f64, ConfigError> {
    if !config.is_present(key) {
        return Ok(1.0);
    }
    let value = config.number(key);
    if value == 0.0 || !value.is_finite() {
        return Err(ConfigError::InvalidResistance { key, value });
    }
    Ok(value)
}

/// Per-element scroll state.
#[derive(Clone, Debug, PartialEq)]
pub struct Spire {
    settings: SpireSettings,
    el_distance_top: f64,
    el_offset_height: f64,
    stride: f64,
    resist: f64,
    crank: f64,
    first_stride: f64,
    activated: bool,
    unveiled: bool,
    peeked: bool,
}

impl Spire {
    pub fn new(settings: SpireSettings) -> Self {
        Self {
            settings,
            el_distance_top: 0.0,
            el_offset_height: 0.0,
            stride: 0.0,
            resist: 1.0,
            crank: 0.0,
            first_stride: 0.0,
            activated: !settings.has_activate,
            unveiled: false,
            peeked: false,
        }
    }

    /// Process one scroll sample; returns the new crank.
    pub fn scroll(&mut self, probe: &(impl ElementProbe + ?Sized), sample: &ScrollSample) -> f64 {
        self.stride = self.stride_at(probe, sample);
        self.resist = self.resist_at(sample);
        self.crank = self.stride / self.resist;
        self.check_activation();
        self.crank
    }

    fn stride_at(&mut self, probe: &(impl ElementProbe + ?Sized), sample: &ScrollSample) -> f64 {
        // Measured once; a zero reading is taken again on the next sample.
        if self.el_distance_top == 0.0 || self.el_distance_top.is_nan() {
            self.el_distance_top = sample.scroll_y + probe.bounding_rect().top;
            self.el_offset_height = probe.offset_height();
        }
        let origin = self
            .settings
            .origin
            .offset(sample.viewport.height, self.el_offset_height);
        -(sample.scroll_y + origin - self.el_distance_top)
    }

    fn resist_at(&self, sample: &ScrollSample) -> f64 {
        if sample.scroll_y - sample.previous_scroll_y < 0.0 {
            self.settings.resist_up
        } else {
            self.settings.resist_down
        }
    }

    fn check_activation(&mut self) {
        if self.first_stride == 0.0 || self.first_stride.is_nan() {
            self.first_stride = self.stride;
        }
        if self.activated {
            return;
        }
        if (self.first_stride < 0.0 && self.stride >= 0.0)
            || (self.first_stride > 0.0 && self.stride <= 0.0)
        {
            log::debug!("spire armed at stride {}", self.stride);
            self.activated = true;
        }
    }

    /// Visible by at least the configured peek percentage right now. Latches
    /// `peeked` when true.
    pub fn has_peeked(&mut self, rect: &Rect, viewport_height: f64) -> bool {
        let visible = is_peeked_into_view(rect, viewport_height, self.settings.peek);
        if visible {
            self.peeked = true;
        }
        visible
    }

    /// Any part visible right now. Latches `unveiled` when true.
    pub fn has_unveiled(&mut self, rect: &Rect, viewport_height: f64) -> bool {
        let visible = is_peeked_into_view(rect, viewport_height, 0.0);
        if visible {
            self.unveiled = true;
        }
        visible
    }

    #[inline]
    pub fn stride(&self) -> f64 {
        self.stride
    }

    #[inline]
    pub fn resist(&self) -> f64 {
        self.resist
    }

    #[inline]
    pub fn crank(&self) -> f64 {
        self.crank
    }

    #[inline]
    pub fn activated(&self) -> bool {
        self.activated
    }

    #[inline]
    pub fn unveiled(&self) -> bool {
        self.unveiled
    }

    #[inline]
    pub fn peeked(&self) -> bool {
        self.peeked
    }
}

/// Whether at least `percent` of the element is inside the viewport on both
/// edges. A NaN threshold never fails.
pub fn is_peeked_into_view(rect: &Rect, viewport_height: f64, percent: f64) -> bool {
    let peek_top = (if rect.top >= 0.0 { 0.0 } else { rect.top }) / -rect.height;
    let peek_bottom = (rect.bottom - viewport_height) / rect.height;
    !((100.0 - peek_top * 100.0).floor() < percent
        || (100.0 - peek_bottom * 100.0).floor() < percent)
}
