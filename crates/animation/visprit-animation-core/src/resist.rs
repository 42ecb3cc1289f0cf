//! Resist parsing: shape a scroll drive value before effect parsing.
//!
//! A bearing decides how the crank is clamped or re-signed per family, so a
//! scroll-linked effect can push one way and stop at rest the other way.

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;
use crate::effect::{derive_with, EffectData, EffectFamily};
use crate::numbers::{nan_max, nan_min, parse_float};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bearing {
    /// Never exceed the resting value.
    DamperUp,
    /// Never drop below the resting value.
    DamperDown,
    /// Always negative.
    ReturnUp,
    /// Always positive.
    ReturnDown,
    /// Absolute value (opacity only).
    Return,
    #[default]
    Passthrough,
}

impl Bearing {
    pub fn parse(s: &str) -> Self {
        match s {
            "damper-up" => Bearing::DamperUp,
            "damper-down" => Bearing::DamperDown,
            "return-up" => Bearing::ReturnUp,
            "return-down" => Bearing::ReturnDown,
            "return" => Bearing::Return,
            _ => Bearing::Passthrough,
        }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        config.text("bearing").map(Bearing::parse).unwrap_or_default()
    }
}

/// Clamp or re-sign a transform magnitude against a resting value.
pub fn resist_magnitude(bearing: Bearing, magnitude: f64, resting: f64) -> f64 {
    match bearing {
        Bearing::DamperUp if magnitude > resting => resting,
        Bearing::DamperDown if magnitude < resting => resting,
        Bearing::ReturnDown => magnitude.abs(),
        Bearing::ReturnUp => -magnitude.abs(),
        _ => magnitude,
    }
}

/// Apply a bearing to a magnitude for one family.
pub fn resist(family: EffectFamily, bearing: Bearing, magnitude: f64) -> f64 {
    match family {
        EffectFamily::ClipPath => match bearing {
            Bearing::DamperUp => nan_min(magnitude, 0.0),
            Bearing::DamperDown => nan_max(magnitude, 0.0),
            _ => magnitude,
        },
        EffectFamily::Opacity => match bearing {
            Bearing::DamperUp => -magnitude,
            Bearing::Return => magnitude.abs(),
            _ => magnitude,
        },
        _ => {
            let resting = family
                .resting_prop()
                .map(|p| parse_float(p.default_value()))
                .unwrap_or(0.0);
            resist_magnitude(bearing, magnitude, resting)
        }
    }
}

/// Derive effect values for one scroll sample: every typed family is fed the
/// resisted crank instead of its configured magnitude.
pub fn derive_resist_style(config: &AnimationConfig, crank: f64) -> EffectData {
    let bearing = Bearing::from_config(config);
    derive_with(config, false, |family| resist(family, bearing, crank))
}
