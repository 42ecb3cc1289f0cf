//! Effect parsing: (direction, magnitude) per visual family -> concrete values.
//!
//! Each family has a closed set of directions and a default branch used for
//! anything unrecognized. Reverse mode (hover exit) swaps every direction for
//! its opposite; a direction with no known opposite drops the family.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::AnimationConfig;
use crate::numbers::format_number;
use crate::props::TransformProp;

/// Concrete property values derived from a config.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectFragment {
    #[serde(default)]
    pub transforms: BTreeMap<TransformProp, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl EffectFragment {
    pub fn with_transform(mut self, prop: TransformProp, value: impl Into<String>) -> Self {
        self.transforms.insert(prop, value.into());
        self
    }

    #[inline]
    pub fn transform(&self, prop: TransformProp) -> Option<&str> {
        self.transforms.get(&prop).map(String::as_str)
    }

    /// Overlay `other` on top of `self`; values in `other` win.
    pub fn merge(&mut self, other: EffectFragment) {
        self.transforms.extend(other.transforms);
        if other.clip_path.is_some() {
            self.clip_path = other.clip_path;
        }
        if other.opacity.is_some() {
            self.opacity = other.opacity;
        }
    }

    /// Property values given verbatim in a config (`translateX: "12px"`,
    /// `clipPath: "inset(10% 0%)"`, `opacity: 0.4`).
    pub fn from_config(config: &AnimationConfig) -> Self {
        let mut fragment = EffectFragment::default();
        for prop in TransformProp::ALL {
            if !config.flag(prop.name()) {
                continue;
            }
            if let Some(value) = config.get(prop.name()) {
                fragment.transforms.insert(prop, value_text(value));
            }
        }
        if config.is_present("clipPath") {
            fragment.clip_path = config.get("clipPath").map(value_text);
        }
        if config.is_present("opacity") {
            fragment.opacity = Some(config.number("opacity"));
        }
        fragment
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty() && self.clip_path.is_none() && self.opacity.is_none()
    }
}

/// The result of one derivation pass: the config with consumed magnitude keys
/// removed, and the concrete values that replaced them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectData {
    pub config: AnimationConfig,
    pub fragment: EffectFragment,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectFamily {
    Translate,
    Rotate,
    Skew,
    Scale,
    ClipPath,
    Opacity,
}

impl EffectFamily {
    /// Processing order of a derivation pass.
    pub const ALL: [EffectFamily; 6] = [
        EffectFamily::Translate,
        EffectFamily::Rotate,
        EffectFamily::Skew,
        EffectFamily::Scale,
        EffectFamily::ClipPath,
        EffectFamily::Opacity,
    ];

    /// Config key holding the family's magnitude.
    pub fn key(self) -> &'static str {
        match self {
            EffectFamily::Translate => "translate",
            EffectFamily::Rotate => "rotate",
            EffectFamily::Skew => "skew",
            EffectFamily::Scale => "scale",
            EffectFamily::ClipPath => "clipPath",
            EffectFamily::Opacity => "opacity",
        }
    }

    /// Config key holding the family's direction.
    pub fn type_key(self) -> &'static str {
        match self {
            EffectFamily::Translate => "translateType",
            EffectFamily::Rotate => "rotateType",
            EffectFamily::Skew => "skewType",
            EffectFamily::Scale => "scaleType",
            EffectFamily::ClipPath => "clipPathType",
            EffectFamily::Opacity => "opacityType",
        }
    }

    /// Resting value the resist parser clamps against, for transform families.
    pub fn resting_prop(self) -> Option<TransformProp> {
        match self {
            EffectFamily::Translate => Some(TransformProp::TranslateX),
            EffectFamily::Rotate => Some(TransformProp::Rotate),
            EffectFamily::Skew => Some(TransformProp::SkewX),
            EffectFamily::Scale => Some(TransformProp::Scale),
            EffectFamily::ClipPath | EffectFamily::Opacity => None,
        }
    }

    /// Parse `direction` for this family and produce its values.
    ///
    /// Forward mode falls back to the family default for unknown directions;
    /// reverse mode returns `None` for them.
    pub fn apply(self, direction: &str, magnitude: f64, reverse: bool) -> Option<EffectFragment> {
        macro_rules! pick {
            ($dir:ty) => {{
                let parsed = <$dir>::parse(direction);
                if reverse {
                    parsed.map(|d| d.reversed())?
                } else {
                    parsed.unwrap_or_default()
                }
            }};
        }
        let fragment = match self {
            EffectFamily::Translate => translate(pick!(TranslateDirection), magnitude),
            EffectFamily::Rotate => rotate(pick!(RotateDirection), magnitude),
            EffectFamily::Skew => skew(pick!(SkewDirection), magnitude),
            EffectFamily::Scale => scale(pick!(ScaleDirection), magnitude),
            EffectFamily::ClipPath => clip_path(pick!(ClipDirection), magnitude),
            EffectFamily::Opacity => opacity(magnitude),
        };
        Some(fragment)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TranslateDirection {
    Left,
    Right,
    Top,
    #[default]
    Bottom,
    TopLeft,
    TopRight,
    BotLeft,
    BotRight,
}

impl TranslateDirection {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "left" => Self::Left,
            "right" => Self::Right,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "topleft" => Self::TopLeft,
            "topright" => Self::TopRight,
            "botleft" => Self::BotLeft,
            "botright" => Self::BotRight,
            _ => return None,
        })
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::TopLeft => Self::BotRight,
            Self::BotRight => Self::TopLeft,
            Self::TopRight => Self::BotLeft,
            Self::BotLeft => Self::TopRight,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RotateDirection {
    Left,
    Right,
    #[default]
    Top,
    Bottom,
    Clockwise,
    Counter,
}

impl RotateDirection {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "left" => Self::Left,
            "right" => Self::Right,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "clockwise" => Self::Clockwise,
            "counter" => Self::Counter,
            _ => return None,
        })
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Clockwise => Self::Counter,
            Self::Counter => Self::Clockwise,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SkewDirection {
    VLeft,
    VRight,
    HTop,
    #[default]
    HBottom,
}

impl SkewDirection {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "vleft" => Self::VLeft,
            "vright" => Self::VRight,
            "htop" => Self::HTop,
            "hbottom" => Self::HBottom,
            _ => return None,
        })
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::VLeft => Self::VRight,
            Self::VRight => Self::VLeft,
            Self::HTop => Self::HBottom,
            Self::HBottom => Self::HTop,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScaleDirection {
    HIn,
    HOut,
    VIn,
    #[default]
    VOut,
    In,
    Out,
}

impl ScaleDirection {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "hin" => Self::HIn,
            "hout" => Self::HOut,
            "vin" => Self::VIn,
            "vout" => Self::VOut,
            "in" => Self::In,
            "out" => Self::Out,
            _ => return None,
        })
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::HIn => Self::HOut,
            Self::HOut => Self::HIn,
            Self::VIn => Self::VOut,
            Self::VOut => Self::VIn,
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ClipDirection {
    Left,
    Right,
    Top,
    #[default]
    Bottom,
    HOut,
    VOut,
    VhOut,
}

impl ClipDirection {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "left" => Self::Left,
            "right" => Self::Right,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "hout" => Self::HOut,
            "vout" => Self::VOut,
            "vhout" => Self::VhOut,
            _ => return None,
        })
    }

    /// The symmetric insets are their own opposite.
    pub fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::HOut | Self::VOut | Self::VhOut => self,
        }
    }
}

fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

fn deg(value: f64) -> String {
    format!("{}deg", format_number(value))
}

pub fn translate(direction: TranslateDirection, distance: f64) -> EffectFragment {
    use TransformProp::{TranslateX as X, TranslateY as Y};
    let f = EffectFragment::default();
    match direction {
        TranslateDirection::Left => f.with_transform(X, px(distance)),
        TranslateDirection::Right => f.with_transform(X, px(-distance)),
        TranslateDirection::Top => f.with_transform(Y, px(distance)),
        TranslateDirection::Bottom => f.with_transform(Y, px(-distance)),
        TranslateDirection::TopLeft => f
            .with_transform(Y, px(distance))
            .with_transform(X, px(distance)),
        TranslateDirection::TopRight => f
            .with_transform(Y, px(distance))
            .with_transform(X, px(-distance)),
        TranslateDirection::BotLeft => f
            .with_transform(Y, px(-distance))
            .with_transform(X, px(distance)),
        TranslateDirection::BotRight => f
            .with_transform(Y, px(-distance))
            .with_transform(X, px(-distance)),
    }
}

pub fn rotate(direction: RotateDirection, degrees: f64) -> EffectFragment {
    let f = EffectFragment::default();
    match direction {
        RotateDirection::Left => f.with_transform(TransformProp::RotateY, deg(degrees)),
        RotateDirection::Right => f.with_transform(TransformProp::RotateY, deg(-degrees)),
        RotateDirection::Top => f.with_transform(TransformProp::RotateX, deg(-degrees)),
        RotateDirection::Bottom => f.with_transform(TransformProp::RotateX, deg(degrees)),
        RotateDirection::Clockwise => f.with_transform(TransformProp::Rotate, deg(-degrees)),
        RotateDirection::Counter => f.with_transform(TransformProp::Rotate, deg(degrees)),
    }
}

pub fn skew(direction: SkewDirection, degrees: f64) -> EffectFragment {
    let f = EffectFragment::default();
    match direction {
        SkewDirection::VLeft => f.with_transform(TransformProp::SkewY, deg(degrees)),
        SkewDirection::VRight => f.with_transform(TransformProp::SkewY, deg(-degrees)),
        SkewDirection::HTop => f.with_transform(TransformProp::SkewX, deg(degrees)),
        SkewDirection::HBottom => f.with_transform(TransformProp::SkewX, deg(-degrees)),
    }
}

pub fn scale(direction: ScaleDirection, percent: f64) -> EffectFragment {
    let zoom = format_number(1.0 + percent / 100.0);
    let shrink = format_number(1.0 - percent * 0.01);
    let f = EffectFragment::default();
    match direction {
        ScaleDirection::HIn => f.with_transform(TransformProp::ScaleX, zoom),
        ScaleDirection::HOut => f.with_transform(TransformProp::ScaleX, shrink),
        ScaleDirection::VIn => f.with_transform(TransformProp::ScaleY, zoom),
        ScaleDirection::VOut => f.with_transform(TransformProp::ScaleY, shrink),
        ScaleDirection::In => f.with_transform(TransformProp::Scale, zoom),
        ScaleDirection::Out => f.with_transform(TransformProp::Scale, shrink),
    }
}

pub fn clip_path(direction: ClipDirection, percent: f64) -> EffectFragment {
    let p = format_number(percent);
    let inset = match direction {
        ClipDirection::Left => format!("inset(0% 0% 0% {p}%)"),
        ClipDirection::Right => format!("inset(0% {p}% 0% 0%)"),
        ClipDirection::Top => format!("inset({p}% 0% 0% 0%)"),
        ClipDirection::Bottom => format!("inset(0% 0% {p}% 0%)"),
        ClipDirection::HOut => format!("inset(0% {p}%)"),
        ClipDirection::VOut => format!("inset({p}% 0%)"),
        ClipDirection::VhOut => format!("inset({p}% {p}%)"),
    };
    EffectFragment {
        clip_path: Some(inset),
        ..EffectFragment::default()
    }
}

/// `fade` is a 0..100 percentage of transparency.
pub fn opacity(fade: f64) -> EffectFragment {
    EffectFragment {
        opacity: Some((100.0 - fade) / 100.0),
        ..EffectFragment::default()
    }
}

/// Direction text of a family, if its type key is truthy.
pub(crate) fn direction_of(config: &AnimationConfig, family: EffectFamily) -> Option<String> {
    if !config.flag(family.type_key()) {
        return None;
    }
    config.get(family.type_key()).map(value_text)
}

/// Derive concrete effect values from a config in one pass.
///
/// Every family whose type key is set is parsed; its magnitude key is removed
/// from the returned config and its values are layered over any verbatim
/// property values left in the config. The input config is not touched.
pub fn derive_effect_style(config: &AnimationConfig, reverse: bool) -> EffectData {
    derive_with(config, reverse, |family| config.number(family.key()))
}

/// Shared derivation loop; `magnitude` supplies the value fed to each family.
pub(crate) fn derive_with(
    config: &AnimationConfig,
    reverse: bool,
    mut magnitude: impl FnMut(EffectFamily) -> f64,
) -> EffectData {
    let mut remaining = config.clone();
    let mut parsed = EffectFragment::default();

    for family in EffectFamily::ALL {
        let Some(direction) = direction_of(config, family) else {
            continue;
        };
        let value = magnitude(family);
        match family.apply(&direction, value, reverse) {
            Some(fragment) => {
                remaining.remove(family.key());
                parsed.merge(fragment);
            }
            None => log::debug!(
                "{} direction '{direction}' has no opposite; family skipped",
                family.key()
            ),
        }
    }

    let mut fragment = EffectFragment::from_config(&remaining);
    fragment.merge(parsed);
    EffectData {
        config: remaining,
        fragment,
    }
}

fn value_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.as_f64().map(format_number).unwrap_or_default(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_topright_moves_up_and_left() {
        let f = translate(TranslateDirection::TopRight, 10.0);
        assert_eq!(f.transform(TransformProp::TranslateY), Some("10px"));
        assert_eq!(f.transform(TransformProp::TranslateX), Some("-10px"));
        assert_eq!(f.transforms.len(), 2);
    }

    #[test]
    fn opacity_maps_fade_percentage() {
        assert_eq!(opacity(40.0).opacity, Some(0.6));
    }

    #[test]
    fn clip_vhout_insets_both_axes() {
        let f = clip_path(ClipDirection::VhOut, 20.0);
        assert_eq!(f.clip_path.as_deref(), Some("inset(20% 20%)"));
    }

    #[test]
    fn unknown_direction_uses_family_default() {
        let f = EffectFamily::Translate.apply("sideways", 5.0, false).unwrap();
        assert_eq!(f.transform(TransformProp::TranslateY), Some("-5px"));
        let f = EffectFamily::Rotate.apply("", 5.0, false).unwrap();
        assert_eq!(f.transform(TransformProp::RotateX), Some("-5deg"));
        let f = EffectFamily::Scale.apply("?", 20.0, false).unwrap();
        assert_eq!(f.transform(TransformProp::ScaleY), Some("0.8"));
    }

    #[test]
    fn reverse_mode_swaps_or_skips() {
        let f = EffectFamily::Translate.apply("left", 8.0, true).unwrap();
        assert_eq!(f.transform(TransformProp::TranslateX), Some("-8px"));
        assert!(EffectFamily::Translate.apply("sideways", 8.0, true).is_none());
        let f = EffectFamily::ClipPath.apply("vout", 8.0, true).unwrap();
        assert_eq!(f.clip_path.as_deref(), Some("inset(8% 0%)"));
    }

    #[test]
    fn zero_distance_has_no_negative_zero() {
        let f = translate(TranslateDirection::Right, 0.0);
        assert_eq!(f.transform(TransformProp::TranslateX), Some("0px"));
    }
}
