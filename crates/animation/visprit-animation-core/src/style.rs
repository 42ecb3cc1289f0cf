//! Keyframe styles and the composer that builds them from effect data.

use serde::{Deserialize, Serialize};

use crate::effect::{EffectData, EffectFragment};
use crate::host::ElementProbe;
use crate::numbers::{extract_numbers, format_number, parse_float, replace_numbers};
use crate::props::TransformProp;
use crate::transform::{compose, compose_data, compose_defaults, compose_live, compose_reset};

/// Clip-path rest value.
pub const CLIP_REST: &str = "inset(0 0 0 0)";

/// One keyframe. Absent keys are not animated (absence is not zero).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Style {
    pub fn opacity(value: f64) -> Self {
        Self {
            opacity: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transform.is_none() && self.clip_path.is_none() && self.opacity.is_none()
    }

    /// Properties set on this style, in iteration order.
    pub fn props(&self) -> impl Iterator<Item = StyleProp> + '_ {
        StyleProp::ALL.into_iter().filter(|p| p.get(self).is_some())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleProp {
    Transform,
    ClipPath,
    Opacity,
}

impl StyleProp {
    pub const ALL: [StyleProp; 3] = [StyleProp::Transform, StyleProp::ClipPath, StyleProp::Opacity];

    pub fn name(self) -> &'static str {
        match self {
            StyleProp::Transform => "transform",
            StyleProp::ClipPath => "clipPath",
            StyleProp::Opacity => "opacity",
        }
    }

    /// The property's value as text.
    pub fn get(self, style: &Style) -> Option<String> {
        match self {
            StyleProp::Transform => style.transform.clone(),
            StyleProp::ClipPath => style.clip_path.clone(),
            StyleProp::Opacity => style.opacity.map(format_number),
        }
    }

    /// A style carrying only this property, set from text.
    pub fn fragment(self, text: String) -> Style {
        match self {
            StyleProp::Transform => Style {
                transform: Some(text),
                ..Style::default()
            },
            StyleProp::ClipPath => Style {
                clip_path: Some(text),
                ..Style::default()
            },
            StyleProp::Opacity => Style::opacity(parse_float(&text)),
        }
    }
}

/// Builds the four style flavours (data, default, node, reset) for one
/// derived effect.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleComposer {
    fragment: EffectFragment,
    oscillate: bool,
}

impl StyleComposer {
    pub fn new(data: &EffectData) -> Self {
        Self {
            fragment: data.fragment.clone(),
            oscillate: data.config.flag("cascadeOsc"),
        }
    }

    pub fn fragment(&self) -> &EffectFragment {
        &self.fragment
    }

    /// Configured values. Odd cascade indices are mirrored when oscillation is on.
    pub fn data(&self, index: usize) -> Style {
        if self.oscillate && index % 2 == 1 {
            return Style {
                transform: compose(&self.fragment, oscillate_prop),
                clip_path: self.fragment.clip_path.as_deref().map(oscillate_path),
                opacity: self.fragment.opacity,
            };
        }
        Style {
            transform: compose_data(&self.fragment),
            clip_path: self.fragment.clip_path.clone(),
            opacity: self.fragment.opacity,
        }
    }

    /// Rest values for the properties the effect uses.
    pub fn default_style(&self) -> Style {
        Style {
            transform: compose_defaults(&self.fragment),
            clip_path: self.fragment.clip_path.as_ref().map(|_| CLIP_REST.to_string()),
            opacity: self.fragment.opacity.map(|_| 1.0),
        }
    }

    /// Live values read from the element, for the properties the effect uses.
    pub fn node(&self, probe: &(impl ElementProbe + ?Sized)) -> Style {
        let computed = probe.computed_transform();
        Style {
            transform: compose_live(&self.fragment, computed.as_deref()),
            clip_path: self
                .fragment
                .clip_path
                .as_ref()
                .map(|_| probe.computed_clip_path().unwrap_or_else(|| CLIP_REST.to_string())),
            opacity: self
                .fragment
                .opacity
                .map(|_| probe.computed_opacity().unwrap_or(1.0)),
        }
    }

    /// Every property at rest, regardless of the effect.
    pub fn reset() -> Style {
        Style {
            transform: Some(compose_reset()),
            clip_path: Some(CLIP_REST.to_string()),
            opacity: Some(1.0),
        }
    }
}

fn oscillate_prop(prop: TransformProp, value: &str) -> String {
    let mirrored: Vec<f64> = extract_numbers(value)
        .into_iter()
        .map(|n| {
            if prop.is_scale() {
                let adjust = (1.0 - n).abs();
                if n > 1.0 {
                    1.0 - adjust
                } else {
                    1.0 + adjust
                }
            } else {
                -n
            }
        })
        .collect();
    replace_numbers(value, &mirrored)
}

/// Swap inset sides: two values trade places, four become `[2, 3, 0, 1]`.
fn oscillate_path(clip: &str) -> String {
    let r = extract_numbers(clip);
    let swapped = match r.len() {
        4 => vec![r[2], r[3], r[0], r[1]],
        n if n >= 2 => vec![r[1], r[0]],
        _ => r,
    };
    replace_numbers(clip, &swapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimationConfig;
    use crate::effect::derive_effect_style;
    use crate::host::ElementSnapshot;

    fn composer(strx: &str) -> StyleComposer {
        StyleComposer::new(&derive_effect_style(&AnimationConfig::from_strx(strx), false))
    }

    #[test]
    fn data_and_default_share_keys() {
        let c = composer("translateType:left|translate:40|opacityType:fade|opacity:30");
        let data = c.data(0);
        assert_eq!(data.transform.as_deref(), Some("translateX(40px)"));
        assert_eq!(data.opacity, Some(0.7));
        assert!(data.clip_path.is_none());

        let rest = c.default_style();
        assert_eq!(rest.transform.as_deref(), Some("translateX(0px)"));
        assert_eq!(rest.opacity, Some(1.0));
        assert!(rest.clip_path.is_none());
    }

    #[test]
    fn odd_indices_oscillate() {
        let c = composer(
            "cascadeOsc:true|translateType:top|translate:10|scaleType:in|scale:20|clipPathType:vout|clipPath:15",
        );
        let even = c.data(2);
        assert_eq!(even.transform.as_deref(), Some("translateY(10px) scale(1.2)"));
        let odd = c.data(1);
        assert_eq!(odd.transform.as_deref(), Some("translateY(-10px) scale(0.8)"));
        assert_eq!(odd.clip_path.as_deref(), Some("inset(0% 15%)"));
    }

    #[test]
    fn four_sided_clip_swaps_pairs() {
        assert_eq!(oscillate_path("inset(1% 2% 3% 4%)"), "inset(3% 4% 1% 2%)");
        assert_eq!(oscillate_path("inset(5%)"), "inset(5%)");
    }

    #[test]
    fn node_reads_live_values() {
        let c = composer("translateType:left|translate:40|clipPathType:top|clipPath:10");
        let mut el = ElementSnapshot::at(0.0, 100.0);
        el.transform = Some("matrix(1, 0, 0, 1, 12, 0)".into());
        el.clip_path = Some("inset(4% 0% 0% 0%)".into());
        let node = c.node(&el);
        assert_eq!(node.transform.as_deref(), Some("translateX(12px)"));
        assert_eq!(node.clip_path.as_deref(), Some("inset(4% 0% 0% 0%)"));
        assert!(node.opacity.is_none());
    }

    #[test]
    fn reset_sets_everything() {
        let reset = StyleComposer::reset();
        assert_eq!(reset.props().count(), 3);
        assert_eq!(reset.clip_path.as_deref(), Some(CLIP_REST));
    }

    #[test]
    fn opacity_fragment_round_trips_text() {
        let s = StyleProp::Opacity.fragment("0.25".into());
        assert_eq!(s.opacity, Some(0.25));
        assert_eq!(StyleProp::Opacity.get(&s).as_deref(), Some("0.25"));
    }
}
