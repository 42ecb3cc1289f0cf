//! Canonical transform properties and their identity values.

use serde::{Deserialize, Serialize};

/// One component of a composed transform.
///
/// Declaration order is composition order: a composed transform string always
/// lists its components in this order, whatever order the config used.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformProp {
    TranslateX,
    TranslateY,
    Rotate,
    RotateX,
    RotateY,
    Scale,
    ScaleX,
    ScaleY,
    SkewX,
    SkewY,
}

impl TransformProp {
    pub const ALL: [TransformProp; 10] = [
        TransformProp::TranslateX,
        TransformProp::TranslateY,
        TransformProp::Rotate,
        TransformProp::RotateX,
        TransformProp::RotateY,
        TransformProp::Scale,
        TransformProp::ScaleX,
        TransformProp::ScaleY,
        TransformProp::SkewX,
        TransformProp::SkewY,
    ];

    /// CSS function name, also the config key for a verbatim value.
    pub fn name(self) -> &'static str {
        match self {
            TransformProp::TranslateX => "translateX",
            TransformProp::TranslateY => "translateY",
            TransformProp::Rotate => "rotate",
            TransformProp::RotateX => "rotateX",
            TransformProp::RotateY => "rotateY",
            TransformProp::Scale => "scale",
            TransformProp::ScaleX => "scaleX",
            TransformProp::ScaleY => "scaleY",
            TransformProp::SkewX => "skewX",
            TransformProp::SkewY => "skewY",
        }
    }

    /// Identity value as text.
    pub fn default_value(self) -> &'static str {
        match self {
            TransformProp::TranslateX | TransformProp::TranslateY => "0px",
            TransformProp::Rotate
            | TransformProp::RotateX
            | TransformProp::RotateY
            | TransformProp::SkewX
            | TransformProp::SkewY => "0deg",
            TransformProp::Scale | TransformProp::ScaleX | TransformProp::ScaleY => "1",
        }
    }

    #[inline]
    pub fn is_scale(self) -> bool {
        matches!(
            self,
            TransformProp::Scale | TransformProp::ScaleX | TransformProp::ScaleY
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_composition_order() {
        let mut sorted = TransformProp::ALL;
        sorted.sort();
        assert_eq!(sorted, TransformProp::ALL);
    }

    #[test]
    fn scale_family_defaults_to_one() {
        for prop in TransformProp::ALL {
            if prop.is_scale() {
                assert_eq!(prop.default_value(), "1");
            } else {
                assert!(prop.default_value().starts_with('0'));
            }
        }
    }
}
