//! Transform algebra.
//!
//! Composition turns per-property values into one transform string in fixed
//! property order. Decomposition reads a live `matrix(...)` or
//! `matrix3d(...)` back into per-property numbers so an animation can resume
//! from wherever the element currently is.
//!
//! Decomposition is best effort. Translation, scale and skew come straight
//! from matrix entries; rotations are recovered with `atan2`/`asin`/`acos`
//! and only invert composition for a single rotation axis.

use std::collections::BTreeMap;

use crate::effect::EffectFragment;
use crate::numbers::{parse_float, replace_numbers, round_half_up};
use crate::props::TransformProp;

/// Join `prop(value)` for every property present in `fragment`, in
/// composition order, with `select` choosing the text for each one.
/// `None` when the fragment has no transform properties.
pub fn compose<F>(fragment: &EffectFragment, mut select: F) -> Option<String>
where
    F: FnMut(TransformProp, &str) -> String,
{
    let parts: Vec<String> = TransformProp::ALL
        .into_iter()
        .filter_map(|prop| {
            let value = fragment.transform(prop)?;
            if value.is_empty() {
                return None;
            }
            Some(format!("{}({})", prop.name(), select(prop, value)))
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Configured values as they are.
pub fn compose_data(fragment: &EffectFragment) -> Option<String> {
    compose(fragment, |_, value| value.to_string())
}

/// Identity values for the properties the fragment uses.
pub fn compose_defaults(fragment: &EffectFragment) -> Option<String> {
    compose(fragment, |prop, _| prop.default_value().to_string())
}

/// Live values, read from `computed`, for the properties the fragment uses.
/// Falls back to identity values when the live transform is `None`.
pub fn compose_live(fragment: &EffectFragment, computed: Option<&str>) -> Option<String> {
    let decomposed = computed.and_then(decompose);
    compose(fragment, |prop, _| match &decomposed {
        Some(d) => d.text(prop),
        None => prop.default_value().to_string(),
    })
}

/// Identity values for all ten properties.
pub fn compose_reset() -> String {
    TransformProp::ALL
        .into_iter()
        .map(|prop| format!("{}({})", prop.name(), prop.default_value()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Per-property numbers recovered from a live matrix.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decomposition {
    values: BTreeMap<TransformProp, f64>,
}

impl Decomposition {
    #[inline]
    pub fn get(&self, prop: TransformProp) -> Option<f64> {
        self.values.get(&prop).copied()
    }

    /// Property text in the unit of its identity value (`12px`, `30deg`, `1.2`).
    /// Properties the matrix form does not carry keep their identity value.
    pub fn text(&self, prop: TransformProp) -> String {
        match self.get(prop) {
            Some(v) => replace_numbers(prop.default_value(), &[v]),
            None => prop.default_value().to_string(),
        }
    }
}

/// Decompose a computed transform. `None` for `none`/empty (identity) and for
/// anything that is not a `matrix`/`matrix3d` function.
pub fn decompose(computed: &str) -> Option<Decomposition> {
    let computed = computed.trim();
    if computed.is_empty() || computed == "none" {
        return None;
    }
    let open = computed.find('(')?;
    let name = computed[..open].trim();
    let inner = computed[open + 1..].split(')').next().unwrap_or_default();
    let m: Vec<f64> = inner.split(',').map(parse_float).collect();
    let at = |i: usize| m.get(i).copied().unwrap_or(f64::NAN);

    match name {
        "matrix" => Some(decompose_2d(at)),
        "matrix3d" => Some(decompose_3d(at)),
        _ => None,
    }
}

fn decompose_2d(at: impl Fn(usize) -> f64) -> Decomposition {
    let (a, b, c, d, e, f) = (at(0), at(1), at(2), at(3), at(4), at(5));
    let rotate = round_half_up(b.atan2(a).to_degrees());

    let mut values = BTreeMap::new();
    values.insert(TransformProp::TranslateX, e);
    values.insert(TransformProp::TranslateY, f);
    values.insert(TransformProp::Scale, a);
    values.insert(TransformProp::ScaleX, a);
    values.insert(TransformProp::ScaleY, d);
    values.insert(TransformProp::Rotate, rotate);
    values.insert(TransformProp::RotateX, 0.0);
    values.insert(TransformProp::RotateY, 0.0);
    // Raw shear factors; matches the skew angle only for small angles.
    values.insert(TransformProp::SkewX, c);
    values.insert(TransformProp::SkewY, b);
    Decomposition { values }
}

fn decompose_3d(at: impl Fn(usize) -> f64) -> Decomposition {
    let rotate_y = round_half_up(at(8).asin().to_degrees());
    let cos_b = rotate_y.to_radians().cos();
    let rotate_x = round_half_up((-at(9) / cos_b).asin().to_degrees());
    let rotate_z = round_half_up((at(0) / cos_b).acos().to_degrees());

    let mut values = BTreeMap::new();
    values.insert(TransformProp::TranslateX, at(12));
    values.insert(TransformProp::TranslateY, at(13));
    values.insert(TransformProp::RotateX, rotate_x);
    values.insert(TransformProp::RotateY, rotate_y);
    values.insert(TransformProp::Rotate, rotate_z);
    Decomposition { values }
}
