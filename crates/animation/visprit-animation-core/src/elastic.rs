//! Elastic spring synthesizer.
//!
//! Each animated style property is simulated as a set of damped springs, one
//! per number in its text value, stepped at a fixed 60 Hz. Every step becomes
//! one keyframe. The sequence always ends with a settle pair: a frame halfway
//! between the last simulated values and rest, then the exact end value.
//!
//! Coefficients come from the config in the 0..10 editor range and are
//! remapped before integration:
//! - `stiffness * -100`
//! - `damping * -10`
//! - `10 - mass + 1`
//!
//! Settling is decided on a running extremum of the frame norm (`displates`)
//! rather than on distance to target; a step counts toward settling while
//! that value stays under [`DISPLATE`]. The run stops once `FRAME_MIN * mass`
//! consecutive steps qualify, or after [`FRAME_MAX`] steps.

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;
use crate::effect::EffectData;
use crate::host::ElementProbe;
use crate::numbers::{extract_numbers, nan_max, nan_min, replace_numbers};
use crate::style::{Style, StyleComposer, StyleProp};
use crate::timing::{Playback, Timing, TimingSource};

/// Hard cap on simulated steps.
pub const FRAME_MAX: usize = 1000;
/// Consecutive settled steps needed per unit of configured mass.
pub const FRAME_MIN: f64 = 60.0;
/// Seconds per simulated step.
pub const FRAME_RATE: f64 = 1.0 / 60.0;
/// Largest running displacement that still counts as settled.
pub const DISPLATE: f64 = 3.0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElasticStyle {
    #[default]
    Spring,
    /// Mirror every frame onto the start value's side of rest.
    Bounce,
}

impl ElasticStyle {
    pub fn parse(s: &str) -> Self {
        match s {
            "bounce" => ElasticStyle::Bounce,
            _ => ElasticStyle::Spring,
        }
    }
}

/// Spring coefficients as configured (before remapping).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringSettings {
    pub elastic: ElasticStyle,
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl Default for SpringSettings {
    fn default() -> Self {
        Self {
            elastic: ElasticStyle::Spring,
            stiffness: 1.0,
            damping: 1.0,
            mass: 1.0,
        }
    }
}

impl SpringSettings {
    pub fn from_config(config: &AnimationConfig, alt: bool) -> Self {
        let src = TimingSource::new(config, alt);
        Self {
            elastic: src.text("elastic").map(ElasticStyle::parse).unwrap_or_default(),
            stiffness: src.number("stiffness"),
            damping: src.number("damping"),
            mass: src.number("mass"),
        }
    }

    /// Consecutive settled steps that end a run early.
    #[inline]
    pub fn settle_frames(&self) -> f64 {
        FRAME_MIN * self.mass
    }
}

/// Remapped coefficients used by the integrator.
#[derive(Clone, Copy, Debug)]
struct Coefficients {
    stiffness: f64,
    damping: f64,
    mass: f64,
}

impl From<&SpringSettings> for Coefficients {
    fn from(s: &SpringSettings) -> Self {
        Self {
            stiffness: s.stiffness * -100.0,
            damping: s.damping * -10.0,
            mass: 10.0 - s.mass + 1.0,
        }
    }
}

/// Position/velocity/target of every number in one property value.
#[derive(Clone, Debug, Default)]
pub struct SpringState {
    position: Vec<f64>,
    velocity: Vec<f64>,
    target: Vec<f64>,
}

impl SpringState {
    pub fn new(start: &str, end: &str) -> Self {
        let position = extract_numbers(start);
        let velocity = vec![0.0; position.len()];
        Self {
            position,
            velocity,
            target: extract_numbers(end),
        }
    }

    /// Advance one step and return the new positions.
    fn step(&mut self, k: &Coefficients) -> Vec<f64> {
        for i in 0..self.position.len() {
            let target = self.target.get(i).copied().unwrap_or(f64::NAN);
            let drag = k.stiffness * (self.position[i] - target);
            // A zero (or NaN) pull leaves velocity untouched.
            if drag != 0.0 && !drag.is_nan() {
                let speed = k.damping * self.velocity[i];
                let accel = (drag + speed) / k.mass;
                self.velocity[i] += accel * FRAME_RATE;
            }
            self.position[i] += self.velocity[i] * FRAME_RATE;
        }
        self.position.clone()
    }
}

/// Running settle bookkeeping over frame norms.
#[derive(Clone, Copy, Debug, Default)]
struct SettleTracker {
    displates: f64,
    threshold: f64,
}

impl SettleTracker {
    /// Feed one frame; true once enough consecutive frames have settled.
    fn observe(&mut self, frame: &[f64], settle_frames: f64) -> bool {
        let norm = frame.iter().map(|v| v * v).sum::<f64>().sqrt();
        let prev = self.displates;
        let unset = prev == 0.0 || prev.is_nan();
        let max_displ = nan_max(if unset { f64::NEG_INFINITY } else { prev }, norm);
        let min_displ = nan_min(if unset { f64::INFINITY } else { prev }, norm);
        self.displates = if prev < 0.0 { max_displ } else { min_displ };

        if self.displates.abs() < DISPLATE {
            self.threshold += 1.0;
        } else {
            self.threshold = 0.0;
        }
        self.threshold >= settle_frames
    }
}

/// Reflect a frame onto the start value's side of rest.
fn filter_bounce(start: &str, frame: &mut [f64]) {
    let tokens: Vec<&str> = start.split(' ').collect();
    let starts = extract_numbers(start);
    for (i, value) in frame.iter_mut().enumerate() {
        let origin = starts.get(i).copied().unwrap_or(f64::NAN);
        let is_scale = tokens.get(i).is_some_and(|t| t.contains("scale"));
        *value = if is_scale {
            let adjust = (1.0 - *value).abs();
            if origin > 1.0 {
                1.0 + adjust
            } else {
                1.0 - adjust
            }
        } else {
            let adjust = value.abs();
            if origin > 0.0 {
                adjust
            } else {
                -adjust
            }
        };
    }
}

/// Simulate one property from `start` to `end`; returns keyframe texts.
///
/// The result is `[start, step_1 .. step_k, mid, end]` with `k <= FRAME_MAX`.
pub fn synthesize_keyframes(settings: &SpringSettings, start: &str, end: &str) -> Vec<String> {
    let k = Coefficients::from(settings);
    let settle_frames = settings.settle_frames();
    let mut state = SpringState::new(start, end);
    let mut tracker = SettleTracker::default();
    let mut computed: Vec<f64> = Vec::new();

    let mut frames = Vec::with_capacity(64);
    frames.push(start.to_string());
    let mut steps = 0usize;
    for _ in 0..FRAME_MAX {
        computed = state.step(&k);
        if settings.elastic == ElasticStyle::Bounce {
            filter_bounce(start, &mut computed);
        }
        frames.push(replace_numbers(start, &computed));
        steps += 1;
        if tracker.observe(&computed, settle_frames) {
            break;
        }
    }
    log::trace!("spring '{start}' -> '{end}' ran {steps} steps");

    let last_tokens: Vec<String> = frames
        .last()
        .map(|f| f.split(' ').map(str::to_string).collect())
        .unwrap_or_default();
    let mid: Vec<f64> = computed
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let token = last_tokens.get(i).filter(|t| !t.is_empty())?;
            let base = if token.contains("scale") { 1.0 } else { 0.0 };
            Some((value + base) / 2.0)
        })
        .collect();
    frames.push(replace_numbers(end, &mid));
    frames.push(end.to_string());
    frames
}

/// Track duration: never less than one real frame per simulated step.
#[inline]
pub fn track_duration(duration: f64, frames: usize) -> f64 {
    let elastic = frames as f64 * duration / 60.0;
    if duration < elastic {
        elastic
    } else {
        duration
    }
}

/// Output of one spring run: one playback per animated property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElasticPlan {
    pub playbacks: Vec<Playback>,
    /// Longest track duration; the configured duration when nothing animates.
    pub duration: f64,
}

/// Spring-based keyframe synthesis over a derived effect.
#[derive(Clone, Debug)]
pub struct ElasticSynthesizer {
    composer: StyleComposer,
    config: AnimationConfig,
    alt: bool,
}

impl ElasticSynthesizer {
    pub fn new(data: &EffectData) -> Self {
        Self {
            composer: StyleComposer::new(data),
            config: data.config.clone(),
            alt: false,
        }
    }

    /// Use the `*Alt` options (exit animations).
    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    /// Configured values back to rest.
    pub fn tread(&self, index: usize) -> ElasticPlan {
        let start = self.composer.data(index);
        let end = self.composer.default_style();
        self.spring(&start, &end, index)
    }

    /// Live values out to the configured values.
    pub fn vault(&self, probe: &(impl ElementProbe + ?Sized), index: usize) -> ElasticPlan {
        let start = self.composer.node(probe);
        let end = self.composer.data(index);
        self.spring(&start, &end, index)
    }

    /// Live values back to rest.
    pub fn recoil(&self, probe: &(impl ElementProbe + ?Sized), index: usize) -> ElasticPlan {
        let start = self.composer.node(probe);
        let end = self.composer.default_style();
        self.spring(&start, &end, index)
    }

    /// Abrupt reset of every property.
    pub fn revert(&self, index: usize) -> Playback {
        Playback {
            target: index,
            keyframes: vec![StyleComposer::reset()],
            timing: Timing::instant(),
        }
    }

    fn spring(&self, start: &Style, end: &Style, index: usize) -> ElasticPlan {
        let settings = SpringSettings::from_config(&self.config, self.alt);
        let base = TimingSource::new(&self.config, self.alt).linear_timing(index);

        let mut playbacks = Vec::new();
        for prop in start.props() {
            let Some(keyframes) = synthesize_prop(&settings, prop, start, end) else {
                log::debug!("spring skips {}: no end value", prop.name());
                continue;
            };
            let timing = Timing {
                duration: track_duration(base.duration, keyframes.len()),
                ..base.clone()
            };
            playbacks.push(Playback {
                target: index,
                keyframes,
                timing,
            });
        }

        let duration = playbacks
            .iter()
            .map(|p| p.timing.duration)
            .reduce(nan_max)
            .unwrap_or(base.duration);
        ElasticPlan {
            playbacks,
            duration,
        }
    }
}

/// Keyframes for one style property; `None` unless both styles carry it.
pub fn synthesize_prop(
    settings: &SpringSettings,
    prop: StyleProp,
    start: &Style,
    end: &Style,
) -> Option<Vec<Style>> {
    let from = prop.get(start)?;
    let to = prop.get(end)?;
    Some(
        synthesize_keyframes(settings, &from, &to)
            .into_iter()
            .map(|text| prop.fragment(text))
            .collect(),
    )
}
