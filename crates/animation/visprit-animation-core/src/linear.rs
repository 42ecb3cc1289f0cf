//! Linear (eased) keyframe synthesis: short keyframe lists the host
//! interpolates with a preset easing.

use crate::config::AnimationConfig;
use crate::effect::EffectData;
use crate::style::{Style, StyleComposer};
use crate::timing::{Playback, Timing, TimingSource};

#[derive(Clone, Debug)]
pub struct LinearSynthesizer {
    composer: StyleComposer,
    config: AnimationConfig,
    alt: bool,
}

impl LinearSynthesizer {
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

    fn timing(&self, index: usize) -> Timing {
        TimingSource::new(&self.config, self.alt).timing(index)
    }

    /// Configured values back to rest.
    pub fn tread(&self, index: usize) -> Playback {
        Playback {
            target: index,
            keyframes: vec![self.composer.data(index), self.composer.default_style()],
            timing: self.timing(index),
        }
    }

    /// Ease from wherever the element is to the configured values.
    pub fn step_in(&self, index: usize) -> Playback {
        Playback {
            target: index,
            keyframes: vec![self.composer.data(index)],
            timing: self.timing(index).without_delay(),
        }
    }

    /// Ease from wherever the element is back to rest.
    pub fn step_out(&self, index: usize) -> Playback {
        Playback {
            target: index,
            keyframes: vec![self.composer.default_style()],
            timing: self.timing(index).without_delay(),
        }
    }

    /// Opacity 0 -> 1 over the first `fade` percent of the duration.
    pub fn fade_in_early(&self, index: usize) -> Playback {
        let mut timing = self.timing(index);
        timing.duration *= self.config.number("fade") / 100.0;
        Playback {
            target: index,
            keyframes: vec![Style::opacity(0.0), Style::opacity(1.0)],
            timing,
        }
    }

    /// Abrupt reset of every property.
    pub fn revert(&self, index: usize) -> Playback {
        Playback {
            target: index,
            keyframes: vec![StyleComposer::reset()],
            timing: Timing::instant(),
        }
    }
}
