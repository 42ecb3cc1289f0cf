//! Scroll: re-synthesize on every qualifying scroll sample.

use crate::config::AnimationConfig;
use crate::effect::derive_effect_style;
use crate::error::ConfigError;
use crate::host::{ElementProbe, ScrollSample, Viewport};
use crate::linear::LinearSynthesizer;
use crate::resist::derive_resist_style;
use crate::spire::{Spire, SpireSettings};
use crate::timing::Playback;

use super::{target_list, Cycle, CycleGuard, TriggerKind};

#[derive(Clone, Debug)]
pub struct ScrollTrigger {
    config: AnimationConfig,
    spire: Spire,
    started: bool,
}

impl ScrollTrigger {
    pub fn new(config: AnimationConfig) -> Result<Self, ConfigError> {
        let spire = Spire::new(SpireSettings::from_config(&config)?);
        Ok(Self {
            config,
            spire,
            started: false,
        })
    }

    #[inline]
    pub fn started(&self) -> bool {
        self.started
    }

    pub fn spire(&self) -> &Spire {
        &self.spire
    }

    /// Disabled below a configured viewport width.
    pub fn is_thwarted(&self, viewport: Viewport) -> bool {
        let stop_width = self.config.number("stopWidth");
        let stop_width = if stop_width.is_nan() { 0.0 } else { stop_width };
        self.config.flag("hasStop") && stop_width > viewport.width
    }

    /// Feed one scroll sample. The spire always advances; a cycle is only
    /// returned when the element may play.
    pub fn start<E, T>(
        &mut self,
        guard: &CycleGuard,
        element: &E,
        targets: &[T],
        sample: ScrollSample,
    ) -> Option<Cycle>
    where
        E: ElementProbe,
        T: ElementProbe,
    {
        let crank = self.spire.scroll(element, &sample);
        if !self.can_play(guard, element, sample.viewport) {
            return None;
        }

        let data = derive_resist_style(&self.config, crank);
        let linear = LinearSynthesizer::new(&data);
        let mut cycle = Cycle::new(TriggerKind::Scroll);
        for index in 0..target_list(element, targets).len() {
            let playback = linear.step_in(index);
            cycle.duration = playback.timing.duration;
            cycle.playbacks.push(playback);
        }
        if !self.started {
            log::debug!("scroll started at crank {crank}");
        }
        self.started = true;
        Some(cycle)
    }

    fn can_play<E: ElementProbe>(&mut self, guard: &CycleGuard, element: &E, viewport: Viewport) -> bool {
        if guard.is_busy() || self.is_thwarted(viewport) {
            return false;
        }
        // Out of view: only the very first placement plays.
        if !self.spire.has_unveiled(&element.bounding_rect(), viewport.height) {
            return !self.spire.unveiled();
        }
        self.spire.activated()
    }

    /// Revert every target to rest.
    pub fn reset(&self, targets: usize) -> Vec<Playback> {
        let linear = LinearSynthesizer::new(&derive_effect_style(&self.config, false));
        (0..targets.max(1)).map(|i| linear.revert(i)).collect()
    }
}
