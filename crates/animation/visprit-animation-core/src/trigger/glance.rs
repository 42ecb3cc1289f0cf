//! Glance: play the entrance once, the first time the element peeks into view.

use crate::config::AnimationConfig;
use crate::counter::Counter;
use crate::effect::{derive_effect_style, EffectData};
use crate::elastic::ElasticSynthesizer;
use crate::error::ConfigError;
use crate::host::{ElementProbe, Viewport};
use crate::linear::LinearSynthesizer;
use crate::spire::{Spire, SpireSettings};
use crate::timing::Playback;

use super::{settle_duration, target_list, CounterTrack, Cycle, CycleGuard, TriggerKind};

#[derive(Clone, Debug)]
pub struct GlanceTrigger {
    config: AnimationConfig,
    data: EffectData,
    spire: Spire,
    started: bool,
}

impl GlanceTrigger {
    pub fn new(config: AnimationConfig) -> Result<Self, ConfigError> {
        let spire = Spire::new(SpireSettings::from_config(&config)?);
        let data = derive_effect_style(&config, false);
        Ok(Self {
            config,
            data,
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

    /// Start the entrance if the element has peeked and nothing played yet.
    pub fn start<E, T>(
        &mut self,
        guard: &mut CycleGuard,
        element: &E,
        targets: &[T],
        viewport: Viewport,
    ) -> Option<Cycle>
    where
        E: ElementProbe,
        T: ElementProbe,
    {
        // Always measured so `peeked` latches even after the first start.
        let peeked = self.spire.has_peeked(&element.bounding_rect(), viewport.height);
        if !peeked || self.started {
            return None;
        }

        guard.acquire();
        let probes = target_list(element, targets);
        let mut cycle = Cycle::new(TriggerKind::Glance);
        let mut last = 0.0;
        for (index, probe) in probes.iter().enumerate() {
            last = self.play_target(&mut cycle, *probe, index);
        }
        cycle.duration = settle_duration(last, &self.config, probes.len());
        self.started = true;
        log::debug!(
            "glance started: {} playbacks, {} counters, {}ms",
            cycle.playbacks.len(),
            cycle.counters.len(),
            cycle.duration
        );
        Some(cycle)
    }

    /// Revert every target to rest.
    pub fn reset(&self, targets: usize) -> Vec<Playback> {
        let linear = LinearSynthesizer::new(&self.data);
        (0..targets.max(1)).map(|i| linear.revert(i)).collect()
    }

    fn play_target(&self, cycle: &mut Cycle, probe: &dyn ElementProbe, index: usize) -> f64 {
        let linear = LinearSynthesizer::new(&self.data);
        if self.config.flag("fade") {
            cycle.playbacks.push(linear.fade_in_early(index));
        }

        if self.config.flag("hasCounter") {
            let countable = match (probe.text_content(), probe.tag_name()) {
                (Some(text), Some(tag)) => Counter::is_countable(&text, &tag),
                _ => false,
            };
            if !countable {
                log::debug!("glance target {index} has no countable text");
                return 0.0;
            }
            let counter = Counter::from_config(&self.data.config, false);
            let duration = counter.duration;
            cycle.counters.push(CounterTrack {
                target: index,
                counter,
            });
            return duration;
        }

        if self.config.flag("hasElastic") {
            let plan = ElasticSynthesizer::new(&self.data).tread(index);
            cycle.playbacks.extend(plan.playbacks);
            return plan.duration;
        }

        let playback = linear.tread(index);
        let duration = playback.timing.duration;
        cycle.playbacks.push(playback);
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ElementSnapshot;

    const VIEW: Viewport = Viewport {
        width: 1024.0,
        height: 768.0,
    };

    fn glance(strx: &str) -> GlanceTrigger {
        GlanceTrigger::new(AnimationConfig::from_strx(strx)).unwrap()
    }

    #[test]
    fn waits_for_peek_then_plays_once() {
        let mut g = glance("translateType:bottom|translate:30|duration:500|peek:50");
        let mut guard = CycleGuard::default();
        let below = ElementSnapshot::at(900.0, 100.0);
        let none: [ElementSnapshot; 0] = [];
        assert!(g.start(&mut guard, &below, &none, VIEW).is_none());
        assert!(!guard.is_busy());

        let inside = ElementSnapshot::at(300.0, 100.0);
        let cycle = g.start(&mut guard, &inside, &none, VIEW).unwrap();
        assert!(guard.is_busy());
        assert_eq!(cycle.kind, TriggerKind::Glance);
        assert_eq!(cycle.playbacks.len(), 1);
        assert_eq!(cycle.duration, 500.0);
        assert_eq!(
            cycle.playbacks[0].keyframes[0].transform.as_deref(),
            Some("translateY(-30px)")
        );

        guard.release();
        assert!(g.start(&mut guard, &inside, &none, VIEW).is_none());
    }

    #[test]
    fn early_fade_and_cascade_targets() {
        let mut g = glance("opacityType:fade|opacity:100|duration:400|delay:100|cascadeInt:50|fade:50");
        let mut guard = CycleGuard::default();
        let el = ElementSnapshot::at(100.0, 300.0);
        let targets = vec![ElementSnapshot::at(100.0, 100.0); 3];
        let cycle = g.start(&mut guard, &el, &targets, VIEW).unwrap();
        // fade + tread for each target
        assert_eq!(cycle.playbacks.len(), 6);
        assert_eq!(cycle.playbacks[0].timing.duration, 200.0);
        assert_eq!(cycle.playbacks[5].target, 2);
        assert_eq!(cycle.playbacks[5].timing.delay, Some(200.0));
    }

    #[test]
    fn counter_needs_countable_text() {
        let mut g = glance("hasCounter:true|start:0|end:900|duration:1200|delay:100");
        let mut guard = CycleGuard::default();
        let mut el = ElementSnapshot::at(100.0, 40.0);
        el.text = Some("900".into());
        el.tag = Some("h2".into());
        let none: [ElementSnapshot; 0] = [];
        let cycle = g.start(&mut guard, &el, &none, VIEW).unwrap();
        assert_eq!(cycle.counters.len(), 1);
        assert_eq!(cycle.duration, 1200.0);

        let mut g = glance("hasCounter:true|start:0|end:900|duration:1200|delay:100");
        el.tag = Some("span".into());
        let cycle = g.start(&mut guard, &el, &none, VIEW).unwrap();
        assert!(cycle.counters.is_empty());
        // nothing reported, so the configured duration and delay are used
        assert_eq!(cycle.duration, 1300.0);
    }

    #[test]
    fn elastic_entrance() {
        let mut g = glance("hasElastic:true|scaleType:in|scale:30|duration:600|stiffness:3|damping:2|mass:1");
        let mut guard = CycleGuard::default();
        let none: [ElementSnapshot; 0] = [];
        let cycle = g
            .start(&mut guard, &ElementSnapshot::at(0.0, 100.0), &none, VIEW)
            .unwrap();
        assert_eq!(cycle.playbacks.len(), 1);
        let frames = &cycle.playbacks[0].keyframes;
        assert_eq!(frames[0].transform.as_deref(), Some("scale(1.3)"));
        assert_eq!(frames.last().and_then(|s| s.transform.as_deref()), Some("scale(1)"));
        assert!(cycle.duration >= 600.0);
    }
}
