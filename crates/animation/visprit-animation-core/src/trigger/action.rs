//! Action: pointer-driven in/out cycles with a configurable revert policy.

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;
use crate::effect::{derive_effect_style, EffectData};
use crate::elastic::ElasticSynthesizer;
use crate::host::ElementProbe;
use crate::linear::LinearSynthesizer;
use crate::timing::Playback;

use super::{settle_duration, target_list, Cycle, CycleGuard, FollowUp, TriggerKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPhase {
    In,
    Out,
}

/// When the element returns to rest after an `In` cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevertPolicy {
    /// On the matching exit event.
    AfterEvent,
    /// Automatically once the `In` cycle has played.
    AfterCycle,
    /// On the next enter event.
    WhenToggled,
    #[default]
    None,
}

impl RevertPolicy {
    pub fn parse(s: &str) -> Self {
        match s {
            "after-event" => RevertPolicy::AfterEvent,
            "after-cycle" => RevertPolicy::AfterCycle,
            "when-toggled" => RevertPolicy::WhenToggled,
            _ => RevertPolicy::None,
        }
    }
}

/// DOM events the host should bind for an action trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActionEvents {
    pub enter: &'static str,
    /// Only bound under [`RevertPolicy::AfterEvent`].
    pub exit: Option<&'static str>,
}

#[derive(Clone, Debug)]
pub struct ActionTrigger {
    data: EffectData,
    config: AnimationConfig,
    policy: RevertPolicy,
    last_event: Option<ActionPhase>,
    pending: Option<ActionPhase>,
}

impl ActionTrigger {
    pub fn new(config: AnimationConfig) -> Self {
        let policy = config
            .text("revert")
            .map(RevertPolicy::parse)
            .unwrap_or_default();
        Self {
            // Action effects describe where the pointer pushes the element, so
            // every direction is flipped.
            data: derive_effect_style(&config, true),
            config,
            policy,
            last_event: None,
            pending: None,
        }
    }

    #[inline]
    pub fn policy(&self) -> RevertPolicy {
        self.policy
    }

    /// Phase of the last cycle that ran to completion.
    #[inline]
    pub fn last_event(&self) -> Option<ActionPhase> {
        self.last_event
    }

    pub fn events(&self) -> ActionEvents {
        let (enter, exit) = match self.config.text("actionEvent") {
            Some("click") => ("mousedown", "mouseup"),
            _ => ("mouseenter", "mouseleave"),
        };
        ActionEvents {
            enter,
            exit: (self.policy == RevertPolicy::AfterEvent).then_some(exit),
        }
    }

    /// The phase a request actually plays: a repeated phase toggles out under
    /// [`RevertPolicy::WhenToggled`].
    pub fn resolve_phase(&self, requested: ActionPhase) -> ActionPhase {
        if self.policy == RevertPolicy::WhenToggled && self.last_event == Some(requested) {
            ActionPhase::Out
        } else {
            requested
        }
    }

    pub fn start<E, T>(
        &mut self,
        guard: &mut CycleGuard,
        requested: ActionPhase,
        element: &E,
        targets: &[T],
    ) -> Option<Cycle>
    where
        E: ElementProbe,
        T: ElementProbe,
    {
        let phase = self.resolve_phase(requested);
        if guard.is_busy() {
            log::trace!("action {phase:?} rejected: cycle in flight");
            return None;
        }
        if self.policy == RevertPolicy::AfterCycle && self.last_event == Some(phase) {
            log::trace!("action {phase:?} rejected: already played");
            return None;
        }

        guard.acquire();
        self.pending = Some(phase);

        let probes = target_list(element, targets);
        let mut cycle = Cycle::new(TriggerKind::Action);
        let mut last = 0.0;
        for (index, probe) in probes.iter().enumerate() {
            last = self.play_target(&mut cycle, phase, *probe, index);
        }
        cycle.duration = settle_duration(last, &self.config, probes.len());
        if self.policy == RevertPolicy::AfterCycle && phase == ActionPhase::In {
            cycle.follow_up = Some(FollowUp {
                phase: ActionPhase::Out,
                after: cycle.duration,
            });
        }
        log::debug!("action {phase:?} started, {}ms", cycle.duration);
        Some(cycle)
    }

    /// Record the pending phase as played.
    pub fn complete(&mut self) {
        if let Some(phase) = self.pending.take() {
            self.last_event = Some(phase);
        }
    }

    /// Revert every target to rest.
    pub fn reset(&self, targets: usize) -> Vec<Playback> {
        let count = targets.max(1);
        if self.config.flag("hasElastic") {
            let elastic = ElasticSynthesizer::new(&self.data);
            (0..count).map(|i| elastic.revert(i)).collect()
        } else {
            let linear = LinearSynthesizer::new(&self.data);
            (0..count).map(|i| linear.revert(i)).collect()
        }
    }

    fn play_target(
        &self,
        cycle: &mut Cycle,
        phase: ActionPhase,
        probe: &dyn ElementProbe,
        index: usize,
    ) -> f64 {
        if self.config.flag("hasElastic") {
            let plan = match phase {
                ActionPhase::In => ElasticSynthesizer::new(&self.data).vault(probe, index),
                ActionPhase::Out => ElasticSynthesizer::new(&self.data)
                    .with_alt(true)
                    .recoil(probe, index),
            };
            cycle.playbacks.extend(plan.playbacks);
            return plan.duration;
        }

        let playback = match phase {
            ActionPhase::In => LinearSynthesizer::new(&self.data).step_in(index),
            ActionPhase::Out => LinearSynthesizer::new(&self.data)
                .with_alt(true)
                .step_out(index),
        };
        let duration = playback.timing.duration;
        cycle.playbacks.push(playback);
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ElementSnapshot;

    const NONE: [ElementSnapshot; 0] = [];

    fn action(strx: &str) -> ActionTrigger {
        ActionTrigger::new(AnimationConfig::from_strx(strx))
    }

    fn el() -> ElementSnapshot {
        ElementSnapshot::at(0.0, 100.0)
    }

    #[test]
    fn hover_in_uses_reversed_direction() {
        let mut a = action("translateType:top|translate:12|duration:250");
        let mut guard = CycleGuard::default();
        let cycle = a.start(&mut guard, ActionPhase::In, &el(), &NONE).unwrap();
        assert_eq!(
            cycle.playbacks[0].keyframes[0].transform.as_deref(),
            Some("translateY(-12px)")
        );
        assert_eq!(cycle.duration, 250.0);
        assert!(guard.is_busy());
        assert!(a.start(&mut guard, ActionPhase::Out, &el(), &NONE).is_none());
    }

    #[test]
    fn out_phase_steps_back_with_alt_timing() {
        let mut a = action("translateType:left|translate:5|duration:250|durationAlt:700|diffOptions:true");
        let mut guard = CycleGuard::default();
        let cycle = a.start(&mut guard, ActionPhase::Out, &el(), &NONE).unwrap();
        assert_eq!(
            cycle.playbacks[0].keyframes[0].transform.as_deref(),
            Some("translateX(0px)")
        );
        assert_eq!(cycle.duration, 700.0);
    }

    #[test]
    fn when_toggled_flips_repeats_to_out() {
        let mut a = action("translateType:left|translate:5|duration:100|revert:when-toggled|actionEvent:click");
        let mut guard = CycleGuard::default();
        a.start(&mut guard, ActionPhase::In, &el(), &NONE).unwrap();
        guard.release();
        a.complete();
        assert_eq!(a.last_event(), Some(ActionPhase::In));
        assert_eq!(a.resolve_phase(ActionPhase::In), ActionPhase::Out);
        a.start(&mut guard, ActionPhase::In, &el(), &NONE).unwrap();
        guard.release();
        a.complete();
        assert_eq!(a.last_event(), Some(ActionPhase::Out));
        assert_eq!(a.resolve_phase(ActionPhase::In), ActionPhase::In);
        assert_eq!(
            a.events(),
            ActionEvents {
                enter: "mousedown",
                exit: None
            }
        );
    }

    #[test]
    fn after_cycle_schedules_out_and_blocks_repeat() {
        let mut a = action("translateType:left|translate:5|duration:300|revert:after-cycle");
        let mut guard = CycleGuard::default();
        let cycle = a.start(&mut guard, ActionPhase::In, &el(), &NONE).unwrap();
        assert_eq!(
            cycle.follow_up,
            Some(FollowUp {
                phase: ActionPhase::Out,
                after: 300.0
            })
        );
        guard.release();
        a.complete();
        assert!(a.start(&mut guard, ActionPhase::In, &el(), &NONE).is_none());
        let out = a.start(&mut guard, ActionPhase::Out, &el(), &NONE).unwrap();
        assert!(out.follow_up.is_none());
    }

    #[test]
    fn after_event_binds_exit() {
        let a = action("revert:after-event");
        assert_eq!(
            a.events(),
            ActionEvents {
                enter: "mouseenter",
                exit: Some("mouseleave")
            }
        );
    }

    #[test]
    fn elastic_out_recoils_from_live_state() {
        let mut a = action("hasElastic:true|rotateType:clockwise|rotate:15|duration:200|stiffness:5|damping:5|mass:1");
        let mut guard = CycleGuard::default();
        let mut live = el();
        live.transform = Some("matrix(0.965926, 0.258819, -0.258819, 0.965926, 0, 0)".into());
        let cycle = a.start(&mut guard, ActionPhase::Out, &live, &NONE).unwrap();
        let frames = &cycle.playbacks[0].keyframes;
        assert_eq!(frames[0].transform.as_deref(), Some("rotate(15deg)"));
        assert_eq!(
            frames.last().and_then(|s| s.transform.as_deref()),
            Some("rotate(0deg)")
        );
        assert_eq!(a.reset(1)[0].timing.duration, 0.0);
    }
}
