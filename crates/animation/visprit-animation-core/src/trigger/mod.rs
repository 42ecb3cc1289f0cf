//! Triggers decide when a cycle may start and what it plays.
//!
//! A trigger never plays anything itself. A successful start returns a
//! [`Cycle`]: the playbacks and counters for every target plus the time after
//! which the host should report completion back through the stage.

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;
use crate::counter::Counter;
use crate::host::ElementProbe;
use crate::timing::Playback;

pub mod action;
pub mod glance;
pub mod scroll;

pub use action::{ActionEvents, ActionPhase, ActionTrigger, RevertPolicy};
pub use glance::GlanceTrigger;
pub use scroll::ScrollTrigger;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// Plays once when the element scrolls into view.
    Glance,
    /// Follows the scroll position.
    Scroll,
    /// Pointer enter/leave or press/release.
    Action,
}

impl TriggerKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "glance" => Some(TriggerKind::Glance),
            "scroll" => Some(TriggerKind::Scroll),
            "action" => Some(TriggerKind::Action),
            _ => None,
        }
    }
}

/// Per-element busy flag shared by all of its triggers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleGuard {
    busy: bool,
}

impl CycleGuard {
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[inline]
    pub fn acquire(&mut self) {
        self.busy = true;
    }

    #[inline]
    pub fn release(&mut self) {
        self.busy = false;
    }
}

/// A counter bound to one target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CounterTrack {
    pub target: usize,
    pub counter: Counter,
}

/// Another start the host should request once the cycle has finished.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub phase: ActionPhase,
    /// Milliseconds after the cycle started.
    pub after: f64,
}

/// Everything one trigger start produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub kind: TriggerKind,
    pub playbacks: Vec<Playback>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counters: Vec<CounterTrack>,
    /// Milliseconds until the host should call `finish`.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<FollowUp>,
}

impl Cycle {
    pub(crate) fn new(kind: TriggerKind) -> Self {
        Self {
            kind,
            playbacks: Vec::new(),
            counters: Vec::new(),
            duration: 0.0,
            follow_up: None,
        }
    }
}

/// The element's own probe when it has no separate targets.
pub(crate) fn target_list<'a, E, T>(element: &'a E, targets: &'a [T]) -> Vec<&'a dyn ElementProbe>
where
    E: ElementProbe,
    T: ElementProbe,
{
    if targets.is_empty() {
        vec![element as &dyn ElementProbe]
    } else {
        targets.iter().map(|t| t as &dyn ElementProbe).collect()
    }
}

/// Completion time when the last target reported none: configured duration
/// and delay plus the cascade spread.
pub(crate) fn fallback_duration(config: &AnimationConfig, targets: usize) -> f64 {
    let spread = if config.flag("cascadeEl") {
        targets.saturating_sub(1) as f64 * config.number_or("cascadeInt", 0.0)
    } else {
        0.0
    };
    config.number_or("duration", 0.0) + config.number_or("delay", 0.0) + spread
}

/// `duration`, unless it is zero or NaN.
pub(crate) fn settle_duration(duration: f64, config: &AnimationConfig, targets: usize) -> f64 {
    if duration == 0.0 || duration.is_nan() {
        fallback_duration(config, targets)
    } else {
        duration
    }
}
