//! Visprit Animation Core (host-agnostic)
//!
//! Turns declarative per-element animation configs into keyframe sequences.
//! The crate owns the numeric work (transform algebra, effect/resist parsing,
//! elastic spring synthesis, scroll progress) and returns plain data that a
//! playback host (browser adapter, tests) applies. Nothing here touches a DOM.

pub mod config;
pub mod counter;
pub mod effect;
pub mod elastic;
pub mod error;
pub mod host;
pub mod ids;
pub mod linear;
pub mod numbers;
pub mod props;
pub mod resist;
pub mod spire;
pub mod stage;
pub mod style;
pub mod timing;
pub mod transform;
pub mod trigger;

// Re-exports for consumers (adapters)
pub use config::AnimationConfig;
pub use counter::{Counter, CounterFrame};
pub use effect::{derive_effect_style, EffectData, EffectFamily, EffectFragment};
pub use elastic::{ElasticPlan, ElasticStyle, ElasticSynthesizer, SpringSettings};
pub use error::{ConfigError, StageError};
pub use host::{ElementProbe, ElementSnapshot, Rect, ScrollSample, Viewport};
pub use ids::ElementId;
pub use linear::LinearSynthesizer;
pub use props::TransformProp;
pub use resist::{derive_resist_style, Bearing};
pub use spire::{Origin, Spire, SpireSettings};
pub use stage::Stage;
pub use style::{Style, StyleComposer, StyleProp};
pub use timing::{FillMode, Playback, Timing};
pub use transform::{decompose, Decomposition};
pub use trigger::{
    ActionEvents, ActionPhase, ActionTrigger, CounterTrack, Cycle, CycleGuard, FollowUp,
    GlanceTrigger, RevertPolicy, ScrollTrigger, TriggerKind,
};
