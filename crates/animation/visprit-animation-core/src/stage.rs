//! Stage: registry of animated elements and their triggers.
//!
//! Each element owns one [`CycleGuard`] shared by up to one trigger of each
//! kind. The stage routes host events to the right trigger and hands back the
//! resulting [`Cycle`]; the host plays it and calls [`Stage::finish`] once its
//! duration has elapsed.

use hashbrown::HashMap;

use crate::config::AnimationConfig;
use crate::error::StageError;
use crate::host::{ElementProbe, ScrollSample, Viewport};
use crate::ids::{ElementId, IdAllocator};
use crate::timing::Playback;
use crate::trigger::{
    ActionEvents, ActionPhase, ActionTrigger, Cycle, CycleGuard, GlanceTrigger, ScrollTrigger,
    TriggerKind,
};

#[derive(Debug, Default)]
struct ElementSlot {
    guard: CycleGuard,
    glance: Option<GlanceTrigger>,
    scroll: Option<ScrollTrigger>,
    action: Option<ActionTrigger>,
}

#[derive(Debug, Default)]
pub struct Stage {
    ids: IdAllocator,
    slots: HashMap<ElementId, ElementSlot>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new element with no triggers.
    pub fn add_element(&mut self) -> ElementId {
        let id = self.ids.alloc_element();
        self.slots.insert(id, ElementSlot::default());
        id
    }

    /// Drop an element and its triggers. Returns false for unknown ids.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        self.slots.remove(&id).is_some()
    }

    /// Attach (or replace) the trigger of `kind` on an element.
    pub fn attach(
        &mut self,
        id: ElementId,
        kind: TriggerKind,
        config: AnimationConfig,
    ) -> Result<(), StageError> {
        let slot = self.slot_mut(id)?;
        match kind {
            TriggerKind::Glance => slot.glance = Some(GlanceTrigger::new(config)?),
            TriggerKind::Scroll => slot.scroll = Some(ScrollTrigger::new(config)?),
            TriggerKind::Action => slot.action = Some(ActionTrigger::new(config)),
        }
        log::debug!("attached {kind:?} trigger to {id:?}");
        Ok(())
    }

    pub fn glance<E, T>(
        &mut self,
        id: ElementId,
        element: &E,
        targets: &[T],
        viewport: Viewport,
    ) -> Result<Option<Cycle>, StageError>
    where
        E: ElementProbe,
        T: ElementProbe,
    {
        let slot = self.slot_mut(id)?;
        let trigger = slot.glance.as_mut().ok_or(StageError::MissingTrigger {
            id,
            kind: TriggerKind::Glance,
        })?;
        Ok(trigger.start(&mut slot.guard, element, targets, viewport))
    }

    pub fn scroll<E, T>(
        &mut self,
        id: ElementId,
        element: &E,
        targets: &[T],
        sample: ScrollSample,
    ) -> Result<Option<Cycle>, StageError>
    where
        E: ElementProbe,
        T: ElementProbe,
    {
        let slot = self.slot_mut(id)?;
        let trigger = slot.scroll.as_mut().ok_or(StageError::MissingTrigger {
            id,
            kind: TriggerKind::Scroll,
        })?;
        Ok(trigger.start(&slot.guard, element, targets, sample))
    }

    pub fn action<E, T>(
        &mut self,
        id: ElementId,
        phase: ActionPhase,
        element: &E,
        targets: &[T],
    ) -> Result<Option<Cycle>, StageError>
    where
        E: ElementProbe,
        T: ElementProbe,
    {
        let slot = self.slot_mut(id)?;
        let trigger = slot.action.as_mut().ok_or(StageError::MissingTrigger {
            id,
            kind: TriggerKind::Action,
        })?;
        Ok(trigger.start(&mut slot.guard, phase, element, targets))
    }

    /// Events the host should listen for on an element with an action trigger.
    pub fn action_events(&self, id: ElementId) -> Result<ActionEvents, StageError> {
        self.slot(id)?
            .action
            .as_ref()
            .map(ActionTrigger::events)
            .ok_or(StageError::MissingTrigger {
                id,
                kind: TriggerKind::Action,
            })
    }

    /// Report that the last cycle of `kind` has finished playing.
    pub fn finish(&mut self, id: ElementId, kind: TriggerKind) -> Result<(), StageError> {
        let slot = self.slot_mut(id)?;
        let attached = match kind {
            TriggerKind::Glance => slot.glance.is_some(),
            TriggerKind::Scroll => slot.scroll.is_some(),
            TriggerKind::Action => match slot.action.as_mut() {
                Some(action) => {
                    action.complete();
                    true
                }
                None => false,
            },
        };
        if !attached {
            return Err(StageError::MissingTrigger { id, kind });
        }
        slot.guard.release();
        Ok(())
    }

    /// Revert playbacks for every target of the trigger of `kind`.
    pub fn reset(
        &self,
        id: ElementId,
        kind: TriggerKind,
        targets: usize,
    ) -> Result<Vec<Playback>, StageError> {
        let slot = self.slot(id)?;
        let playbacks = match kind {
            TriggerKind::Glance => slot.glance.as_ref().map(|t| t.reset(targets)),
            TriggerKind::Scroll => slot.scroll.as_ref().map(|t| t.reset(targets)),
            TriggerKind::Action => slot.action.as_ref().map(|t| t.reset(targets)),
        };
        playbacks.ok_or(StageError::MissingTrigger { id, kind })
    }

    /// Elements whose glance has not played yet, in registration order.
    pub fn pending_glances(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.glance.as_ref().is_some_and(|g| !g.started()))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    pub fn is_busy(&self, id: ElementId) -> Result<bool, StageError> {
        Ok(self.slot(id)?.guard.is_busy())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, id: ElementId) -> Result<&ElementSlot, StageError> {
        self.slots.get(&id).ok_or(StageError::UnknownElement(id))
    }

    fn slot_mut(&mut self, id: ElementId) -> Result<&mut ElementSlot, StageError> {
        self.slots
            .get_mut(&id)
            .ok_or(StageError::UnknownElement(id))
    }
}
