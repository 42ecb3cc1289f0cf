use js_sys::JSON;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use visprit_animation_core::{
    ActionPhase, AnimationConfig, Counter, CounterFrame, ElementId, ElementSnapshot,
    ScrollSample, Stage, TriggerKind, Viewport,
};

#[wasm_bindgen]
pub struct VispritStage {
    core: Stage,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse_kind(kind: &str) -> Result<TriggerKind, JsError> {
    TriggerKind::parse(kind).ok_or_else(|| JsError::new(&format!("unknown trigger kind '{kind}'")))
}

fn parse_phase(phase: &str) -> Result<ActionPhase, JsError> {
    match phase {
        "in" => Ok(ActionPhase::In),
        "out" => Ok(ActionPhase::Out),
        other => Err(JsError::new(&format!("unknown action phase '{other}'"))),
    }
}

/// Accepts a compact `key:value|...` string or a plain JS object.
fn config_from_js(config: JsValue) -> Result<AnimationConfig, JsError> {
    if let Some(text) = config.as_string() {
        return Ok(AnimationConfig::from_strx(&text));
    }
    if jsvalue_is_undefined_or_null(&config) {
        return Ok(AnimationConfig::new());
    }
    // Stringify and hand off to the core JSON path, which keeps key order
    let s = JSON::stringify(&config)
        .map_err(|e| JsError::new(&format!("config stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new("config: stringify produced non-string"))?;
    AnimationConfig::from_json(&s).map_err(|e| JsError::new(&format!("config error: {e}")))
}

fn element_from_js(element: JsValue) -> Result<ElementSnapshot, JsError> {
    swb::from_value(element).map_err(|e| JsError::new(&format!("element snapshot error: {e}")))
}

fn targets_from_js(targets: JsValue) -> Result<Vec<ElementSnapshot>, JsError> {
    if jsvalue_is_undefined_or_null(&targets) {
        return Ok(Vec::new());
    }
    swb::from_value(targets).map_err(|e| JsError::new(&format!("targets error: {e}")))
}

fn to_js<T: Serialize>(value: &T, what: &str) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

#[wasm_bindgen]
impl VispritStage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> VispritStage {
        console_error_panic_hook::set_once();
        VispritStage { core: Stage::new() }
    }

    /// Register an element. Returns its id (u32).
    #[wasm_bindgen(js_name = add_element)]
    pub fn add_element(&mut self) -> u32 {
        self.core.add_element().0
    }

    #[wasm_bindgen(js_name = remove_element)]
    pub fn remove_element(&mut self, id: u32) -> bool {
        self.core.remove_element(ElementId(id))
    }

    /// Attach a trigger (`"glance" | "scroll" | "action"`). `config` is either a
    /// compact attribute string or an object.
    #[wasm_bindgen]
    pub fn attach(&mut self, id: u32, kind: String, config: JsValue) -> Result<(), JsError> {
        let kind = parse_kind(&kind)?;
        let config = config_from_js(config)?;
        self.core
            .attach(ElementId(id), kind, config)
            .map_err(|e| JsError::new(&format!("attach error: {e}")))
    }

    /// Returns a Cycle object, or `undefined` when the glance does not start.
    #[wasm_bindgen]
    pub fn glance(
        &mut self,
        id: u32,
        element: JsValue,
        targets: JsValue,
        viewport: JsValue,
    ) -> Result<JsValue, JsError> {
        let element = element_from_js(element)?;
        let targets = targets_from_js(targets)?;
        let viewport: Viewport =
            swb::from_value(viewport).map_err(|e| JsError::new(&format!("viewport error: {e}")))?;
        let cycle = self
            .core
            .glance(ElementId(id), &element, &targets, viewport)
            .map_err(|e| JsError::new(&format!("glance error: {e}")))?;
        to_js(&cycle, "cycle")
    }

    /// Feed one scroll sample (`{ scrollY, previousScrollY, viewport }`).
    #[wasm_bindgen]
    pub fn scroll(
        &mut self,
        id: u32,
        element: JsValue,
        targets: JsValue,
        sample: JsValue,
    ) -> Result<JsValue, JsError> {
        let element = element_from_js(element)?;
        let targets = targets_from_js(targets)?;
        let sample: ScrollSample = swb::from_value(sample)
            .map_err(|e| JsError::new(&format!("scroll sample error: {e}")))?;
        let cycle = self
            .core
            .scroll(ElementId(id), &element, &targets, sample)
            .map_err(|e| JsError::new(&format!("scroll error: {e}")))?;
        to_js(&cycle, "cycle")
    }

    /// Request an action phase (`"in" | "out"`).
    #[wasm_bindgen]
    pub fn action(
        &mut self,
        id: u32,
        phase: String,
        element: JsValue,
        targets: JsValue,
    ) -> Result<JsValue, JsError> {
        let phase = parse_phase(&phase)?;
        let element = element_from_js(element)?;
        let targets = targets_from_js(targets)?;
        let cycle = self
            .core
            .action(ElementId(id), phase, &element, &targets)
            .map_err(|e| JsError::new(&format!("action error: {e}")))?;
        to_js(&cycle, "cycle")
    }

    /// `{ enter, exit? }` DOM event names for an element's action trigger.
    #[wasm_bindgen(js_name = action_events)]
    pub fn action_events(&self, id: u32) -> Result<JsValue, JsError> {
        let events = self
            .core
            .action_events(ElementId(id))
            .map_err(|e| JsError::new(&format!("action events error: {e}")))?;
        to_js(&events, "action events")
    }

    /// Report that the cycle of `kind` finished playing.
    #[wasm_bindgen]
    pub fn finish(&mut self, id: u32, kind: String) -> Result<(), JsError> {
        let kind = parse_kind(&kind)?;
        self.core
            .finish(ElementId(id), kind)
            .map_err(|e| JsError::new(&format!("finish error: {e}")))
    }

    /// Revert playbacks for `targets` targets (at least one).
    #[wasm_bindgen]
    pub fn reset(&self, id: u32, kind: String, targets: u32) -> Result<JsValue, JsError> {
        let kind = parse_kind(&kind)?;
        let playbacks = self
            .core
            .reset(ElementId(id), kind, targets as usize)
            .map_err(|e| JsError::new(&format!("reset error: {e}")))?;
        to_js(&playbacks, "playbacks")
    }

    /// Ids whose glance has not played yet.
    #[wasm_bindgen(js_name = pending_glances)]
    pub fn pending_glances(&self) -> Vec<u32> {
        self.core.pending_glances().into_iter().map(|id| id.0).collect()
    }

    #[wasm_bindgen(js_name = is_busy)]
    pub fn is_busy(&self, id: u32) -> Result<bool, JsError> {
        self.core
            .is_busy(ElementId(id))
            .map_err(|e| JsError::new(&format!("is_busy error: {e}")))
    }
}

impl Default for VispritStage {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize)]
struct CounterTick {
    counter: Counter,
    frame: CounterFrame,
}

/// Advance a counter from a cycle. Returns `{ counter, frame }`; pass the
/// returned counter to the next call.
#[wasm_bindgen]
pub fn counter_tick(counter: JsValue, timestamp_ms: f64) -> Result<JsValue, JsError> {
    let mut counter: Counter =
        swb::from_value(counter).map_err(|e| JsError::new(&format!("counter error: {e}")))?;
    let frame = counter.tick(timestamp_ms);
    to_js(&CounterTick { counter, frame }, "counter tick")
}

/// Parse the compact attribute form into a config object.
#[wasm_bindgen]
pub fn parse_config_strx(text: String) -> Result<JsValue, JsError> {
    let config = AnimationConfig::from_strx(&text);
    config
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("config error: {e}")))
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
