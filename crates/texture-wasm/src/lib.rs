//! Browser bindings: a rendering surface in JS forwards raw events here and
//! draws the scene it gets back.

use js_sys::Float64Array;
use texture_core::{classify, Axis, Controller, DiagramConfig, Event, TextureClass, TextureError};
use wasm_bindgen::prelude::*;

fn js_err(e: TextureError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_axis(name: &str) -> Result<Axis, JsValue> {
    name.parse().map_err(js_err)
}

/// Parse an optional JSON config; empty or absent means defaults.
fn config_from(json: Option<String>) -> Result<DiagramConfig, TextureError> {
    match json.as_deref().map(str::trim) {
        None | Some("") => Ok(DiagramConfig::default()),
        Some(s) => DiagramConfig::from_json(s),
    }
}

/// Parse one event from its JSON form, e.g.
/// `{"type":"slider","axis":"clay","value":40}`.
fn event_from(json: &str) -> Result<Event, TextureError> {
    serde_json::from_str(json).map_err(|e| TextureError::InvalidConfig(format!("bad event: {e}")))
}

/// One interactive ternary diagram.
#[wasm_bindgen]
pub struct TernaryDiagram {
    controller: Controller,
}

#[wasm_bindgen]
impl TernaryDiagram {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<TernaryDiagram, JsValue> {
        let config = config_from(config_json).map_err(js_err)?;
        let controller = Controller::new(config).map_err(js_err)?;
        Ok(Self { controller })
    }

    /// Each event method returns true when the composition changed.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.controller.dispatch(Event::PointerDown { x, y })
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.controller.dispatch(Event::PointerMove { x, y })
    }

    pub fn pointer_up(&mut self) {
        self.controller.dispatch(Event::PointerUp);
    }

    pub fn pointer_leave(&mut self) {
        self.controller.dispatch(Event::PointerLeave);
    }

    pub fn slider(&mut self, axis: &str, value: f64) -> Result<bool, JsValue> {
        let axis = parse_axis(axis)?;
        Ok(self.controller.dispatch(Event::Slider { axis, value }))
    }

    pub fn input(&mut self, axis: &str, text: String) -> Result<(), JsValue> {
        let axis = parse_axis(axis)?;
        self.controller.dispatch(Event::Input { axis, text });
        Ok(())
    }

    pub fn commit(&mut self, axis: &str) -> Result<bool, JsValue> {
        let axis = parse_axis(axis)?;
        Ok(self.controller.dispatch(Event::Commit { axis }))
    }

    pub fn toggle_lock(&mut self, axis: &str) -> Result<bool, JsValue> {
        let axis = parse_axis(axis)?;
        self.controller.dispatch(Event::ToggleLock { axis });
        Ok(self.controller.state().locks.is_locked(axis))
    }

    /// Legend click by class display name.
    pub fn select_class(&mut self, name: &str) -> Result<bool, JsValue> {
        let class: TextureClass = name.parse().map_err(js_err)?;
        Ok(self.controller.dispatch(Event::SelectClass { class }))
    }

    /// Apply an event given as JSON.
    pub fn dispatch(&mut self, event_json: &str) -> Result<bool, JsValue> {
        let event = event_from(event_json).map_err(js_err)?;
        Ok(self.controller.dispatch(event))
    }

    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// Clay, silt, sand fractions.
    pub fn composition(&self) -> Float64Array {
        let c = self.controller.composition();
        Float64Array::from(&[c.clay, c.silt, c.sand][..])
    }

    pub fn class_name(&self) -> String {
        self.controller.class().name().to_string()
    }

    /// Full render snapshot as a plain JS object.
    pub fn scene(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.controller.scene())
            .map_err(|e| JsValue::from_str(&format!("scene serialization failed: {e}")))
    }
}

/// Stateless classification for callers that only need a label.
#[wasm_bindgen(js_name = classifyTexture)]
pub fn classify_texture(clay: f64, silt: f64, sand: f64) -> String {
    classify(clay, silt, sand).name().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_means_defaults() {
        assert_eq!(config_from(None).unwrap(), DiagramConfig::default());
        assert_eq!(config_from(Some("  ".into())).unwrap(), DiagramConfig::default());
        assert!(config_from(Some(r#"{"size": -1}"#.into())).is_err());
    }

    #[test]
    fn events_parse_from_json() {
        let e = event_from(r#"{"type":"toggle_lock","axis":"silt"}"#).unwrap();
        assert_eq!(e, Event::ToggleLock { axis: Axis::Silt });
        assert!(event_from(r#"{"type":"teleport"}"#).is_err());
    }

    #[test]
    fn classify_texture_returns_display_name() {
        assert_eq!(classify_texture(0.15, 0.40, 0.45), "Loam");
    }
}
