//! WASM bridge exposing the delayed CGLE integrator to a JavaScript front end.

use cgle_core::spectrum::dominant_frequency;
use cgle_core::{simulate, Cgle, GridSettings, PoincareSection};
use js_sys::Float64Array;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PoincarePayload {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Index of the first point in the later half.
    split_index: usize,
}

impl From<PoincareSection> for PoincarePayload {
    fn from(section: PoincareSection) -> Self {
        Self {
            split_index: section.len() / 2,
            x: section.x,
            y: section.y,
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[wasm_bindgen]
pub struct WasmCgle {
    model: Cgle,
}

#[wasm_bindgen]
impl WasmCgle {
    #[wasm_bindgen(constructor)]
    pub fn new(
        space_steps: u32,
        time_segments: u32,
        segment_steps: u32,
    ) -> Result<WasmCgle, JsValue> {
        console_error_panic_hook::set_once();

        let settings = GridSettings::new(
            space_steps as usize,
            time_segments as usize,
            segment_steps as usize,
        );
        let model = Cgle::new(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmCgle { model })
    }

    pub fn initialize_state(&mut self) {
        self.model.initialize_state();
    }

    pub fn run_simulation(&mut self) -> Result<(), JsValue> {
        self.model
            .run_simulation()
            .map_err(|e| JsValue::from_str(&format!("Simulation failed: {}", e)))
    }

    pub fn get_params(&self) -> Result<JsValue, JsValue> {
        to_js(self.model.params())
    }

    pub fn get_results(&self) -> Result<JsValue, JsValue> {
        let results = self
            .model
            .get_results()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&results)
    }

    /// Real part of the probe-site trajectory.
    pub fn trace_re(&self) -> Result<Float64Array, JsValue> {
        let results = self
            .model
            .get_results()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Float64Array::from(results.re.as_slice()))
    }

    /// Imaginary part of the probe-site trajectory.
    pub fn trace_im(&self) -> Result<Float64Array, JsValue> {
        let results = self
            .model
            .get_results()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Float64Array::from(results.im.as_slice()))
    }

    pub fn get_poincare_section(&self) -> Result<JsValue, JsValue> {
        let section = self
            .model
            .get_poincare_section()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&PoincarePayload::from(section))
    }

    pub fn dominant_frequency(&self) -> Result<f64, JsValue> {
        let results = self
            .model
            .get_results()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        dominant_frequency(&results.re, self.model.params().k)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// One-shot run from a serialized `GridSettings` object.
#[wasm_bindgen]
pub fn run_cgle(settings: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let settings: GridSettings = if settings.is_undefined() || settings.is_null() {
        GridSettings::entry_point()
    } else {
        from_value(settings).map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?
    };
    let output = simulate(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&output)
}

#[cfg(test)]
mod tests {
    use super::{run_cgle, WasmCgle};
    use cgle_core::GridSettings;
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn constructor_rejects_degenerate_grid() {
        let result = WasmCgle::new(2, 2, 3);
        assert!(result.is_err(), "should reject two-point grid");
        let message = result
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("space_steps"));
    }

    #[wasm_bindgen_test]
    fn run_requires_initialization() {
        let mut model = WasmCgle::new(5, 2, 3).expect("valid grid");
        let message = model
            .run_simulation()
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("not initialized"));
    }

    #[wasm_bindgen_test]
    fn traces_cover_the_window() {
        let mut model = WasmCgle::new(5, 2, 3).expect("valid grid");
        model.initialize_state();
        model.run_simulation().expect("run");
        assert_eq!(model.trace_re().expect("re").length(), 7);
        assert_eq!(model.trace_im().expect("im").length(), 7);
        assert!(model.get_poincare_section().expect("section").is_object());
    }

    #[wasm_bindgen_test]
    fn run_cgle_accepts_serialized_settings() {
        let settings = to_value(&GridSettings::new(5, 2, 3)).expect("settings");
        let output = run_cgle(settings).expect("run");
        assert!(output.is_object());
    }
}
