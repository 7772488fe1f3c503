//! WASM bindings for Wirelogic Core.
//!
//! This module provides JavaScript-friendly bindings so a browser-side
//! schematic editor can drive the circuit model: the editor owns rendering
//! and mouse handling and calls in here for every edit.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCircuit } from 'wirelogic_core';
//!
//! await init();
//!
//! const circuit = new WasmCircuit();
//! circuit.add_ground(0, 0);
//! const src = circuit.add_dc_voltage(5.0, 0, 0, 1, 1);
//! const sw = circuit.add_switch(false, 1, 1, 2, 2);
//! circuit.change_state(sw);
//! circuit.node_voltage(2, 2); // 5
//!
//! // Clocks are ticked by a host timer:
//! setInterval(() => circuit.tick(clk), circuit.time_interval(clk));
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{Circuit, ComponentId, Point};
use crate::components::{Clock, Component, DcVoltage, Ground, Resistor, Switch, SwitchState, Wire};
use crate::error::CircuitError;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: CircuitError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible circuit model.
///
/// Components are addressed by the numeric handle returned when they are
/// added; handles stay valid across removals of other components.
#[wasm_bindgen]
pub struct WasmCircuit {
    circuit: Circuit,
}

#[wasm_bindgen]
impl WasmCircuit {
    /// Create an empty circuit.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCircuit {
        WasmCircuit {
            circuit: Circuit::new(),
        }
    }

    fn place(&mut self, component: Component, points: &[Point]) -> Result<usize, JsValue> {
        self.circuit
            .place(component, points)
            .map(|id| id.0)
            .map_err(to_js)
    }

    /// Add a ground symbol at (x, y).
    #[wasm_bindgen]
    pub fn add_ground(&mut self, x: i32, y: i32) -> Result<usize, JsValue> {
        self.place(Ground::new().into(), &[Point::new(x, y)])
    }

    /// Add a wire between two points.
    #[wasm_bindgen]
    pub fn add_wire(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<usize, JsValue> {
        self.place(Wire::new().into(), &[Point::new(x1, y1), Point::new(x2, y2)])
    }

    /// Add a resistor between two points.
    #[wasm_bindgen]
    pub fn add_resistor(
        &mut self,
        resistance: f64,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<usize, JsValue> {
        let resistor = Resistor::new(resistance).map_err(to_js)?;
        self.place(resistor.into(), &[Point::new(x1, y1), Point::new(x2, y2)])
    }

    /// Add a switch between two points.
    #[wasm_bindgen]
    pub fn add_switch(
        &mut self,
        closed: bool,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<usize, JsValue> {
        let state = if closed {
            SwitchState::Closed
        } else {
            SwitchState::Open
        };
        self.place(Switch::new(state).into(), &[Point::new(x1, y1), Point::new(x2, y2)])
    }

    /// Add a DC source with its reference at (x1, y1) and its positive
    /// terminal at (x2, y2).
    #[wasm_bindgen]
    pub fn add_dc_voltage(
        &mut self,
        voltage: f64,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<usize, JsValue> {
        self.place(
            DcVoltage::new(voltage).into(),
            &[Point::new(x1, y1), Point::new(x2, y2)],
        )
    }

    /// Add a clock; terminals as for [`add_dc_voltage`](Self::add_dc_voltage).
    #[wasm_bindgen]
    pub fn add_clock(
        &mut self,
        voltage: f64,
        interval_ms: u32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<usize, JsValue> {
        let clock = Clock::new(voltage, u64::from(interval_ms)).map_err(to_js)?;
        self.place(clock.into(), &[Point::new(x1, y1), Point::new(x2, y2)])
    }

    /// Remove a component.
    #[wasm_bindgen]
    pub fn remove(&mut self, id: usize) -> Result<(), JsValue> {
        self.circuit.remove(ComponentId(id)).map(|_| ()).map_err(to_js)
    }

    /// Remove every component.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.circuit.remove_components();
    }

    /// Move the terminal at (x_from, y_from) to (x_to, y_to).
    #[wasm_bindgen]
    pub fn reconnect(
        &mut self,
        id: usize,
        x_from: i32,
        y_from: i32,
        x_to: i32,
        y_to: i32,
    ) -> Result<(), JsValue> {
        self.circuit
            .reconnect(ComponentId(id), Point::new(x_from, y_from), Point::new(x_to, y_to))
            .map_err(to_js)
    }

    /// Detach the terminal at (x, y).
    #[wasm_bindgen]
    pub fn disconnect_at(&mut self, id: usize, x: i32, y: i32) -> Result<(), JsValue> {
        self.circuit
            .disconnect_at(ComponentId(id), Point::new(x, y))
            .map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_voltage(&mut self, id: usize, voltage: f64) -> Result<(), JsValue> {
        self.circuit
            .set_voltage(ComponentId(id), voltage)
            .map(|_| ())
            .map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_resistance(&mut self, id: usize, resistance: f64) -> Result<(), JsValue> {
        self.circuit
            .set_resistance(ComponentId(id), resistance)
            .map_err(to_js)
    }

    /// Toggle a switch.
    #[wasm_bindgen]
    pub fn change_state(&mut self, id: usize) -> Result<(), JsValue> {
        self.circuit.change_state(ComponentId(id)).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn rotate(&mut self, id: usize, angle: i32) -> Result<(), JsValue> {
        self.circuit.rotate(ComponentId(id), angle).map_err(to_js)
    }

    /// Timer callback for a clock.
    #[wasm_bindgen]
    pub fn tick(&mut self, id: usize) -> Result<(), JsValue> {
        self.circuit.tick(ComponentId(id)).map(|_| ()).map_err(to_js)
    }

    /// Interval at which the host should call [`tick`](Self::tick).
    #[wasm_bindgen]
    pub fn time_interval(&self, id: usize) -> Result<u32, JsValue> {
        let component = self.circuit.component(ComponentId(id)).map_err(to_js)?;
        component
            .as_clock()
            .map(|c| c.time_interval_ms().min(u64::from(u32::MAX)) as u32)
            .ok_or_else(|| to_js(component.wrong_type(crate::ComponentKind::Clock)))
    }

    /// Voltage at (x, y), or `undefined` if no node exists there.
    #[wasm_bindgen]
    pub fn node_voltage(&self, x: i32, y: i32) -> Option<f64> {
        self.circuit.node_voltage(Point::new(x, y))
    }

    /// Voltage reading of a component.
    #[wasm_bindgen]
    pub fn voltage(&self, id: usize) -> Result<f64, JsValue> {
        self.circuit.voltage(ComponentId(id)).map_err(to_js)
    }

    /// Current through a resistor.
    #[wasm_bindgen]
    pub fn current(&self, id: usize) -> Result<f64, JsValue> {
        self.circuit.current(ComponentId(id)).map_err(to_js)
    }

    /// Variant tag ("resistor", "wire", ...) used to pick a symbol.
    #[wasm_bindgen]
    pub fn component_type(&self, id: usize) -> Result<String, JsValue> {
        self.circuit
            .component(ComponentId(id))
            .map(|c| c.component_type().to_string())
            .map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn name(&self, id: usize) -> Result<String, JsValue> {
        self.circuit
            .component(ComponentId(id))
            .map(|c| c.name().to_string())
            .map_err(to_js)
    }

    /// Terminal coordinates as a flat `[x0, y0, x1, y1, ...]` array.
    #[wasm_bindgen]
    pub fn terminal_points(&self, id: usize) -> Result<Vec<i32>, JsValue> {
        let points = self.circuit.terminal_points(ComponentId(id)).map_err(to_js)?;
        Ok(points.iter().flat_map(|p| [p.x, p.y]).collect())
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.circuit.size()
    }

    #[wasm_bindgen(getter)]
    pub fn node_count(&self) -> usize {
        self.circuit.node_count()
    }
}

impl Default for WasmCircuit {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
