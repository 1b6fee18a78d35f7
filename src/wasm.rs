//! Browser entry points, built with the `wasm` feature.

use js_sys::Array;
use log::Level;
use wasm_bindgen::prelude::*;

use crate::board::Board;

/// Route `log` output to the browser console.
#[wasm_bindgen]
pub fn init_logging() {
    let _ = console_log::init_with_level(Level::Debug);
}

/// Solve a puzzle given as definition text.
///
/// Resolves to an array of lines, each `[[row, col], [row, col]]` in 1-based coordinates, ready to draw.
#[wasm_bindgen]
pub fn solve_definition(definition: &str) -> Result<Array, JsValue> {
    let mut board: Board = definition.parse()
        .map_err(|e| JsValue::from_str(&format!("{}", e)))?;
    let solution = board.solve()
        .map_err(|e| JsValue::from_str(&format!("{}", e)))?;

    let point = |row: usize, col: usize| {
        Array::of2(&JsValue::from(row as u32 + 1), &JsValue::from(col as u32 + 1))
    };

    Ok(solution.lines().iter()
        .map(|l| Array::of2(&point(l.0.0, l.0.1), &point(l.1.0, l.1.1)))
        .collect())
}
