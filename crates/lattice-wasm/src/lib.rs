//! Browser bindings: build a generator tree from JSON and sample chunks.
//!
//! Queries are synchronous underneath; `sample_chunk` is `async` only so JS
//! callers can await it alongside other work.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use lattice_core::{GeneratorConfig, NoiseGenerator, Region, Seed};

/// One chunk query. `origin`, `steps` and `step_size` carry one entry per
/// axis; their common length picks the dimension (1 to 3).
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkRequest {
    pub origin: Vec<f64>,
    pub steps: Vec<usize>,
    pub step_size: Vec<f64>,
    #[serde(default)]
    pub seed: Option<Seed>,
}

/// Samples in storage order (last axis fastest) plus the tree's bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkResponse {
    pub dims: Vec<usize>,
    pub min: f64,
    pub max: f64,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundsResponse {
    pub min: f64,
    pub max: f64,
}

fn sample_in<const D: usize>(config: &GeneratorConfig, request: &ChunkRequest) -> anyhow::Result<ChunkResponse> {
    let tree = config.build::<D>().context("building generator")?;
    let region = Region::new(axis_array(&request.origin)?, axis_array(&request.steps)?, axis_array(&request.step_size)?);
    let chunk = tree.sample(request.seed, &region).context("sampling chunk")?;
    Ok(ChunkResponse { dims: chunk.dims().to_vec(), min: tree.min(), max: tree.max(), data: chunk.into_vec() })
}

fn axis_array<T: Copy, const D: usize>(values: &[T]) -> anyhow::Result<[T; D]> {
    <[T; D]>::try_from(values).map_err(|_| anyhow::anyhow!("expected {D} axes, found {}", values.len()))
}

/// Parse both documents and sample the requested chunk.
pub fn sample_request(config_json: &str, request_json: &str) -> anyhow::Result<ChunkResponse> {
    let config = GeneratorConfig::from_json(config_json).context("parsing generator config")?;
    let request: ChunkRequest = serde_json::from_str(request_json).context("parsing chunk request")?;
    match request.origin.len() {
        1 => sample_in::<1>(&config, &request),
        2 => sample_in::<2>(&config, &request),
        3 => sample_in::<3>(&config, &request),
        n => bail!("unsupported dimension {n}; requests carry 1 to 3 axes"),
    }
}

/// Declared bounds of a 2D build of the config.
pub fn config_bounds(config_json: &str) -> anyhow::Result<BoundsResponse> {
    let tree = GeneratorConfig::from_json(config_json)?.build::<2>()?;
    Ok(BoundsResponse { min: tree.min(), max: tree.max() })
}

fn to_js(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

/// Sample a chunk of the tree described by `config_json`.
/// Resolves to `{ dims, min, max, data }`.
#[wasm_bindgen]
pub async fn sample_chunk(config_json: String, request_json: String) -> Result<JsValue, JsValue> {
    let response = sample_request(&config_json, &request_json).map_err(to_js)?;
    serde_wasm_bindgen::to_value(&response).map_err(JsValue::from)
}

/// `{ min, max }` of the tree described by `config_json`.
#[wasm_bindgen]
pub fn bounds(config_json: &str) -> Result<JsValue, JsValue> {
    let response = config_bounds(config_json).map_err(to_js)?;
    serde_wasm_bindgen::to_value(&response).map_err(JsValue::from)
}

/// Samples as a `Float64Array`, skipping the JSON object wrapper.
#[wasm_bindgen]
pub fn sample_chunk_f64(config_json: &str, request_json: &str) -> Result<js_sys::Float64Array, JsValue> {
    let response = sample_request(config_json, request_json).map_err(to_js)?;
    Ok(js_sys::Float64Array::from(response.data.as_slice()))
}
