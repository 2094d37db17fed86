//! WebGPU rendering
//!
//! One fullscreen-triangle pipeline; the whole scene is drawn in the
//! fragment shader from the simulation state.

mod sdf_pipeline;

pub use sdf_pipeline::SdfRenderState;
