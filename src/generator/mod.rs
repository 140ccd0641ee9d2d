//! Synthetic reading producer for the `reading-generator` binary.

mod controller;
mod loop_worker;
mod synth;

pub use controller::GeneratorController;
pub use loop_worker::{generation_loop, GeneratorStats};
pub use synth::ReadingSynth;
