//! Motion sampling: raw accelerometer feed → stillness classification.

pub mod ports;
pub mod sampler;

pub use sampler::{MotionSampler, SamplerMode};
