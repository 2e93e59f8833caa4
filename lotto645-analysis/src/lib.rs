pub mod config;
pub mod frequency;
pub mod prize;
pub mod sampler;
pub mod weights;
