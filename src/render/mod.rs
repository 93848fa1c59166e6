//! Rendering module for outline output.

mod json;

pub use json::{to_json, JsonFormat};
