#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! restgen Intermediate Representation (IR)
//!
//! This crate defines the parsed form of a REST API description: global schemas,
//! resources, their actions, parameters and bodies. The IR is the input walked
//! once by the generation pipeline.

pub mod api_description;

// Re-export the main ApiDescription types for convenience
pub use api_description::*;
