//! Error plumbing between external crates, Graph errors and domain errors.

pub mod conversions;

pub use crate::graph::errors::{GraphError, GraphErrorCategory};
