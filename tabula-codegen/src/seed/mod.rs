//! Seed preprocessing: dependency-ordered, reference-resolved seed data

mod graph;
mod model;
mod preprocess;

pub use graph::*;
pub use model::*;
pub use preprocess::*;
