//! Schema model and schema providers

mod ddl;
mod model;
mod provider;

pub use ddl::*;
pub use model::*;
pub use provider::*;
