//! Code generation module

mod casing;
mod context;
mod declaration;
mod escape;
mod generators;
mod identifier;
mod interface;
mod metadata;
mod output;
mod render;
mod type_resolver;

pub use casing::*;
pub use context::*;
pub use declaration::*;
pub use escape::*;
pub use generators::*;
pub use identifier::*;
pub use interface::*;
pub use metadata::*;
pub use output::*;
pub use render::*;
pub use type_resolver::*;
