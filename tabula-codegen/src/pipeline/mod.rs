//! Generation pipeline and built-in hooks

mod hooks;
mod index_file;
mod mark_generated;
mod migration;
mod runner;

pub use hooks::*;
pub use index_file::*;
pub use mark_generated::*;
pub use migration::*;
pub use runner::*;
