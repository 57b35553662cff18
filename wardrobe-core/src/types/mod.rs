//! Record types
//!
//! Serialized shapes of the records the import utilities read and write,
//! plus the project manifest.

mod catalog;
mod item;
mod outfit;
mod project;

pub use catalog::*;
pub use item::*;
pub use outfit::*;
pub use project::*;
