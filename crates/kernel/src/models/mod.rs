//! Domain models shared across the kernel.

pub mod label;
pub mod language;

pub use label::LabelEntry;
pub use language::{Direction, Language};
