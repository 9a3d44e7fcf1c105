//! Core data types: the canonical trade record, enums, and symbol helpers.

pub mod enums;
pub mod symbol;
pub mod trade;

pub use enums::*;
pub use symbol::*;
pub use trade::*;
