//! Dynamic value and type model for deepmerge
//!
//! Values carry enough static information to tell "unknown content" apart
//! from "unknown shape": a record type lists its attribute names even when
//! the record itself is unknown, while a map only reveals its keys once the
//! map is known.

pub mod error;
pub mod json;
pub mod types;
pub mod value;

pub use error::CoreError;
pub use types::Type;
pub use value::Value;
