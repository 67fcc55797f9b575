//! Little-endian binary reading and writing with position tracking.

mod deserialization;
mod error;
mod serialization;

pub use deserialization::*;
pub use error::*;
pub use serialization::*;
