pub mod binary;

pub use savecheck_core_derive::*;
