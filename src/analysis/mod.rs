//! Analysis result types

pub mod result;

pub use result::{KeyOutput, Scale};
