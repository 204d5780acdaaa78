pub mod analyzer;
pub mod universe;

pub use analyzer::*;
pub use universe::*;
