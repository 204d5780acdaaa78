pub mod analyst;
pub mod fundamental;
pub mod relative_strength;
pub mod screener;
pub mod technical;

pub use screener::*;
