pub mod classify;
pub mod scorer;

pub use classify::*;
pub use scorer::*;
