pub mod client;
pub mod news;

pub use client::*;
pub use news::*;
