pub mod error;
pub mod rate_limit;
pub mod records;
pub mod retry;
pub mod score;
pub mod traits;
pub mod types;

pub use error::*;
pub use rate_limit::*;
pub use records::*;
pub use retry::*;
pub use score::*;
pub use traits::*;
pub use types::*;
