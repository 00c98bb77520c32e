pub mod amortization;
pub mod error;
pub mod rates;
pub mod types;

pub use error::SacjdError;
pub use types::*;

/// Standard result type for all sacjd operations
pub type SacjdResult<T> = Result<T, SacjdError>;
