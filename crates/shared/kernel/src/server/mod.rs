//! HTTP plumbing shared by every slice.

mod error;
mod extract;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ErrorBody};
pub use extract::{ApiJson, ApiQuery};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
