//! Everything a feature slice usually needs in one import.

pub use crate::ensure::{ENSURE_ATTEMPTS, Ensured, backoff, find_or_create};
pub use crate::safe_nanoid;
pub use crate::security::resource::ResourceGuard;
pub use crate::server::{ApiError, ApiJson, ApiQuery, ApiState, ErrorBody};
pub use crate::time::{now_millis, today};
pub use ogs_domain::constants::*;
pub use ogs_domain::registry::{FeatureSlice, InitializedSlice};
