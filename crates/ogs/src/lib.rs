//! Facade crate for the OGS features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`init`] to build every feature slice on top of one database handle.
//! - Mount [`server::router::api_router`] to expose the system and feature routes.

use ogs_database::Database;
pub use ogs_domain as domain;
use ogs_domain::config::ApiConfig;
use ogs_domain::registry::InitializedSlice;
pub use ogs_kernel as kernel;
use tracing::info;

pub mod server {
    pub mod router {
        use crate::features;
        use ogs_kernel::server::ApiState;
        pub use ogs_kernel::server::router::system_router;
        use utoipa_axum::router::OpenApiRouter;

        /// System routes plus the routes of every feature slice.
        pub fn api_router() -> OpenApiRouter<ApiState> {
            system_router()
                .merge(features::facilities::router())
                .merge(features::users::router())
                .merge(features::activities::router())
                .merge(features::groups::router())
                .merge(features::active::router())
                .merge(features::feedback::router())
                .merge(features::schulhof::router())
        }
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use ogs_active as active;
    pub use ogs_activities as activities;
    pub use ogs_facilities as facilities;
    pub use ogs_feedback as feedback;
    pub use ogs_groups as groups;
    pub use ogs_schulhof as schulhof;
    pub use ogs_users as users;

    /// Slices in initialization order.
    pub const ENABLED: &[&str] =
        &["facilities", "users", "activities", "groups", "active", "feedback", "schulhof"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all feature slices.
///
/// Slices are built in dependency order, so each one receives the services of the
/// slices it composes.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
    database: &Database,
) -> Result<Vec<InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let facilities = features::facilities::init(database)?;
    let users = features::users::init(database)?;
    let activities = features::activities::init(database, &facilities)?;
    let groups = features::groups::init(database, &facilities, &users)?;
    let active = features::active::init(database, &facilities, &activities, &users)?;
    let feedback = features::feedback::init(database, &users)?;
    let schulhof =
        features::schulhof::init(&config.schulhof, &facilities, &activities, &active, &users)?;

    info!(slices = features::ENABLED.len(), "Feature slices initialized");

    Ok(vec![
        InitializedSlice::new(facilities),
        InitializedSlice::new(users),
        InitializedSlice::new(activities),
        InitializedSlice::new(groups),
        InitializedSlice::new(active),
        InitializedSlice::new(feedback),
        InitializedSlice::new(schulhof),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_enabled_slice_is_initialized() {
        let database = Database::builder()
            .url("mem://")
            .session("test", "facade")
            .init()
            .await
            .expect("connect to mem://");

        let slices = init(&ApiConfig::default(), &database).expect("init slices");
        assert_eq!(slices.len(), features::ENABLED.len());
        assert!(slices.iter().any(|s| s.downcast::<features::schulhof::Schulhof>().is_some()));
        assert!(features::is_enabled("feedback"));
        assert!(!features::is_enabled("billing"));
    }
}
