//! Facade crate for the vehicle registration desk.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `vreg` with the `server` feature.
//! - Call `vreg::init` to build every feature slice from the loaded [`AppConfig`].

pub use vreg_domain as domain;
use vreg_domain::config::AppConfig;
use vreg_domain::registry::InitializedSlice;
pub use vreg_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use vreg_kernel::server::system_router;
        pub use vreg_registration::api::router as registration_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use vreg_registration as registration;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        "registration",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all feature slices.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(config: &AppConfig) -> Result<Vec<InitializedSlice>, Box<dyn std::error::Error>> {
    let mut slices = Vec::new();

    // Registration form: sessions, policy and the remote client
    slices.push(features::registration::init(config)?);

    Ok(slices)
}
