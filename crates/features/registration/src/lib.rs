//! Registration feature slice.
//!
//! A form session collects a driver's name and plate number and forwards them to the remote
//! spreadsheet endpoint:
//!
//! - [`PlateValidator`] normalizes and checks Korean plate numbers.
//! - [`OperatingWindowPolicy`] decides when the form is open.
//! - [`RegistrationClient`] is the remote duplicate-check and submit contract;
//!   [`HttpRegistrationClient`] implements it over `reqwest`.
//! - [`SubmissionController`] runs the `Idle -> Processing -> Submitted` state machine of one
//!   session and owns its [`AdminGate`].
//! - [`SessionStore`] keeps live sessions in memory with idle expiry.
//!
//! With the `server` feature, [`api`] exposes the form as JSON endpoints.

mod admin;
mod client;
mod clock;
mod controller;
mod error;
pub mod messages;
mod plate;
mod policy;
mod session;

#[cfg(feature = "server")]
pub mod api;

pub use crate::admin::{AdminGate, AdminToggle};
pub use crate::client::{DuplicateCheck, HttpRegistrationClient, RegistrationClient, SubmitReceipt};
pub use crate::clock::{Clock, SystemClock};
pub use crate::controller::{SubmissionController, SubmitOutcome};
pub use crate::error::{RegistrationError, RegistrationErrorExt};
pub use crate::plate::{PlateValidator, normalize};
pub use crate::policy::{ClosedNotice, OperatingWindowPolicy};
pub use crate::session::SessionStore;

use std::sync::Arc;
use vreg_kernel::domain::config::AppConfig;
use vreg_kernel::domain::registry::InitializedSlice;

/// A live form session backed by the real endpoint.
pub type Session = SubmissionController<HttpRegistrationClient, SystemClock>;

/// Registration feature state.
#[vreg_derive::vreg_slice]
pub struct Registration {
    pub sessions: SessionStore<HttpRegistrationClient, SystemClock>,
}

/// Builds the registration slice from the loaded configuration.
///
/// # Errors
/// Returns [`RegistrationError::Internal`] for an invalid policy section and
/// [`RegistrationError::Transport`] if the HTTP client cannot be created.
pub fn init(config: &AppConfig) -> Result<InitializedSlice, RegistrationError> {
    let policy = OperatingWindowPolicy::from_config(&config.policy)?;
    let client = HttpRegistrationClient::new(&config.registration)?;

    tracing::info!(
        endpoint = client.endpoint(),
        windows = config.policy.windows.len(),
        timeout_seconds = config.registration.timeout_seconds,
        "Registration slice initialized"
    );

    let sessions = SessionStore::new(
        &config.sessions,
        Arc::new(client),
        Arc::new(policy),
        SystemClock,
        Arc::from(config.admin.secret.as_str()),
    );

    Ok(InitializedSlice::new(Registration::new(RegistrationInner { sessions })))
}
