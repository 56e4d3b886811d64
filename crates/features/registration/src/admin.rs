use crate::error::RegistrationError;
use crate::messages;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Result of [`AdminGate::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminToggle {
    /// Override switched on; the caller should re-render.
    Activated,
    Deactivated,
    /// Empty password while inactive.
    Unchanged,
}

impl AdminToggle {
    #[must_use]
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::Activated => Some(messages::ADMIN_ON),
            Self::Deactivated => Some(messages::ADMIN_OFF),
            Self::Unchanged => None,
        }
    }
}

/// Session-scoped admin override, unlocked by a shared static secret.
///
/// The override never expires on its own and the secret is a plain shared value. Both are
/// known weaknesses kept as-is; deployments should at least override `admin.secret`.
#[derive(Debug)]
pub struct AdminGate {
    secret: Arc<str>,
    active: AtomicBool,
}

impl AdminGate {
    #[must_use]
    pub fn new(secret: Arc<str>) -> Self {
        Self { secret, active: AtomicBool::new(false) }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Flips the override.
    ///
    /// Leaving admin mode needs no password.
    ///
    /// # Errors
    /// Returns [`RegistrationError::Auth`] when inactive and a non-empty wrong password is given.
    pub fn toggle(&self, entered: &str) -> Result<AdminToggle, RegistrationError> {
        if self.active.swap(false, Ordering::AcqRel) {
            info!("Admin override disabled");
            return Ok(AdminToggle::Deactivated);
        }

        if entered.is_empty() {
            return Ok(AdminToggle::Unchanged);
        }

        if entered != &*self.secret {
            warn!("Admin password rejected");
            return Err(RegistrationError::Auth {
                message: messages::ADMIN_WRONG_PASSWORD.into(),
                context: None,
            });
        }

        self.active.store(true, Ordering::Release);
        info!("Admin override enabled");
        Ok(AdminToggle::Activated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AdminGate {
        AdminGate::new(Arc::from("admin1234"))
    }

    #[test]
    fn correct_secret_activates() {
        let gate = gate();
        assert_eq!(gate.toggle("admin1234").unwrap(), AdminToggle::Activated);
        assert!(gate.is_active());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let gate = gate();
        let err = gate.toggle("guess").unwrap_err();
        assert_eq!(err.kind(), "auth");
        assert!(!gate.is_active());
    }

    #[test]
    fn empty_input_does_nothing() {
        let gate = gate();
        assert_eq!(gate.toggle("").unwrap(), AdminToggle::Unchanged);
        assert!(!gate.is_active());
    }

    #[test]
    fn deactivation_needs_no_password() {
        let gate = gate();
        gate.toggle("admin1234").unwrap();
        assert_eq!(gate.toggle("").unwrap(), AdminToggle::Deactivated);
        assert!(!gate.is_active());

        gate.toggle("admin1234").unwrap();
        assert_eq!(gate.toggle("wrong").unwrap(), AdminToggle::Deactivated);
    }
}
