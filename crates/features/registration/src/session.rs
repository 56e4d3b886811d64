use crate::client::RegistrationClient;
use crate::clock::Clock;
use crate::controller::SubmissionController;
use crate::error::RegistrationError;
use crate::messages;
use crate::policy::OperatingWindowPolicy;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use vreg_domain::config::SessionConfig;

/// Bounded, idle-expiring map of form sessions.
///
/// A new session always starts `Idle` with admin mode off; there is no way to revive an
/// expired one. At capacity the least recently used session is evicted, never the new one.
pub struct SessionStore<C, K> {
    sessions: Cache<String, Arc<SubmissionController<C, K>>>,
    client: Arc<C>,
    policy: Arc<OperatingWindowPolicy>,
    clock: K,
    admin_secret: Arc<str>,
}

impl<C: RegistrationClient, K: Clock> fmt::Debug for SessionStore<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.entry_count())
            .finish_non_exhaustive()
    }
}

impl<C: RegistrationClient, K: Clock + Clone> SessionStore<C, K> {
    #[must_use]
    pub fn new(
        config: &SessionConfig,
        client: Arc<C>,
        policy: Arc<OperatingWindowPolicy>,
        clock: K,
        admin_secret: Arc<str>,
    ) -> Self {
        let sessions = Cache::builder()
            .max_capacity(config.capacity)
            .eviction_policy(EvictionPolicy::lru())
            .time_to_idle(Duration::from_secs(config.idle_seconds.max(1)))
            .build();

        Self { sessions, client, policy, clock, admin_secret }
    }

    /// Starts a fresh session.
    pub fn create(&self) -> (String, Arc<SubmissionController<C, K>>) {
        let id = vreg_kernel::session_id();
        let controller = Arc::new(SubmissionController::new(
            Arc::clone(&self.client),
            Arc::clone(&self.policy),
            self.clock.clone(),
            Arc::clone(&self.admin_secret),
        ));
        self.sessions.insert(id.clone(), Arc::clone(&controller));
        debug!(session = %id, "Session created");
        (id, controller)
    }

    /// # Errors
    /// Returns [`RegistrationError::SessionNotFound`] for unknown or expired ids.
    pub fn get(&self, id: &str) -> Result<Arc<SubmissionController<C, K>>, RegistrationError> {
        self.sessions.get(id).ok_or_else(|| RegistrationError::SessionNotFound {
            message: messages::SESSION_EXPIRED.into(),
            context: Some(id.to_owned().into()),
        })
    }

    #[must_use]
    pub fn policy(&self) -> &OperatingWindowPolicy {
        &self.policy
    }
}
