use crate::constants::{
    DEFAULT_ADMIN_SECRET, DEFAULT_EMPTY_DATASET_MARKER, DEFAULT_ENDPOINT, DEFAULT_POLICY_NOTICE,
    KST_OFFSET_MINUTES,
};
use crate::weekdays::WeekdaySet;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub registration: RegistrationConfig,
    pub policy: PolicyConfig,
    pub admin: AdminConfig,
    pub sessions: SessionConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    pub level: String,
    /// Extra filter directives, e.g. `vreg_registration=debug`.
    pub filter: Option<String>,
    pub console: bool,
    /// Directory for rolling log files; no file output when unset.
    pub path: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
}

/// Remote registration endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub endpoint: String,
    /// Per-call timeout; `0` waits indefinitely.
    pub timeout_seconds: u64,
    /// Error text that means "the sheet is still empty".
    pub empty_dataset_marker: String,
}

/// Operating-window policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Civil time zone of all schedule decisions, minutes east of UTC.
    pub utc_offset_minutes: i32,
    pub windows: Vec<TimeWindow>,
    /// Days on which registration is open around the clock.
    pub open_weekdays: WeekdaySet,
    pub notice: String,
    /// Free parking hours granted with a registration, announced in the confirmation.
    pub free_hours: Option<u32>,
}

/// Daily interval, both ends inclusive, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

/// Administrator override.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub secret: String,
}

/// In-memory session store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub capacity: u64,
    pub idle_seconds: u64,
}

impl TimeWindow {
    /// Builds a window from `(hour, minute)` pairs; `None` for out-of-range values.
    #[must_use]
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0)?,
            end: NaiveTime::from_hms_opt(end.0, end.1, 0)?,
        })
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ~ {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// `"HH:MM"` strings for [`NaiveTime`].
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT)
            .map_err(|e| serde::de::Error::custom(format!("Invalid time '{raw}': {e}")))
    }
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 8501, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            filter: None,
            console: true,
            path: None,
            json: false,
            max_files: 10,
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_seconds: 10,
            empty_dataset_marker: DEFAULT_EMPTY_DATASET_MARKER.to_owned(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let windows = [((9, 0), (13, 0)), ((14, 30), (17, 0))]
            .into_iter()
            .filter_map(|(start, end)| TimeWindow::from_hm(start, end))
            .collect();

        Self {
            utc_offset_minutes: KST_OFFSET_MINUTES,
            windows,
            open_weekdays: WeekdaySet::THU | WeekdaySet::SAT,
            notice: DEFAULT_POLICY_NOTICE.to_owned(),
            free_hours: None,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { secret: DEFAULT_ADMIN_SECRET.to_owned() }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { capacity: 10_000, idle_seconds: 3600 }
    }
}
