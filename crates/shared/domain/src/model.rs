use crate::constants::TIMESTAMP_FORMAT;
use chrono::{DateTime, FixedOffset};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// One registration as sent to the remote endpoint.
///
/// Built only from an already normalized plate; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    name: String,
    car_number: String,
    timestamp: DateTime<FixedOffset>,
}

impl RegistrationRequest {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        car_number: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self { name: name.into(), car_number: car_number.into(), timestamp }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn car_number(&self) -> &str {
        &self.car_number
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Civil timestamp as the endpoint stores it, e.g. `2024-05-02 10:15:00.123456`.
    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Wire body: `{"name": .., "carNumber": .., "timestamp": ..}`.
impl Serialize for RegistrationRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut body = serializer.serialize_struct("RegistrationRequest", 3)?;
        body.serialize_field("name", &self.name)?;
        body.serialize_field("carNumber", &self.car_number)?;
        body.serialize_field("timestamp", &self.formatted_timestamp())?;
        body.end()
    }
}

/// Outcome of a single plate validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    /// Input with all whitespace removed.
    pub normalized_plate: String,
    /// Empty when valid.
    pub message: String,
}

impl ValidationResult {
    #[must_use]
    pub fn valid(normalized_plate: String) -> Self {
        Self { valid: true, normalized_plate, message: String::new() }
    }

    #[must_use]
    pub fn invalid(normalized_plate: String, message: impl Into<String>) -> Self {
        Self { valid: false, normalized_plate, message: message.into() }
    }
}

/// Per-session submission lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Processing,
    /// Terminal for the session.
    Submitted,
}

impl SubmissionState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn request_serializes_to_wire_shape() {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let at = kst.with_ymd_and_hms(2024, 5, 2, 10, 15, 0).unwrap();
        let request = RegistrationRequest::new("홍길동", "12가3456", at);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["name"], "홍길동");
        assert_eq!(json["carNumber"], "12가3456");
        assert_eq!(json["timestamp"], "2024-05-02 10:15:00.000000");
    }

    #[test]
    fn new_session_state_is_idle() {
        assert_eq!(SubmissionState::default(), SubmissionState::Idle);
        assert!(SubmissionState::Submitted.is_terminal());
        assert_eq!(serde_json::to_string(&SubmissionState::Processing).unwrap(), r#""processing""#);
    }
}
