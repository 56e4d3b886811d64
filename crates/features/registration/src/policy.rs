//! Operating windows: when the form may be used.

use crate::error::RegistrationError;
use crate::messages;
use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, TimeZone, Timelike};
use vreg_domain::config::{PolicyConfig, TimeWindow};
use vreg_domain::weekdays::WeekdaySet;

/// Decides whether registration is open at a given instant.
///
/// All decisions use the configured civil offset (KST by default). Window bounds are
/// inclusive at minute resolution, so `13:00:59` still counts as `13:00`.
#[derive(Debug, Clone)]
pub struct OperatingWindowPolicy {
    offset: FixedOffset,
    windows: Vec<TimeWindow>,
    open_weekdays: WeekdaySet,
    notice: String,
    free_hours: Option<u32>,
}

/// What the form shows instead of its fields while closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedNotice {
    /// `HH:MM ~ HH:MM` per window.
    pub windows: Vec<String>,
    pub notice: String,
}

impl OperatingWindowPolicy {
    /// # Errors
    /// Returns [`RegistrationError::Internal`] for an offset outside ±24h or a window whose
    /// start is after its end.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, RegistrationError> {
        let offset = config
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| RegistrationError::Internal {
                message: format!("Invalid UTC offset: {} minutes", config.utc_offset_minutes)
                    .into(),
                context: Some("policy.utc_offset_minutes".into()),
            })?;

        if let Some(window) = config.windows.iter().find(|w| w.start > w.end) {
            return Err(RegistrationError::Internal {
                message: format!("Window starts after it ends: {window}").into(),
                context: Some("policy.windows".into()),
            });
        }

        Ok(Self {
            offset,
            windows: config.windows.clone(),
            open_weekdays: config.open_weekdays,
            notice: config.notice.clone(),
            free_hours: config.free_hours,
        })
    }

    /// `now` converted to the policy's civil time.
    #[must_use]
    pub fn local<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset)
    }

    /// Whether the form is open at `now`, ignoring any admin override.
    #[must_use]
    pub fn is_open<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let local = self.local(now);
        if self.open_weekdays.contains_day(local.weekday()) {
            return true;
        }

        let Some(minute) = NaiveTime::from_hms_opt(local.hour(), local.minute(), 0) else {
            return false;
        };
        self.windows.iter().any(|w| w.start <= minute && minute <= w.end)
    }

    #[must_use]
    pub fn closed_notice(&self) -> ClosedNotice {
        ClosedNotice {
            windows: self.windows.iter().map(ToString::to_string).collect(),
            notice: self.notice.clone(),
        }
    }

    /// Full-page text for the closed form.
    #[must_use]
    pub fn closed_message(&self) -> String {
        let notice = self.closed_notice();
        let mut text = format!("{}\n{}:", messages::CLOSED, messages::OPEN_HOURS);
        for window in &notice.windows {
            text.push_str("\n- ");
            text.push_str(window);
        }
        text.push('\n');
        text.push_str(&notice.notice);
        text
    }

    /// Success message, with the free parking grant when one is configured.
    #[must_use]
    pub fn confirmation(&self) -> String {
        match self.free_hours {
            Some(hours) if hours > 0 => format!("{} {}", messages::SAVED, messages::free_hours(hours)),
            _ => messages::SAVED.to_owned(),
        }
    }
}
