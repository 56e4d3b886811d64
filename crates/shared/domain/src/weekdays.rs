use bitflags::bitflags;
use chrono::Weekday;
use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// A set of days of the week.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WeekdaySet: u8 {
        const MON = 1 << 0;
        const TUE = 1 << 1;
        const WED = 1 << 2;
        const THU = 1 << 3;
        const FRI = 1 << 4;
        const SAT = 1 << 5;
        const SUN = 1 << 6;
    }
}

impl WeekdaySet {
    #[must_use]
    pub const fn contains_day(self, day: Weekday) -> bool {
        self.contains(Self::from_day(day))
    }

    #[must_use]
    pub const fn from_day(day: Weekday) -> Self {
        match day {
            Weekday::Mon => Self::MON,
            Weekday::Tue => Self::TUE,
            Weekday::Wed => Self::WED,
            Weekday::Thu => Self::THU,
            Weekday::Fri => Self::FRI,
            Weekday::Sat => Self::SAT,
            Weekday::Sun => Self::SUN,
        }
    }

    /// Days in the set, Monday first.
    pub fn days(self) -> impl Iterator<Item = Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(move |day| self.contains_day(*day))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, day| set | Self::from_day(day))
    }
}

/// Serialized as a list of short day names: `["thu", "sat"]`.
impl Serialize for WeekdaySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let days: Vec<Weekday> = self.days().collect();
        let mut seq = serializer.serialize_seq(Some(days.len()))?;
        for day in days {
            seq.serialize_element(&day.to_string().to_lowercase())?;
        }
        seq.end()
    }
}

/// Accepts short or long English day names in any case (`"Thu"`, `"thursday"`).
impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        names
            .iter()
            .map(|name| {
                name.trim()
                    .parse::<Weekday>()
                    .map_err(|_| D::Error::custom(format!("Unknown weekday '{name}'")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thursday_and_saturday() {
        let set: WeekdaySet = [Weekday::Thu, Weekday::Sat].into_iter().collect();
        assert!(set.contains_day(Weekday::Thu));
        assert!(set.contains_day(Weekday::Sat));
        assert!(!set.contains_day(Weekday::Fri));
        assert_eq!(set, WeekdaySet::THU | WeekdaySet::SAT);
    }

    #[test]
    fn serde_uses_day_names() {
        let set = WeekdaySet::THU | WeekdaySet::SAT;
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["thu","sat"]"#);

        let parsed: WeekdaySet = serde_json::from_str(r#"["Thursday", "SAT"]"#).unwrap();
        assert_eq!(parsed, set);

        assert!(serde_json::from_str::<WeekdaySet>(r#"["someday"]"#).is_err());
    }
}
