use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Days of the week an activity takes place on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Weekdays: u8 {
        const MONDAY = 1 << 0;
        const TUESDAY = 1 << 1;
        const WEDNESDAY = 1 << 2;
        const THURSDAY = 1 << 3;
        const FRIDAY = 1 << 4;
        const SATURDAY = 1 << 5;
        const SUNDAY = 1 << 6;

        const SCHOOL_DAYS = Self::MONDAY.bits()
            | Self::TUESDAY.bits()
            | Self::WEDNESDAY.bits()
            | Self::THURSDAY.bits()
            | Self::FRIDAY.bits();
        const ALL = Self::SCHOOL_DAYS.bits() | Self::SATURDAY.bits() | Self::SUNDAY.bits();
    }
}

impl Weekdays {
    /// Single-day flag for a weekday index counted from Monday (`0`) to Sunday (`6`).
    #[must_use]
    pub fn from_monday_index(index: u32) -> Self {
        match index {
            0..=6 => Self::from_bits_truncate(1 << index),
            _ => Self::empty(),
        }
    }

    /// Whether the given weekday (Monday = `0`) is part of the set.
    #[must_use]
    pub fn includes_day(self, monday_index: u32) -> bool {
        let day = Self::from_monday_index(monday_index);
        !day.is_empty() && self.contains(day)
    }
}

impl From<&str> for Weekdays {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" | "mo" => Self::MONDAY,
            "tue" | "tuesday" | "di" => Self::TUESDAY,
            "wed" | "wednesday" | "mi" => Self::WEDNESDAY,
            "thu" | "thursday" | "do" => Self::THURSDAY,
            "fri" | "friday" | "fr" => Self::FRIDAY,
            "sat" | "saturday" | "sa" => Self::SATURDAY,
            "sun" | "sunday" | "so" => Self::SUNDAY,
            "school" | "weekdays" => Self::SCHOOL_DAYS,
            "all" | "*" => Self::ALL,
            _ => Self::empty(),
        }
    }
}

impl From<u8> for Weekdays {
    fn from(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl Default for Weekdays {
    fn default() -> Self {
        Self::SCHOOL_DAYS
    }
}

impl Serialize for Weekdays {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for Weekdays {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
