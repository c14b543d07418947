//! Age-derived program flags.
//!
//! `is_child` and `is_elderly` are never taken from user input: they are
//! recomputed from the birth date whenever a patient payload is built.
//! Every function here is total. A birth date that is empty, malformed or in
//! the future yields `false` for both flags.

use chrono::{Datelike, NaiveDate, Utc};
use tracing::debug;

/// Two years of 365.25 days, in days.
const CHILD_LIMIT_DAYS: f64 = 2.0 * 365.25;

const ELDERLY_MIN_AGE: u32 = 60;

/// The two flags this module owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgeFlags {
    pub is_child: bool,
    pub is_elderly: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    Infant,
    Child,
    Adolescent,
    Adult,
    Elderly,
}

impl AgeBand {
    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Infant => "0-1",
            AgeBand::Child => "2-9",
            AgeBand::Adolescent => "10-19",
            AgeBand::Adult => "20-59",
            AgeBand::Elderly => "60+",
        }
    }
}

/// Parse the calendar part of a birth date.
///
/// Accepts `YYYY-MM-DD` and ISO timestamps whose time part is ignored, so a
/// value like `1990-05-01T23:30:00-03:00` still means May 1st.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10)?;
    if trimmed.len() > 10 && !trimmed[10..].starts_with(['T', ' ']) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub struct EligibilityCalculator {
    today: NaiveDate,
}

impl EligibilityCalculator {
    /// Calculator anchored at an explicit reference date.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Calculator anchored at the current UTC date.
    pub fn today_utc() -> Self {
        Self::new(Utc::now().date_naive())
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn flags(&self, birth_date: &str) -> AgeFlags {
        let Some(birth) = self.valid_birth(birth_date) else {
            debug!("Birth date {:?} unusable, flags default to false", birth_date);
            return AgeFlags::default();
        };

        AgeFlags {
            is_child: self.is_child_on(birth),
            is_elderly: self.whole_years(birth) >= ELDERLY_MIN_AGE,
        }
    }

    pub fn is_child(&self, birth_date: &str) -> bool {
        self.flags(birth_date).is_child
    }

    pub fn is_elderly(&self, birth_date: &str) -> bool {
        self.flags(birth_date).is_elderly
    }

    /// Whole calendar years, or `None` for an unusable date.
    pub fn age_years(&self, birth_date: &str) -> Option<u32> {
        self.valid_birth(birth_date).map(|birth| self.whole_years(birth))
    }

    pub fn age_band(&self, birth_date: &str) -> Option<AgeBand> {
        let age = self.age_years(birth_date)?;
        Some(match age {
            0..=1 => AgeBand::Infant,
            2..=9 => AgeBand::Child,
            10..=19 => AgeBand::Adolescent,
            20..=59 => AgeBand::Adult,
            _ => AgeBand::Elderly,
        })
    }

    fn valid_birth(&self, birth_date: &str) -> Option<NaiveDate> {
        parse_birth_date(birth_date).filter(|birth| *birth <= self.today)
    }

    // Fixed-ratio year, not calendar-aware.
    fn is_child_on(&self, birth: NaiveDate) -> bool {
        let elapsed_days = (self.today - birth).num_days() as f64;
        elapsed_days < CHILD_LIMIT_DAYS
    }

    fn whole_years(&self, birth: NaiveDate) -> u32 {
        let mut age = self.today.year() - birth.year();
        if (self.today.month(), self.today.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }
}
