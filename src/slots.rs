use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// First hour of the lunch break.
pub const LUNCH_START: u8 = 12;
/// Hour the lunch break ends.
pub const LUNCH_END: u8 = 13;

/// Length of one schedule block, in hours.
pub const BLOCK_HOURS: u8 = 2;

/// Start hours of the four daily periods.
pub const PERIOD_STARTS: [u8; 4] = [7, 9, 11, 13];

/// Teaching days of the week, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Lunes,
    Martes,
    Miercoles,
    Jueves,
    Viernes,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Lunes,
        Day::Martes,
        Day::Miercoles,
        Day::Jueves,
        Day::Viernes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Day::Lunes => "Lunes",
            Day::Martes => "Martes",
            Day::Miercoles => "Miércoles",
            Day::Jueves => "Jueves",
            Day::Viernes => "Viernes",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|day| day.name() == s)
            .ok_or_else(|| SlotParseError::UnknownDay(s.to_string()))
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Why a slot identifier was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotParseError {
    #[error("expected '<Day> <start>-<end>', got '{0}'")]
    Malformed(String),
    #[error("unknown day '{0}'")]
    UnknownDay(String),
    #[error("invalid hour '{0}'")]
    InvalidHour(String),
    #[error("{start}-{end} is not one of the catalog periods")]
    NotInCatalog { start: u8, end: u8 },
}

/// One two-hour period on one day, drawn from the fixed weekly catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    day: Day,
    start: u8,
}

impl TimeSlot {
    /// Builds a slot, rejecting periods outside the catalog.
    pub fn new(day: Day, start: u8, end: u8) -> Result<Self, SlotParseError> {
        if !PERIOD_STARTS.contains(&start) || end != start + BLOCK_HOURS {
            return Err(SlotParseError::NotInCatalog { start, end });
        }
        Ok(Self { day, start })
    }

    pub fn day(self) -> Day {
        self.day
    }

    pub fn start(self) -> u8 {
        self.start
    }

    pub fn end(self) -> u8 {
        self.start + BLOCK_HOURS
    }

    /// True if the period overlaps the 12-13 lunch hour.
    pub fn is_lunch(self) -> bool {
        self.start < LUNCH_END && self.end() > LUNCH_START
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day, self.start, self.end())
    }
}

impl FromStr for TimeSlot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SlotParseError::Malformed(s.to_string());
        let (day, hours) = s.trim().split_once(' ').ok_or_else(malformed)?;
        let (start, end) = hours.trim().split_once('-').ok_or_else(malformed)?;
        let hour = |h: &str| {
            h.trim()
                .parse::<u8>()
                .map_err(|_| SlotParseError::InvalidHour(h.to_string()))
        };
        TimeSlot::new(day.parse()?, hour(start)?, hour(end)?)
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// All 20 slots of the week, day by day in period order.
pub fn catalog() -> impl Iterator<Item = TimeSlot> {
    Day::ALL
        .into_iter()
        .flat_map(|day| PERIOD_STARTS.into_iter().map(move |start| TimeSlot { day, start }))
}

/// Catalog entry as exposed to clients picking availability.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub slot: TimeSlot,
    pub day: Day,
    pub start: u8,
    pub end: u8,
    pub lunch: bool,
}

impl From<TimeSlot> for CatalogEntry {
    fn from(slot: TimeSlot) -> Self {
        Self {
            slot,
            day: slot.day(),
            start: slot.start(),
            end: slot.end(),
            lunch: slot.is_lunch(),
        }
    }
}
