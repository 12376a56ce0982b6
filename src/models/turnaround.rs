//! Turnaround levels for transcription and audio description orders.

use std::cmp::Ordering;
use std::fmt;

/// Behaviour shared by [`Turnaround`] and [`TurnaroundAd`].
pub trait TurnaroundLevel: Copy + Sized + 'static {
    /// Every level, in declaration order.
    fn all() -> &'static [Self];

    /// Upper-case identifier, e.g. `TWO_HOUR`.
    fn key(self) -> &'static str;

    /// The `turnaround_level_id` sent to the API.
    fn id(self) -> u32;

    /// Promised delivery time in hours.
    fn hours(self) -> u32;

    /// Price increment per minute relative to the standard level.
    fn price_rate(self) -> f64;

    /// Human-readable name, e.g. `Two Hour`.
    fn title(self) -> String {
        title_case(self.key())
    }

    /// Parses a name such as `"Two hour"` or `"SAME_DAY"`.
    fn from_name(name: &str) -> Option<Self> {
        let key = name.trim().to_uppercase().replace(' ', "_");
        Self::all().iter().copied().find(|level| level.key() == key)
    }

    fn sort_by_hours(reverse: bool) -> Vec<Self> {
        let mut levels = Self::all().to_vec();
        levels.sort_by_key(|level| level.hours());
        if reverse {
            levels.reverse();
        }
        levels
    }

    fn sort_by_price(reverse: bool) -> Vec<Self> {
        let mut levels = Self::all().to_vec();
        levels.sort_by(|a, b| {
            a.price_rate()
                .partial_cmp(&b.price_rate())
                .unwrap_or(Ordering::Equal)
        });
        if reverse {
            levels.reverse();
        }
        levels
    }
}

/// Turnaround levels and IDs used in the 3Play API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Turnaround {
    #[default]
    Standard,
    SameDay,
    Rush,
    Expedited,
    Extended,
    TwoHour,
}

impl TurnaroundLevel for Turnaround {
    fn all() -> &'static [Self] {
        &[
            Turnaround::Standard,
            Turnaround::SameDay,
            Turnaround::Rush,
            Turnaround::Expedited,
            Turnaround::Extended,
            Turnaround::TwoHour,
        ]
    }

    fn key(self) -> &'static str {
        match self {
            Turnaround::Standard => "STANDARD",
            Turnaround::SameDay => "SAME_DAY",
            Turnaround::Rush => "RUSH",
            Turnaround::Expedited => "EXPEDITED",
            Turnaround::Extended => "EXTENDED",
            Turnaround::TwoHour => "TWO_HOUR",
        }
    }

    fn id(self) -> u32 {
        match self {
            Turnaround::Standard => 1,
            Turnaround::SameDay => 2,
            Turnaround::Rush => 3,
            Turnaround::Expedited => 4,
            Turnaround::Extended => 5,
            Turnaround::TwoHour => 6,
        }
    }

    fn hours(self) -> u32 {
        match self {
            Turnaround::Standard => 96,
            Turnaround::SameDay => 8,
            Turnaround::Rush => 24,
            Turnaround::Expedited => 48,
            Turnaround::Extended => 240,
            Turnaround::TwoHour => 2,
        }
    }

    fn price_rate(self) -> f64 {
        match self {
            Turnaround::Standard => 0.00,
            Turnaround::SameDay => 2.50,
            Turnaround::Rush => 1.50,
            Turnaround::Expedited => 0.75,
            Turnaround::Extended => -0.20,
            Turnaround::TwoHour => 5.50,
        }
    }
}

/// Turnaround levels and IDs for the Audio Description service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TurnaroundAd {
    #[default]
    Standard,
    Expedited,
    Rush,
}

impl TurnaroundLevel for TurnaroundAd {
    fn all() -> &'static [Self] {
        &[
            TurnaroundAd::Standard,
            TurnaroundAd::Expedited,
            TurnaroundAd::Rush,
        ]
    }

    fn key(self) -> &'static str {
        match self {
            TurnaroundAd::Standard => "STANDARD",
            TurnaroundAd::Expedited => "EXPEDITED",
            TurnaroundAd::Rush => "RUSH",
        }
    }

    fn id(self) -> u32 {
        match self {
            TurnaroundAd::Standard => 7,
            TurnaroundAd::Expedited => 8,
            TurnaroundAd::Rush => 9,
        }
    }

    fn hours(self) -> u32 {
        match self {
            TurnaroundAd::Standard => 120,
            TurnaroundAd::Expedited => 48,
            TurnaroundAd::Rush => 24,
        }
    }

    fn price_rate(self) -> f64 {
        match self {
            TurnaroundAd::Standard => 0.00,
            TurnaroundAd::Expedited => 2.00,
            TurnaroundAd::Rush => 4.00,
        }
    }
}

impl fmt::Display for Turnaround {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_level(f, "Turnaround", *self)
    }
}

impl fmt::Display for TurnaroundAd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_level(f, "TurnaroundAD", *self)
    }
}

fn write_level<T: TurnaroundLevel>(f: &mut fmt::Formatter<'_>, kind: &str, level: T) -> fmt::Result {
    write!(
        f,
        "<{kind}.{}: id={}, hours={}, price={:.2}>",
        level.key(),
        level.id(),
        level.hours(),
        level.price_rate()
    )
}

/// `"SAME_DAY"` / `"in_progress"` → `"Same Day"` / `"In Progress"`.
pub(crate) fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
