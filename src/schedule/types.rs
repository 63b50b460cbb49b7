//! Shared schedule vocabulary: day types, interpolation modes, and the
//! structured form of parsed compact schedules.

use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use super::clock::TimeOfDay;

/// Canonical day-type label from the compact-schedule vocabulary.
///
/// A concrete date satisfies several labels at once — a holiday Tuesday
/// satisfies `Tuesday`, `Weekdays`, `Holiday`, `AllDays`, and
/// `AllOtherDays` — so rule selection works on a [`DayTypeSet`] of all
/// applicable labels, resolved against [`PRIORITY_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DayTypeLabel {
    /// Sunday.
    Sunday = 0,
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Monday through Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekends,
    /// Every day of the week.
    AllDays,
    /// A date listed as a holiday.
    Holiday,
    /// The synthetic summer sizing day.
    SummerDesignDay,
    /// The synthetic winter sizing day.
    WinterDesignDay,
    /// First user-defined special day class.
    CustomDay1,
    /// Second user-defined special day class.
    CustomDay2,
    /// Fallback label matching any day not claimed by a more specific rule.
    AllOtherDays,
}

/// Rule-selection priority, most specific label first.
///
/// For a given date the evaluator walks this order and, at the first label
/// the date satisfies, picks the first declared rule naming that label.
/// Declaration order only breaks ties within a level.
pub const PRIORITY_ORDER: [DayTypeLabel; 16] = [
    DayTypeLabel::SummerDesignDay,
    DayTypeLabel::WinterDesignDay,
    DayTypeLabel::CustomDay2,
    DayTypeLabel::CustomDay1,
    DayTypeLabel::Holiday,
    DayTypeLabel::Sunday,
    DayTypeLabel::Monday,
    DayTypeLabel::Tuesday,
    DayTypeLabel::Wednesday,
    DayTypeLabel::Thursday,
    DayTypeLabel::Friday,
    DayTypeLabel::Saturday,
    DayTypeLabel::Weekdays,
    DayTypeLabel::Weekends,
    DayTypeLabel::AllDays,
    DayTypeLabel::AllOtherDays,
];

impl DayTypeLabel {
    /// Maps a `For:` token to its canonical label, ignoring case.
    ///
    /// Accepts the `Holidays` spelling as an alias for `Holiday`. Returns
    /// `None` for unrecognized tokens; callers drop those silently for
    /// compatibility with existing model corpora.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        let label = match token.as_str() {
            "sunday" => Self::Sunday,
            "monday" => Self::Monday,
            "tuesday" => Self::Tuesday,
            "wednesday" => Self::Wednesday,
            "thursday" => Self::Thursday,
            "friday" => Self::Friday,
            "saturday" => Self::Saturday,
            "weekdays" => Self::Weekdays,
            "weekends" => Self::Weekends,
            "alldays" => Self::AllDays,
            "holiday" | "holidays" => Self::Holiday,
            "summerdesignday" => Self::SummerDesignDay,
            "winterdesignday" => Self::WinterDesignDay,
            "customday1" => Self::CustomDay1,
            "customday2" => Self::CustomDay2,
            "allotherdays" => Self::AllOtherDays,
            _ => return None,
        };
        Some(label)
    }

    /// The canonical spelling of this label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Weekdays => "Weekdays",
            Self::Weekends => "Weekends",
            Self::AllDays => "AllDays",
            Self::Holiday => "Holiday",
            Self::SummerDesignDay => "SummerDesignDay",
            Self::WinterDesignDay => "WinterDesignDay",
            Self::CustomDay1 => "CustomDay1",
            Self::CustomDay2 => "CustomDay2",
            Self::AllOtherDays => "AllOtherDays",
        }
    }

    /// The label for a calendar weekday.
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

impl fmt::Display for DayTypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A small set of [`DayTypeLabel`]s backed by a 16-bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayTypeSet(u16);

impl DayTypeSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Adds a label to the set.
    pub fn insert(&mut self, label: DayTypeLabel) {
        self.0 |= 1 << label as u16;
    }

    /// True when the set contains `label`.
    pub fn contains(self, label: DayTypeLabel) -> bool {
        self.0 & (1 << label as u16) != 0
    }

    /// True when no label is present.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<DayTypeLabel> for DayTypeSet {
    fn from_iter<I: IntoIterator<Item = DayTypeLabel>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for label in iter {
            set.insert(label);
        }
        set
    }
}

/// Caller-supplied day-type override, used to force a design-day or
/// special-day schedule regardless of the actual calendar date (sizing
/// runs evaluate schedules this way).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayOverride {
    /// Classify by the actual calendar date.
    #[default]
    Normal,
    /// Force the SummerDesignDay schedule.
    SummerDesignDay,
    /// Force the WinterDesignDay schedule.
    WinterDesignDay,
    /// Force the Holiday schedule.
    Holiday,
    /// Force the CustomDay1 schedule.
    CustomDay1,
    /// Force the CustomDay2 schedule.
    CustomDay2,
}

impl DayOverride {
    /// Parses the configuration spelling (`"normal"`, `"summer"`, ...).
    pub fn from_token(token: &str) -> Option<Self> {
        let value = match token.trim().to_ascii_lowercase().as_str() {
            "normal" => Self::Normal,
            "summer" => Self::SummerDesignDay,
            "winter" => Self::WinterDesignDay,
            "holiday" => Self::Holiday,
            "customday1" => Self::CustomDay1,
            "customday2" => Self::CustomDay2,
            _ => return None,
        };
        Some(value)
    }

    /// The day-type label this override forces, if any.
    pub fn label(self) -> Option<DayTypeLabel> {
        match self {
            Self::Normal => None,
            Self::SummerDesignDay => Some(DayTypeLabel::SummerDesignDay),
            Self::WinterDesignDay => Some(DayTypeLabel::WinterDesignDay),
            Self::Holiday => Some(DayTypeLabel::Holiday),
            Self::CustomDay1 => Some(DayTypeLabel::CustomDay1),
            Self::CustomDay2 => Some(DayTypeLabel::CustomDay2),
        }
    }
}

/// How values between consecutive time samples are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Step function: each value holds until its `Until:` time.
    #[default]
    No,
    /// Linear interpolation between consecutive samples.
    Average,
    /// Alias for [`Interpolation::Average`].
    Linear,
}

impl Interpolation {
    /// Parses the configuration spelling (`"no"`, `"step"`, `"average"`,
    /// `"linear"`).
    pub fn from_token(token: &str) -> Option<Self> {
        let value = match token.trim().to_ascii_lowercase().as_str() {
            "no" | "step" => Self::No,
            "average" => Self::Average,
            "linear" => Self::Linear,
            _ => return None,
        };
        Some(value)
    }

    /// True when values should be linearly interpolated.
    pub fn is_linear(self) -> bool {
        matches!(self, Self::Average | Self::Linear)
    }
}

/// One time-value sample: `value` applies to query times strictly before
/// `until`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeValue {
    /// End of the interval this value covers.
    pub until: TimeOfDay,
    /// The schedule value over the interval.
    pub value: f64,
}

/// One `For:` block: the day types it claims and its time-value sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompactDayRule {
    /// Labels this rule applies to.
    pub day_types: DayTypeSet,
    /// Time-value samples in ascending time order.
    pub time_values: Vec<TimeValue>,
}

/// One `Through:` block. Periods are implicitly contiguous: each starts
/// the day after the previous period's end (January 1 for the first).
#[derive(Debug, Clone, PartialEq)]
pub struct CompactPeriod {
    /// End month of the period (1-12).
    pub end_month: u32,
    /// End day-of-month of the period.
    pub end_day: u32,
    /// Day rules declared within this period.
    pub day_rules: Vec<CompactDayRule>,
}

impl CompactPeriod {
    /// True when `date` is on or before this period's end boundary.
    ///
    /// Only the end boundary is checked; the start is implied by the
    /// preceding period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        (date.month(), date.day()) <= (self.end_month, self.end_day)
    }
}

/// A holiday or custom-day period spanning one or more consecutive days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialDay {
    /// Name of the special day (e.g. `"Christmas"`).
    pub name: String,
    /// First date of the period.
    pub start_date: NaiveDate,
    /// Number of days the period spans (at least 1).
    pub duration_days: u32,
    /// Which special-day class the period belongs to.
    pub day_type: DayTypeLabel,
}

impl SpecialDay {
    /// True when `date` falls inside this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.start_date {
            return false;
        }
        let span = u64::from(self.duration_days.saturating_sub(1));
        match self.start_date.checked_add_days(Days::new(span)) {
            Some(end) => date <= end,
            None => false,
        }
    }
}

/// Caller-supplied evaluation context: override, date sets, and the
/// interpolation mode for schedule types that don't declare their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalOptions {
    /// Day-type override for sizing-style evaluation.
    pub day_type: DayOverride,
    /// Interpolation mode for day and week schedules. Compact schedules
    /// use their own parsed `Interpolate:` mode instead.
    pub interpolation: Interpolation,
    /// Dates classified as holidays.
    pub holidays: HashSet<NaiveDate>,
    /// Dates classified as CustomDay1.
    pub custom_day_1: HashSet<NaiveDate>,
    /// Dates classified as CustomDay2.
    pub custom_day_2: HashSet<NaiveDate>,
}

/// Parses a whitespace/comma-separated day-type token list into a set.
///
/// Unrecognized tokens are dropped for compatibility with existing model
/// corpora; each drop is logged on the debug channel for diagnosis.
pub fn parse_day_type_tokens(list: &str) -> DayTypeSet {
    let mut set = DayTypeSet::EMPTY;
    for token in list.split([' ', '\t', ',']).filter(|t| !t.is_empty()) {
        match DayTypeLabel::from_token(token) {
            Some(label) => set.insert(label),
            None => log::debug!("ignoring unrecognized day-type token {token:?}"),
        }
    }
    set
}

/// Computes every day-type label a date satisfies.
///
/// An explicit override short-circuits to `{override, AllDays}`; otherwise
/// the set is the union of special-day memberships, the calendar weekday,
/// its Weekdays/Weekends grouping, `AllDays`, and `AllOtherDays`.
pub fn applicable_day_types(date: NaiveDate, options: &EvalOptions) -> DayTypeSet {
    let mut set = DayTypeSet::EMPTY;

    if let Some(label) = options.day_type.label() {
        set.insert(label);
        set.insert(DayTypeLabel::AllDays);
        return set;
    }

    if options.custom_day_2.contains(&date) {
        set.insert(DayTypeLabel::CustomDay2);
    }
    if options.custom_day_1.contains(&date) {
        set.insert(DayTypeLabel::CustomDay1);
    }
    if options.holidays.contains(&date) {
        set.insert(DayTypeLabel::Holiday);
    }

    let weekday = date.weekday();
    set.insert(DayTypeLabel::from_weekday(weekday));
    if matches!(weekday, Weekday::Sat | Weekday::Sun) {
        set.insert(DayTypeLabel::Weekends);
    } else {
        set.insert(DayTypeLabel::Weekdays);
    }

    set.insert(DayTypeLabel::AllDays);
    set.insert(DayTypeLabel::AllOtherDays);
    set
}
