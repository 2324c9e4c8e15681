//! Trackor search filter vocabulary.
//!
//! [`crate::TrackorApi::search_trackors`] takes the filter as a plain string
//! and relays it verbatim; the backend alone parses and validates it. This
//! module only names the documented operators so filters can be written
//! without typos:
//!
//! ```
//! use trackor_bridge::filter::Filter;
//!
//! let filter = Filter::Equal("TRACKOR_KEY".into(), "Float Fiber".into());
//! assert_eq!(filter.to_string(), "equal(TRACKOR_KEY, Float Fiber)");
//!
//! let recent = Filter::ThisWeek("OSPD_MEETING_TIME".into(), -1);
//! assert_eq!(recent.to_string(), "this_week(OSPD_MEETING_TIME, -1)");
//! ```

use std::fmt;

/// One filter operator applied to config field names and literal values.
///
/// Relative-date operators take a signed offset rendered with an explicit
/// sign (`+0`, `-2`), which is what the backend expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Equal(String, String),
    NotEqual(String, String),
    Greater(String, String),
    Less(String, String),
    GreaterOrEqual(String, String),
    LessOrEqual(String, String),
    Within(String, String, String),
    Null(String),
    NotNull(String),
    OuterEqual(String, String),
    OuterNotEqual(String, String),
    GtToday(String, i32),
    LtToday(String, i32),
    ThisWeek(String, i32),
    ThisMonth(String, i32),
    ThisQuarter(String, i32),
    ThisYear(String, i32),
    ThisWeekToDate(String),
    ThisMonthToDate(String),
    ThisQuarterToDate(String),
    ThisYearToDate(String),
    FieldEqual(String, String),
    FieldNotEqual(String, String),
    FieldLess(String, String),
    FieldGreater(String, String),
    FieldLessOrEqual(String, String),
    FieldGreaterOrEqual(String, String),
    New(String),
    NotNew(String),
    EqualMyself(String),
    NotEqualMyself(String),
}

impl Filter {
    /// Canonical operator name
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Equal(..) => "equal",
            Self::NotEqual(..) => "not_equal",
            Self::Greater(..) => "greater",
            Self::Less(..) => "less",
            Self::GreaterOrEqual(..) => "greater_or_equal",
            Self::LessOrEqual(..) => "less_or_equal",
            Self::Within(..) => "within",
            Self::Null(..) => "null",
            Self::NotNull(..) => "is_not_null",
            Self::OuterEqual(..) => "outer_equal",
            Self::OuterNotEqual(..) => "outer_not_equal",
            Self::GtToday(..) => "gt_today",
            Self::LtToday(..) => "lt_today",
            Self::ThisWeek(..) => "this_week",
            Self::ThisMonth(..) => "this_month",
            Self::ThisQuarter(..) => "this_quarter",
            Self::ThisYear(..) => "this_year",
            Self::ThisWeekToDate(..) => "this_week_to_date",
            Self::ThisMonthToDate(..) => "this_month_to_date",
            Self::ThisQuarterToDate(..) => "this_quarter_to_date",
            Self::ThisYearToDate(..) => "this_year_to_date",
            Self::FieldEqual(..) => "field_equal",
            Self::FieldNotEqual(..) => "field_not_equal",
            Self::FieldLess(..) => "field_less",
            Self::FieldGreater(..) => "field_greater",
            Self::FieldLessOrEqual(..) => "field_less_or_equal",
            Self::FieldGreaterOrEqual(..) => "field_greater_or_equal",
            Self::New(..) => "new",
            Self::NotNew(..) => "not_new",
            Self::EqualMyself(..) => "equal_myself",
            Self::NotEqualMyself(..) => "not_equal_myself",
        }
    }

    /// Symbolic or alternate spelling the backend also accepts, if any
    pub fn alias(&self) -> Option<&'static str> {
        match self {
            Self::Equal(..) => Some("="),
            Self::NotEqual(..) => Some("<>"),
            Self::Greater(..) => Some(">"),
            Self::Less(..) => Some("<"),
            Self::GreaterOrEqual(..) => Some(">="),
            Self::LessOrEqual(..) => Some("<="),
            Self::Null(..) => Some("is_null"),
            Self::GtToday(..) => Some(">=Today"),
            Self::LtToday(..) => Some("<=Today"),
            Self::FieldEqual(..) => Some("=F"),
            Self::FieldNotEqual(..) => Some("<>F"),
            Self::FieldLess(..) => Some("<F"),
            Self::FieldGreater(..) => Some(">F"),
            Self::FieldLessOrEqual(..) => Some("<=F"),
            Self::FieldGreaterOrEqual(..) => Some(">=F"),
            Self::New(..) => Some("is_new"),
            Self::NotNew(..) => Some("is_not_new"),
            Self::EqualMyself(..) => Some("=Myself"),
            Self::NotEqualMyself(..) => Some("<>Myself"),
            _ => None,
        }
    }

    fn operands(&self) -> Vec<String> {
        match self {
            Self::Equal(f, v)
            | Self::NotEqual(f, v)
            | Self::Greater(f, v)
            | Self::Less(f, v)
            | Self::GreaterOrEqual(f, v)
            | Self::LessOrEqual(f, v)
            | Self::OuterEqual(f, v)
            | Self::OuterNotEqual(f, v)
            | Self::FieldEqual(f, v)
            | Self::FieldNotEqual(f, v)
            | Self::FieldLess(f, v)
            | Self::FieldGreater(f, v)
            | Self::FieldLessOrEqual(f, v)
            | Self::FieldGreaterOrEqual(f, v) => vec![f.clone(), v.clone()],
            Self::Within(f, low, high) => vec![f.clone(), low.clone(), high.clone()],
            Self::GtToday(f, offset)
            | Self::LtToday(f, offset)
            | Self::ThisWeek(f, offset)
            | Self::ThisMonth(f, offset)
            | Self::ThisQuarter(f, offset)
            | Self::ThisYear(f, offset) => vec![f.clone(), format!("{:+}", offset)],
            Self::Null(f)
            | Self::NotNull(f)
            | Self::ThisWeekToDate(f)
            | Self::ThisMonthToDate(f)
            | Self::ThisQuarterToDate(f)
            | Self::ThisYearToDate(f)
            | Self::New(f)
            | Self::NotNew(f)
            | Self::EqualMyself(f)
            | Self::NotEqualMyself(f) => vec![f.clone()],
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operator(), self.operands().join(", "))
    }
}

impl From<Filter> for String {
    fn from(filter: Filter) -> Self {
        filter.to_string()
    }
}
