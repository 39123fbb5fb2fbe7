use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// The renewal cadence of a category.
///
/// Documents may carry any string here; anything other than the four known
/// values (including a missing field) normalizes to `Month`. That is a
/// normalization rule, not an error.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Interval {
    Year,
    Quarter,
    #[default]
    Month,
    Week,
}

impl Interval {
    /// Parses a stored interval string, falling back to `Month`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "year" => Self::Year,
            "quarter" => Self::Quarter,
            "month" => Self::Month,
            "week" => Self::Week,
            _ => Self::Month,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Quarter => "quarter",
            Self::Month => "month",
            Self::Week => "week",
        }
    }
}

fn serialize_interval<S>(interval: &Interval, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(interval.as_str())
}

fn deserialize_interval<'de, D>(deserializer: D) -> Result<Interval, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(Interval::parse).unwrap_or_default())
}

/// Advances an instant by one renewal interval.
///
/// Calendar-month addition clamps the day-of-month to the last valid day of
/// the target month, so `2024-01-31 + month = 2024-02-29`. Weeks are exactly
/// seven days regardless of month or year boundaries.
pub fn advance(from: DateTime<Utc>, interval: Interval) -> DateTime<Utc> {
    match interval {
        Interval::Year => from + Months::new(12),
        Interval::Quarter => from + Months::new(3),
        Interval::Month => from + Months::new(1),
        Interval::Week => from + Duration::days(7),
    }
}

/// Policy for the instant the next due date is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenewalBasis {
    /// Advance one interval past the execution moment. A category overdue by
    /// several cycles lands a single interval from now; missed cycles
    /// collapse. This matches the original system's behavior.
    #[default]
    FromNow,
    /// Advance from the previous due date, repeatedly, until the result is
    /// strictly after the execution moment. Missed cycles each land one
    /// interval apart.
    CatchUp,
}

impl RenewalBasis {
    /// Computes the next due date. The result is strictly after `now` under
    /// either policy.
    pub fn next_due(
        self,
        now: DateTime<Utc>,
        previous: DateTime<Utc>,
        interval: Interval,
    ) -> DateTime<Utc> {
        match self {
            Self::FromNow => advance(now, interval),
            Self::CatchUp => {
                let mut next = previous;
                while next <= now {
                    next = advance(next, interval);
                }
                next
            }
        }
    }
}

/// A budget category as stored in a user's sub-collection.
///
/// This job mutates only `balance` and `next_update`; creation and deletion
/// of categories happen elsewhere.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The stable document id of the category.
    pub id: String,
    /// Display label, used only for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Accumulated funds. Only the renewal transition mutates this.
    pub balance: Decimal,
    /// The amount added at each renewal.
    pub budget: Decimal,
    #[serde(
        default,
        serialize_with = "serialize_interval",
        deserialize_with = "deserialize_interval"
    )]
    pub interval: Interval,
    /// When the category next becomes eligible. Absent means never eligible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_update: Option<DateTime<Utc>>,
}

/// The two fields a renewal persists, applied as one atomic update.
#[derive(Debug, Serialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub balance: Decimal,
    pub next_update: DateTime<Utc>,
}

impl Category {
    /// A category is due when its `next_update` is present and not after now.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_update.is_some_and(|due| due <= now)
    }

    /// Computes the renewal transition, or `None` if the category is not due.
    pub fn renewal(&self, now: DateTime<Utc>, basis: RenewalBasis) -> Option<CategoryUpdate> {
        let previous = self.next_update.filter(|due| *due <= now)?;
        Some(CategoryUpdate {
            balance: self.balance + self.budget,
            next_update: basis.next_due(now, previous, self.interval),
        })
    }

    pub fn apply(&mut self, update: CategoryUpdate) {
        self.balance = update.balance;
        self.next_update = Some(update.next_update);
    }
}
