use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Food entry row as stored in `food_entries`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FoodEntryRow {
    pub id: i32,
    pub name: String,
    pub calories: Decimal, // NUMERIC(8, 2)
    pub consumed_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated values for a new entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFoodEntry {
    pub name: String,
    pub calories: Decimal,
    pub consumed_at: OffsetDateTime,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodEntryChanges {
    pub name: Option<String>,
    pub calories: Option<Decimal>,
    pub consumed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTotals {
    pub total_calories: Decimal,
    pub entry_count: i64,
}

/// Food entry as exposed to clients: calories are a plain number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodEntry {
    pub id: i32,
    pub name: String,
    pub calories: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub consumed_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<FoodEntryRow> for FoodEntry {
    fn from(r: FoodEntryRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            calories: decimal_to_f64(r.calories),
            consumed_at: r.consumed_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub total_calories: f64,
    pub entry_count: i64,
}

pub(crate) fn decimal_to_f64(d: Decimal) -> f64 {
    // NUMERIC(8, 2) always fits in an f64
    d.to_f64().unwrap_or_default()
}
