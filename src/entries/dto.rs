use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{macros::format_description, Date, OffsetDateTime};

use crate::entries::repo_types::{FoodEntryChanges, NewFoodEntry};

/// Largest value NUMERIC(8, 2) can hold is 999999.99.
const CALORIES_CEILING: i64 = 1_000_000;

#[derive(Debug, Deserialize)]
pub struct CreateFoodEntryRequest {
    pub name: String,
    pub calories: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub consumed_at: OffsetDateTime,
}

/// Every field is optional; `null` and a missing key both mean "keep".
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFoodEntryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub consumed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct DailySummaryQuery {
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{}", join_field_errors(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn check_name(name: &str, errors: &mut ValidationErrors) {
    if name.is_empty() {
        errors.push("name", "Food name is required");
    }
}

/// Converts a client calorie value to its stored 2-decimal form.
pub(crate) fn calories_to_decimal(
    calories: f64,
    errors: &mut ValidationErrors,
) -> Option<Decimal> {
    if !calories.is_finite() || calories <= 0.0 {
        errors.push("calories", "Calories must be positive");
        return None;
    }
    let Some(exact) = Decimal::from_f64_retain(calories) else {
        errors.push("calories", format!("Calories must be less than {CALORIES_CEILING}"));
        return None;
    };
    let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded <= Decimal::ZERO {
        errors.push("calories", "Calories must be positive");
        return None;
    }
    if rounded >= Decimal::from(CALORIES_CEILING) {
        errors.push("calories", format!("Calories must be less than {CALORIES_CEILING}"));
        return None;
    }
    Some(rounded)
}

impl CreateFoodEntryRequest {
    pub fn validate(self) -> Result<NewFoodEntry, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_name(&self.name, &mut errors);
        let calories = calories_to_decimal(self.calories, &mut errors);
        match calories {
            Some(calories) => errors.into_result(NewFoodEntry {
                name: self.name,
                calories,
                consumed_at: self.consumed_at,
            }),
            None => Err(errors),
        }
    }
}

impl UpdateFoodEntryRequest {
    pub fn validate(self) -> Result<FoodEntryChanges, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        let calories = self
            .calories
            .and_then(|c| calories_to_decimal(c, &mut errors));
        errors.into_result(FoodEntryChanges {
            name: self.name,
            calories,
            consumed_at: self.consumed_at,
        })
    }
}

fn is_iso_date(s: &str) -> bool {
    lazy_static! {
        static ref ISO_DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    }
    ISO_DATE_RE.is_match(s)
}

impl DailySummaryQuery {
    pub fn validate(&self) -> Result<Date, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if !is_iso_date(&self.date) {
            errors.push("date", "Date must be in YYYY-MM-DD format");
            return Err(errors);
        }
        match Date::parse(&self.date, format_description!("[year]-[month]-[day]")) {
            Ok(date) => Ok(date),
            Err(_) => {
                errors.push("date", "Date is not a valid calendar date");
                Err(errors)
            }
        }
    }
}
