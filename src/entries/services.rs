use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::entries::repo::FoodEntryStore;
use crate::entries::repo_types::{
    decimal_to_f64, DailySummary, FoodEntry, FoodEntryChanges, NewFoodEntry,
};
use crate::error::EntryError;

/// Current time at the precision Postgres keeps (microseconds).
fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - Duration::nanoseconds(i64::from(now.nanosecond() % 1_000))
}

pub async fn create_food_entry(
    store: &dyn FoodEntryStore,
    entry: NewFoodEntry,
) -> Result<FoodEntry, EntryError> {
    let row = store.insert(entry, now_utc()).await?;
    info!(id = row.id, name = %row.name, "food entry created");
    Ok(row.into())
}

pub async fn get_food_entry(store: &dyn FoodEntryStore, id: i32) -> Result<FoodEntry, EntryError> {
    store
        .find(id)
        .await?
        .map(FoodEntry::from)
        .ok_or(EntryError::NotFound(id))
}

pub async fn get_food_entries(store: &dyn FoodEntryStore) -> Result<Vec<FoodEntry>, EntryError> {
    let rows = store.list_all().await?;
    debug!(count = rows.len(), "listed food entries");
    Ok(rows.into_iter().map(FoodEntry::from).collect())
}

/// Inclusive on both ends. `start > end` simply matches nothing.
pub async fn get_food_entries_by_date_range(
    store: &dyn FoodEntryStore,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<FoodEntry>, EntryError> {
    let rows = store.list_consumed_between(start, end).await?;
    debug!(count = rows.len(), %start, %end, "listed food entries in range");
    Ok(rows.into_iter().map(FoodEntry::from).collect())
}

pub async fn update_food_entry(
    store: &dyn FoodEntryStore,
    id: i32,
    changes: FoodEntryChanges,
) -> Result<FoodEntry, EntryError> {
    let row = store
        .update(id, changes, now_utc())
        .await?
        .ok_or(EntryError::NotFound(id))?;
    info!(id = row.id, "food entry updated");
    Ok(row.into())
}

pub async fn delete_food_entry(
    store: &dyn FoodEntryStore,
    id: i32,
) -> Result<FoodEntry, EntryError> {
    let row = store.delete(id).await?.ok_or(EntryError::NotFound(id))?;
    info!(id = row.id, "food entry deleted");
    Ok(row.into())
}

/// Totals over `[date 00:00 UTC, date+1 00:00 UTC)`.
/// The last representable date has no next midnight, so its window is left open.
pub async fn get_daily_summary(
    store: &dyn FoodEntryStore,
    date: Date,
) -> Result<DailySummary, EntryError> {
    let start = date.midnight().assume_utc();
    let end = date.next_day().map(|next| next.midnight().assume_utc());
    let totals = store.totals_between(start, end).await?;
    debug!(%date, entry_count = totals.entry_count, "daily summary");
    Ok(DailySummary {
        date: date.to_string(),
        total_calories: decimal_to_f64(totals.total_calories),
        entry_count: totals.entry_count,
    })
}
