use axum::async_trait;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

use crate::entries::repo::FoodEntryStore;
use crate::entries::repo_types::{DayTotals, FoodEntryChanges, FoodEntryRow, NewFoodEntry};

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: Vec<FoodEntryRow>, // insertion order
}

/// In-process store used by tests. Mirrors the Postgres queries row for row.
#[derive(Default)]
pub struct MemoryFoodEntryStore {
    table: RwLock<Table>,
}

impl MemoryFoodEntryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FoodEntryStore for MemoryFoodEntryStore {
    async fn insert(
        &self,
        entry: NewFoodEntry,
        now: OffsetDateTime,
    ) -> anyhow::Result<FoodEntryRow> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let row = FoodEntryRow {
            id: table.next_id,
            name: entry.name,
            calories: entry.calories,
            consumed_at: entry.consumed_at,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<FoodEntryRow>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|r| r.id == id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<FoodEntryRow>> {
        let mut rows = self.table.read().await.rows.clone();
        // stable sort keeps insertion order for equal timestamps
        rows.sort_by(|a, b| b.consumed_at.cmp(&a.consumed_at));
        Ok(rows)
    }

    async fn list_consumed_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<FoodEntryRow>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|r| r.consumed_at >= start && r.consumed_at <= end)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: i32,
        changes: FoodEntryChanges,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<FoodEntryRow>> {
        let mut table = self.table.write().await;
        let Some(row) = table.rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(calories) = changes.calories {
            row.calories = calories;
        }
        if let Some(consumed_at) = changes.consumed_at {
            row.consumed_at = consumed_at;
        }
        row.updated_at = now.max(row.updated_at + Duration::microseconds(1));
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> anyhow::Result<Option<FoodEntryRow>> {
        let mut table = self.table.write().await;
        let Some(pos) = table.rows.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        Ok(Some(table.rows.remove(pos)))
    }

    async fn totals_between(
        &self,
        start: OffsetDateTime,
        end: Option<OffsetDateTime>,
    ) -> anyhow::Result<DayTotals> {
        let table = self.table.read().await;
        let (total_calories, entry_count) = table
            .rows
            .iter()
            .filter(|r| r.consumed_at >= start && end.map_or(true, |end| r.consumed_at < end))
            .fold((Decimal::ZERO, 0i64), |(sum, count), r| {
                (sum + r.calories, count + 1)
            });
        Ok(DayTotals {
            total_calories,
            entry_count,
        })
    }
}
