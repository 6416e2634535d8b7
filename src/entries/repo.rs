use anyhow::Context;
use axum::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::entries::repo_types::{DayTotals, FoodEntryChanges, FoodEntryRow, NewFoodEntry};

/// Persistent keyed collection of food entries.
///
/// Missing ids are reported as `Ok(None)`; every `Err` is a store fault.
#[async_trait]
pub trait FoodEntryStore: Send + Sync {
    async fn insert(&self, entry: NewFoodEntry, now: OffsetDateTime)
        -> anyhow::Result<FoodEntryRow>;
    async fn find(&self, id: i32) -> anyhow::Result<Option<FoodEntryRow>>;
    /// All entries, most recently consumed first, ties in insertion order.
    async fn list_all(&self) -> anyhow::Result<Vec<FoodEntryRow>>;
    /// Entries with `start <= consumed_at <= end`, in no particular order.
    async fn list_consumed_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<FoodEntryRow>>;
    /// Applies `changes` and moves `updated_at` to `max(now, updated_at + 1µs)`.
    async fn update(
        &self,
        id: i32,
        changes: FoodEntryChanges,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<FoodEntryRow>>;
    async fn delete(&self, id: i32) -> anyhow::Result<Option<FoodEntryRow>>;
    /// Sum and count over the half-open window `[start, end)`; no `end` means unbounded.
    async fn totals_between(
        &self,
        start: OffsetDateTime,
        end: Option<OffsetDateTime>,
    ) -> anyhow::Result<DayTotals>;
}

#[derive(Clone)]
pub struct PgFoodEntryStore {
    db: PgPool,
}

impl PgFoodEntryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodEntryStore for PgFoodEntryStore {
    async fn insert(
        &self,
        entry: NewFoodEntry,
        now: OffsetDateTime,
    ) -> anyhow::Result<FoodEntryRow> {
        let row = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            INSERT INTO food_entries (name, calories, consumed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, name, calories, consumed_at, created_at, updated_at
            "#,
        )
        .bind(entry.name)
        .bind(entry.calories)
        .bind(entry.consumed_at)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .context("insert food entry")?;
        Ok(row)
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<FoodEntryRow>> {
        let row = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            SELECT id, name, calories, consumed_at, created_at, updated_at
              FROM food_entries
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find food entry")?;
        Ok(row)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<FoodEntryRow>> {
        let rows = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            SELECT id, name, calories, consumed_at, created_at, updated_at
              FROM food_entries
             ORDER BY consumed_at DESC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list food entries")?;
        Ok(rows)
    }

    async fn list_consumed_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<FoodEntryRow>> {
        let rows = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            SELECT id, name, calories, consumed_at, created_at, updated_at
              FROM food_entries
             WHERE consumed_at >= $1 AND consumed_at <= $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await
        .context("list food entries by consumed_at range")?;
        Ok(rows)
    }

    async fn update(
        &self,
        id: i32,
        changes: FoodEntryChanges,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<FoodEntryRow>> {
        let row = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            UPDATE food_entries
               SET name        = COALESCE($2, name),
                   calories    = COALESCE($3, calories),
                   consumed_at = COALESCE($4, consumed_at),
                   updated_at  = GREATEST($5, updated_at + INTERVAL '1 microsecond')
             WHERE id = $1
            RETURNING id, name, calories, consumed_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.calories)
        .bind(changes.consumed_at)
        .bind(now)
        .fetch_optional(&self.db)
        .await
        .context("update food entry")?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<Option<FoodEntryRow>> {
        let row = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            DELETE FROM food_entries
             WHERE id = $1
            RETURNING id, name, calories, consumed_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("delete food entry")?;
        Ok(row)
    }

    async fn totals_between(
        &self,
        start: OffsetDateTime,
        end: Option<OffsetDateTime>,
    ) -> anyhow::Result<DayTotals> {
        let (total_calories, entry_count) = sqlx::query_as::<_, (Decimal, i64)>(
            r#"
            SELECT COALESCE(SUM(calories), 0), COUNT(*)
              FROM food_entries
             WHERE consumed_at >= $1
               AND ($2::timestamptz IS NULL OR consumed_at < $2)
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await
        .context("sum food entry calories")?;
        Ok(DayTotals {
            total_calories,
            entry_count,
        })
    }
}
