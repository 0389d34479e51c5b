//! Computer inventory repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::InventoryStatus,
        inventory::{InventoryItem, InventoryListEntry, UpdateInventoryItem},
        stats::DistributionRow,
    },
};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: Pool<Postgres>,
}

impl InventoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>("SELECT * FROM computer_inventory WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inventory item {} not found", id)))
    }

    /// List units, newest first, with the donor name
    pub async fn list(&self, status: Option<InventoryStatus>) -> AppResult<Vec<InventoryListEntry>> {
        let rows = sqlx::query_as::<_, InventoryListEntry>(
            r#"
            SELECT i.*, d.donor_name
            FROM computer_inventory i
            LEFT JOIN donations d ON d.id = i.donation_id
            WHERE ($1::text IS NULL OR i.status = $1)
            ORDER BY i.created_at DESC, i.id DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_donation(&self, donation_id: i64) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM computer_inventory WHERE donation_id = $1 ORDER BY id",
        )
        .bind(donation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Apply a refurbishment update. `status` must already be validated.
    pub async fn update(
        &self,
        id: i64,
        data: &UpdateInventoryItem,
        status: Option<InventoryStatus>,
    ) -> AppResult<InventoryItem> {
        let mut sets = vec!["updated_at = NOW()".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.computer_type, "computer_type");
        add_field!(status, "status");
        add_field!(data.condition_after_refurbishment, "condition_after_refurbishment");
        add_field!(data.refurbishment_notes, "refurbishment_notes");
        add_field!(data.serial_number, "serial_number");

        let query = format!(
            "UPDATE computer_inventory SET {} WHERE id = $1 RETURNING *",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, InventoryItem>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.computer_type);
        bind_field!(status);
        bind_field!(data.condition_after_refurbishment);
        bind_field!(data.refurbishment_notes);
        bind_field!(data.serial_number);

        builder
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                    AppError::Conflict("Serial number already assigned to another unit".to_string())
                } else {
                    AppError::Database(e)
                }
            })?
            .ok_or_else(|| AppError::NotFound(format!("Inventory item {} not found", id)))
    }

    /// Delivered units with the location of the receiving request, within the period
    pub async fn delivered_between(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<DistributionRow>> {
        let rows = sqlx::query_as::<_, DistributionRow>(
            r#"
            SELECT r.location, i.updated_at AS delivered_at
            FROM computer_inventory i
            JOIN school_requests r ON r.id = i.assigned_school_request_id
            WHERE i.status = 'delivered'
              AND ($1::date IS NULL OR i.updated_at >= $1::date)
              AND ($2::date IS NULL OR i.updated_at < $2::date + INTERVAL '1 day')
            ORDER BY i.updated_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
