//! Storage operations used by the status and fulfillment workflows.
//!
//! The trait is the seam between the workflow services and Postgres; tests
//! swap in an in-memory store.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        donation::Donation,
        enums::{DonationStatus, InventoryStatus, RequestStatus},
        inventory::{FulfillmentOutcome, NewInventoryItem},
        school_request::{SchoolRequest, SchoolRequestWithOwner},
    },
    services::transitions,
};

#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn donation(&self, id: i64) -> AppResult<Donation>;

    /// Persist a donation status, and the pickup date when one is given
    async fn set_donation_status(
        &self,
        id: i64,
        status: DonationStatus,
        pickup_date: Option<NaiveDate>,
    ) -> AppResult<Donation>;

    /// Insert the inventory batch of a donation unless one already exists.
    /// Returns the number of units inserted (0 when the batch existed).
    async fn insert_inventory_batch(&self, donation_id: i64, items: &[NewInventoryItem]) -> AppResult<u64>;

    async fn request_with_owner(&self, id: i64) -> AppResult<SchoolRequestWithOwner>;

    async fn set_request_status(&self, id: i64, status: RequestStatus) -> AppResult<SchoolRequest>;

    /// Mark the units delivered to the request, recompute its status from the
    /// assigned count and credit the school, all or nothing.
    /// `item_ids` must be non-empty and free of duplicates.
    async fn fulfill_request(&self, request_id: i64, item_ids: &[i64]) -> AppResult<FulfillmentOutcome>;
}

#[async_trait]
impl WorkflowStore for Repository {
    async fn donation(&self, id: i64) -> AppResult<Donation> {
        self.donations.get_by_id(id).await
    }

    async fn set_donation_status(
        &self,
        id: i64,
        status: DonationStatus,
        pickup_date: Option<NaiveDate>,
    ) -> AppResult<Donation> {
        self.donations.update_status(id, status, pickup_date).await
    }

    async fn insert_inventory_batch(&self, donation_id: i64, items: &[NewInventoryItem]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        // The guard row makes generation insert-if-absent at the store level
        let claimed = sqlx::query(
            r#"
            INSERT INTO inventory_batches (donation_id, quantity)
            VALUES ($1, $2)
            ON CONFLICT (donation_id) DO NOTHING
            "#,
        )
        .bind(donation_id)
        .bind(items.len() as i32)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if claimed == 0 {
            tx.rollback().await?;
            return Ok(0);
        }

        // Units created before the guard table existed also count as a batch
        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM computer_inventory WHERE donation_id = $1")
                .bind(donation_id)
                .fetch_one(&mut *tx)
                .await?;

        if existing > 0 {
            tx.commit().await?;
            return Ok(0);
        }

        let computer_types: Vec<String> = items.iter().map(|i| i.computer_type.to_string()).collect();
        let conditions: Vec<String> = items.iter().map(|i| i.condition_received.to_string()).collect();
        let statuses: Vec<String> = items.iter().map(|i| i.status.to_string()).collect();
        let serials: Vec<String> = items.iter().map(|i| i.serial_number.clone()).collect();

        let inserted = sqlx::query(
            r#"
            INSERT INTO computer_inventory
                (donation_id, computer_type, condition_received, status, serial_number)
            SELECT $1, t.computer_type, t.condition_received, t.status, t.serial_number
            FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[])
                AS t(computer_type, condition_received, status, serial_number)
            "#,
        )
        .bind(donation_id)
        .bind(&computer_types)
        .bind(&conditions)
        .bind(&statuses)
        .bind(&serials)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok(inserted)
    }

    async fn request_with_owner(&self, id: i64) -> AppResult<SchoolRequestWithOwner> {
        self.school_requests.get_with_owner(id).await
    }

    async fn set_request_status(&self, id: i64, status: RequestStatus) -> AppResult<SchoolRequest> {
        self.school_requests.update_status(id, status).await
    }

    async fn fulfill_request(&self, request_id: i64, item_ids: &[i64]) -> AppResult<FulfillmentOutcome> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, SchoolRequest>(
            "SELECT * FROM school_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("School request {} not found", request_id)))?;

        let found: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM computer_inventory WHERE id = ANY($1) FOR UPDATE",
        )
        .bind(item_ids)
        .fetch_all(&mut *tx)
        .await?;

        if found.len() != item_ids.len() {
            let missing: Vec<String> = item_ids
                .iter()
                .filter(|id| !found.contains(*id))
                .map(|id| id.to_string())
                .collect();
            tx.rollback().await?;
            return Err(AppError::NotFound(format!(
                "Inventory item(s) not found: {}",
                missing.join(", ")
            )));
        }

        let delivered = sqlx::query(
            r#"
            UPDATE computer_inventory
            SET status = $1, assigned_school_request_id = $2, updated_at = NOW()
            WHERE id = ANY($3) AND assigned_school_request_id IS DISTINCT FROM $2
            "#,
        )
        .bind(InventoryStatus::Delivered)
        .bind(request_id)
        .bind(item_ids)
        .execute(&mut *tx)
        .await?
        .rows_affected() as i64;

        let assigned_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM computer_inventory WHERE assigned_school_request_id = $1",
        )
        .bind(request_id)
        .fetch_one(&mut *tx)
        .await?;

        let quantity = i64::from(request.quantity);
        let request_status =
            transitions::status_after_assignment(request.status, assigned_count, quantity);

        if request_status != request.status {
            sqlx::query("UPDATE school_requests SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(request_id)
                .bind(request_status)
                .execute(&mut *tx)
                .await?;
        }

        // Prefer the directory link; fall back to the first school with the same name
        let credited = match request.school_id {
            Some(school_id) => sqlx::query(
                r#"
                UPDATE schools
                SET computers_received = computers_received + $2, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(school_id)
            .bind(delivered as i32)
            .execute(&mut *tx)
            .await?
            .rows_affected(),
            None => sqlx::query(
                r#"
                UPDATE schools
                SET computers_received = computers_received + $2, updated_at = NOW()
                WHERE id = (
                    SELECT id FROM schools WHERE LOWER(name) = LOWER($1) ORDER BY id LIMIT 1
                )
                "#,
            )
            .bind(request.school_name.trim())
            .bind(delivered as i32)
            .execute(&mut *tx)
            .await?
            .rows_affected(),
        };

        tx.commit().await?;

        Ok(FulfillmentOutcome {
            delivered,
            assigned_count,
            quantity,
            request_status,
            school_credited: credited > 0,
        })
    }
}
