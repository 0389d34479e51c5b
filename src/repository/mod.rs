//! Repository layer for database operations

pub mod contact;
pub mod donations;
pub mod inventory;
pub mod school_requests;
pub mod schools;
pub mod stats;
pub mod users;
pub mod workflow;

#[cfg(test)]
pub mod memory;

use sqlx::{Pool, Postgres};

pub use workflow::WorkflowStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub donations: donations::DonationsRepository,
    pub school_requests: school_requests::SchoolRequestsRepository,
    pub inventory: inventory::InventoryRepository,
    pub schools: schools::SchoolsRepository,
    pub contact: contact::ContactRepository,
    pub users: users::UsersRepository,
    pub stats: stats::StatsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            donations: donations::DonationsRepository::new(pool.clone()),
            school_requests: school_requests::SchoolRequestsRepository::new(pool.clone()),
            inventory: inventory::InventoryRepository::new(pool.clone()),
            schools: schools::SchoolsRepository::new(pool.clone()),
            contact: contact::ContactRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            stats: stats::StatsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database, for readiness checks
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
