//! Inventory generation from donations, and refurbishment updates

use rand::{seq::index, Rng};

use crate::{
    error::{AppError, AppResult},
    models::{
        donation::Donation,
        enums::{DonationComputerType, DonationCondition, InventoryComputerType, InventoryStatus, ReceivedCondition},
        inventory::{InventoryItem, InventoryListEntry, InventoryQuery, NewInventoryItem, UpdateInventoryItem},
    },
    repository::Repository,
    services::transitions,
};

/// Number of distinct placeholder suffixes (`0000`..`9999`)
const SERIAL_SPACE: usize = 10_000;

/// Largest batch generated from a single donation
pub const MAX_BATCH_SIZE: usize = 10_000;

/// `mixed` lots are booked as desktops until refurbishment says otherwise
pub fn resolve_computer_type(kind: DonationComputerType) -> InventoryComputerType {
    match kind {
        DonationComputerType::Desktop | DonationComputerType::Mixed => InventoryComputerType::Desktop,
        DonationComputerType::Laptop => InventoryComputerType::Laptop,
        DonationComputerType::Tablet => InventoryComputerType::Tablet,
    }
}

/// `mixed` lots are booked as needing repair
pub fn resolve_condition(condition: DonationCondition) -> ReceivedCondition {
    match condition {
        DonationCondition::Working => ReceivedCondition::Working,
        DonationCondition::NeedsRepair | DonationCondition::Mixed => ReceivedCondition::NeedsRepair,
        DonationCondition::NotWorking => ReceivedCondition::NotWorking,
    }
}

/// `count` placeholder serials for a donation, distinct within the batch.
/// Suffixes are random 4-digit values while the space allows it, else sequential.
pub fn placeholder_serials<R: Rng + ?Sized>(donation_id: i64, count: usize, rng: &mut R) -> Vec<String> {
    let suffixes: Vec<usize> = if count <= SERIAL_SPACE {
        index::sample(rng, SERIAL_SPACE, count).into_vec()
    } else {
        (0..count).collect()
    };

    suffixes
        .into_iter()
        .map(|suffix| format!("PENDING-{}-{:04}", donation_id, suffix))
        .collect()
}

/// One `received` unit per donated computer
pub fn build_inventory_batch<R: Rng + ?Sized>(
    donation: &Donation,
    rng: &mut R,
) -> AppResult<Vec<NewInventoryItem>> {
    let count = usize::try_from(donation.quantity).unwrap_or(0);
    if count > MAX_BATCH_SIZE {
        return Err(AppError::BusinessRule(format!(
            "Donation {} lists {} computers, more than the {} a single batch can hold",
            donation.id, count, MAX_BATCH_SIZE
        )));
    }
    let computer_type = resolve_computer_type(donation.computer_type);
    let condition_received = resolve_condition(donation.condition_status);

    Ok(placeholder_serials(donation.id, count, rng)
        .into_iter()
        .map(|serial_number| NewInventoryItem {
            donation_id: donation.id,
            computer_type,
            condition_received,
            status: InventoryStatus::Received,
            serial_number,
        })
        .collect())
}

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
}

impl InventoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &InventoryQuery) -> AppResult<Vec<InventoryListEntry>> {
        self.repository.inventory.list(query.status).await
    }

    pub async fn get(&self, id: i64) -> AppResult<InventoryItem> {
        self.repository.inventory.get_by_id(id).await
    }

    /// Record refurbishment progress on a unit
    pub async fn refurbish(&self, id: i64, data: UpdateInventoryItem) -> AppResult<InventoryItem> {
        let status = match data.status.as_deref() {
            Some(raw) => {
                let requested: InventoryStatus = raw.parse().map_err(AppError::InvalidStatus)?;
                let current = self.repository.inventory.get_by_id(id).await?;
                transitions::inventory(current.status, requested)?;
                Some(requested)
            }
            None => None,
        };

        if let Some(serial) = &data.serial_number {
            if serial.trim().is_empty() {
                return Err(AppError::Validation("Serial number cannot be empty".to_string()));
            }
        }

        let item = self.repository.inventory.update(id, &data, status).await?;
        tracing::info!(item_id = item.id, status = %item.status, "Inventory unit updated");
        Ok(item)
    }
}
