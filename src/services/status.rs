//! Status changes on donations and school requests, with their side effects

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{
        donation::Donation,
        enums::{DonationStatus, RequestStatus},
        school_request::SchoolRequest,
    },
    repository::WorkflowStore,
    services::{
        email::{Notification, Notifier},
        inventory::build_inventory_batch,
        transitions::{self, SideEffect},
    },
};

#[derive(Clone)]
pub struct StatusService {
    store: Arc<dyn WorkflowStore>,
    notifier: Arc<dyn Notifier>,
}

impl StatusService {
    pub fn new(store: Arc<dyn WorkflowStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Move a donation to `status`.
    ///
    /// Entering `collected` or `processing` generates the inventory batch
    /// first; a storage failure there aborts the call before the status is
    /// written, and retrying is safe since generation happens once per
    /// donation. Approval notifies the donor; delivery failures are logged
    /// only.
    pub async fn apply_donation_status(
        &self,
        id: i64,
        status: &str,
        collection_date: Option<NaiveDate>,
    ) -> AppResult<Donation> {
        let requested: DonationStatus = status.parse().map_err(AppError::InvalidStatus)?;
        let current = self.store.donation(id).await?;
        let plan = transitions::donation(current.status, requested)?;

        if plan.has(SideEffect::GenerateInventory) {
            let items = build_inventory_batch(&current, &mut rand::thread_rng())?;
            let inserted = self.store.insert_inventory_batch(id, &items).await?;
            if inserted > 0 {
                tracing::info!(donation_id = id, units = inserted, "Inventory generated");
            } else {
                tracing::debug!(donation_id = id, "Inventory already generated, skipping");
            }
        }

        let updated = self
            .store
            .set_donation_status(id, requested, collection_date)
            .await?;
        tracing::info!(
            donation_id = id,
            from = %current.status,
            to = %requested,
            "Donation status updated"
        );

        if plan.has(SideEffect::NotifyDonor) {
            let notification = Notification::donation_approved(&updated, collection_date);
            if let Err(e) = self.notifier.send(notification).await {
                tracing::warn!(donation_id = id, error = %e, "Donor notification failed");
            }
        }

        Ok(updated)
    }

    /// Move a school request to `status` and tell the school. `fulfilled` is
    /// refused here; it follows from assigning inventory.
    pub async fn apply_request_status(
        &self,
        id: i64,
        status: &str,
        admin_comment: Option<&str>,
    ) -> AppResult<SchoolRequest> {
        let requested: RequestStatus = status.parse().map_err(AppError::InvalidStatus)?;
        let current = self.store.request_with_owner(id).await?;
        let plan = transitions::school_request(current.request.status, requested)?;

        let updated = self.store.set_request_status(id, requested).await?;
        tracing::info!(
            request_id = id,
            from = %current.request.status,
            to = %requested,
            "School request status updated"
        );

        if plan.has(SideEffect::NotifyRequester) {
            match Notification::request_status_update(&current, requested, admin_comment) {
                Some(notification) => {
                    if let Err(e) = self.notifier.send(notification).await {
                        tracing::warn!(request_id = id, error = %e, "School notification failed");
                    }
                }
                None => tracing::warn!(request_id = id, "No address to notify for school request"),
            }
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::enums::{DonationComputerType, DonationCondition, InventoryComputerType, InventoryStatus, ReceivedCondition},
        repository::memory::MemoryStore,
        services::email::MockNotifier,
    };

    fn quiet_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_send().returning(|_| Ok(()));
        notifier
    }

    fn failing_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .returning(|_| Err(AppError::Notification("SMTP unreachable".to_string())));
        notifier
    }

    fn service(store: &Arc<MemoryStore>, notifier: MockNotifier) -> StatusService {
        StatusService::new(store.clone(), Arc::new(notifier))
    }

    #[tokio::test]
    async fn test_repeated_eligible_status_generates_one_batch() {
        let store = Arc::new(MemoryStore::new());
        let donation = store.add_donation(3, DonationComputerType::Laptop, DonationCondition::Working);
        let service = service(&store, quiet_notifier());

        service.apply_donation_status(donation.id, "processing", None).await.unwrap();
        service.apply_donation_status(donation.id, "processing", None).await.unwrap();

        assert_eq!(store.inventory_for(donation.id).len(), 3);
    }

    #[tokio::test]
    async fn test_collected_then_processing_keeps_single_batch() {
        let store = Arc::new(MemoryStore::new());
        let donation = store.add_donation(2, DonationComputerType::Desktop, DonationCondition::Working);
        let service = service(&store, quiet_notifier());

        service.apply_donation_status(donation.id, "collected", None).await.unwrap();
        service.apply_donation_status(donation.id, "processing", None).await.unwrap();

        assert_eq!(store.inventory_for(donation.id).len(), 2);
    }

    #[tokio::test]
    async fn test_batch_size_matches_quantity() {
        let store = Arc::new(MemoryStore::new());
        let donation = store.add_donation(6, DonationComputerType::Tablet, DonationCondition::NotWorking);
        let service = service(&store, quiet_notifier());

        service.apply_donation_status(donation.id, "collected", None).await.unwrap();

        let items = store.inventory_for(donation.id);
        assert_eq!(items.len(), 6);
        assert!(items.iter().all(|i| i.status == InventoryStatus::Received));
        assert!(items.iter().all(|i| i.assigned_school_request_id.is_none()));
    }

    #[tokio::test]
    async fn test_mixed_donation_resolves_type_and_condition() {
        let store = Arc::new(MemoryStore::new());
        let donation = store.add_donation(2, DonationComputerType::Mixed, DonationCondition::Mixed);
        let service = service(&store, quiet_notifier());

        service.apply_donation_status(donation.id, "processing", None).await.unwrap();

        for item in store.inventory_for(donation.id) {
            assert_eq!(item.computer_type, InventoryComputerType::Desktop);
            assert_eq!(item.condition_received, ReceivedCondition::NeedsRepair);
        }
    }

    #[tokio::test]
    async fn test_non_eligible_status_generates_nothing() {
        let store = Arc::new(MemoryStore::new());
        let donation = store.add_donation(4, DonationComputerType::Laptop, DonationCondition::Working);
        let service = service(&store, quiet_notifier());

        service.apply_donation_status(donation.id, "approved", None).await.unwrap();

        assert!(store.inventory_for(donation.id).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_status_leaves_donation_untouched() {
        let store = Arc::new(MemoryStore::new());
        let donation = store.add_donation(1, DonationComputerType::Laptop, DonationCondition::Working);
        let mut notifier = MockNotifier::new();
        notifier.expect_send().never();
        let service = service(&store, notifier);

        let err = service
            .apply_donation_status(donation.id, "archived", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidStatus(_)));
        let stored = store.stored_donation(donation.id).unwrap();
        assert_eq!(stored.status, DonationStatus::Pending);
        assert_eq!(stored.updated_at, donation.updated_at);
    }

    #[tokio::test]
    async fn test_oversized_donation_is_not_processed() {
        let store = Arc::new(MemoryStore::new());
        let donation = store.add_donation(50_000, DonationComputerType::Desktop, DonationCondition::Working);
        let service = service(&store, quiet_notifier());

        let err = service
            .apply_donation_status(donation.id, "processing", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BusinessRule(_)));
        assert!(store.inventory_for(donation.id).is_empty());
        assert_eq!(store.stored_donation(donation.id).unwrap().status, DonationStatus::Pending);
    }

    #[tokio::test]
    async fn test_missing_donation_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store, quiet_notifier());

        let err = service.apply_donation_status(999, "approved", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_backward_move_is_rejected_and_not_persisted() {
        let store = Arc::new(MemoryStore::new());
        let donation = store.add_donation(1, DonationComputerType::Laptop, DonationCondition::Working);
        let service = service(&store, quiet_notifier());

        service.apply_donation_status(donation.id, "processing", None).await.unwrap();
        let err = service
            .apply_donation_status(donation.id, "pending", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidTransition(_)));
        assert_eq!(
            store.stored_donation(donation.id).unwrap().status,
            DonationStatus::Processing
        );
    }

    #[tokio::test]
    async fn test_donor_notification_failure_keeps_status() {
        let store = Arc::new(MemoryStore::new());
        let donation = store.add_donation(2, DonationComputerType::Desktop, DonationCondition::Working);
        let service = service(&store, failing_notifier());

        let updated = service
            .apply_donation_status(donation.id, "approved", None)
            .await
            .unwrap();

        assert_eq!(updated.status, DonationStatus::Approved);
        assert_eq!(
            store.stored_donation(donation.id).unwrap().status,
            DonationStatus::Approved
        );
    }

    #[tokio::test]
    async fn test_approval_notifies_donor_with_collection_date() {
        let store = Arc::new(MemoryStore::new());
        let donation = store.add_donation(2, DonationComputerType::Desktop, DonationCondition::Working);
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .withf(|n| n.to == "jane@safaritech.co.ke" && n.body.contains("2 June 2025"))
            .times(1)
            .returning(|_| Ok(()));
        let service = service(&store, notifier);

        let updated = service
            .apply_donation_status(donation.id, "approved", Some(date))
            .await
            .unwrap();
        assert_eq!(updated.pickup_date, Some(date));
    }

    #[tokio::test]
    async fn test_request_notification_failure_keeps_status() {
        let store = Arc::new(MemoryStore::new());
        let request = store.add_request(5, RequestStatus::Pending, "Kisumu Day");
        let service = service(&store, failing_notifier());

        let updated = service
            .apply_request_status(request.id, "approved", Some("Welcome aboard"))
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::Approved);
        assert_eq!(
            store.stored_request(request.id).unwrap().status,
            RequestStatus::Approved
        );
    }

    #[tokio::test]
    async fn test_request_cannot_be_marked_fulfilled_directly() {
        let store = Arc::new(MemoryStore::new());
        let request = store.add_request(5, RequestStatus::Approved, "Kisumu Day");
        let mut notifier = MockNotifier::new();
        notifier.expect_send().never();
        let service = service(&store, notifier);

        let err = service
            .apply_request_status(request.id, "fulfilled", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BusinessRule(_)));
        assert_eq!(
            store.stored_request(request.id).unwrap().status,
            RequestStatus::Approved
        );
    }

    #[tokio::test]
    async fn test_storage_failure_is_fatal() {
        let store = Arc::new(MemoryStore::new());
        let request = store.add_request(5, RequestStatus::Pending, "Kisumu Day");
        store.fail_status_writes();
        let mut notifier = MockNotifier::new();
        notifier.expect_send().never();
        let service = service(&store, notifier);

        let err = service
            .apply_request_status(request.id, "approved", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
