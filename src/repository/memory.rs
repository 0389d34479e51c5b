//! In-memory `WorkflowStore` for service tests

use std::{collections::HashSet, sync::Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::WorkflowStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        donation::Donation,
        enums::{
            DonationComputerType, DonationCondition, DonationStatus, InventoryStatus,
            RequestComputerType, RequestStatus, SchoolLevel, SchoolStatus,
        },
        inventory::{FulfillmentOutcome, InventoryItem, NewInventoryItem},
        school::School,
        school_request::{SchoolRequest, SchoolRequestWithOwner},
    },
    services::transitions,
};

#[derive(Default)]
struct State {
    donations: Vec<Donation>,
    requests: Vec<SchoolRequestWithOwner>,
    inventory: Vec<InventoryItem>,
    schools: Vec<School>,
    batches: HashSet<i64>,
    next_id: i64,
    fail_status_writes: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_donation(
        &self,
        quantity: i32,
        computer_type: DonationComputerType,
        condition_status: DonationCondition,
    ) -> Donation {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let donation = Donation {
            id: state.next_id(),
            user_id: None,
            donor_name: "Jane Wanjiru".to_string(),
            organization: Some("Safari Tech Ltd".to_string()),
            email: "jane@safaritech.co.ke".to_string(),
            phone: "+254700000000".to_string(),
            address: "Westlands, Nairobi".to_string(),
            computer_type,
            quantity,
            condition_status,
            pickup_date: None,
            message: None,
            status: DonationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.donations.push(donation.clone());
        donation
    }

    pub fn add_request(&self, quantity: i32, status: RequestStatus, school_name: &str) -> SchoolRequest {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let request = SchoolRequest {
            id: state.next_id(),
            user_id: Uuid::new_v4(),
            school_id: None,
            school_name: school_name.to_string(),
            contact_person: "Head Teacher".to_string(),
            email: "head@school.ac.ke".to_string(),
            phone: "+254711111111".to_string(),
            location: "Kisumu".to_string(),
            computer_type: RequestComputerType::Any,
            quantity,
            justification: "Computer lab for 300 pupils".to_string(),
            status,
            created_at: now,
            updated_at: now,
        };
        state.requests.push(SchoolRequestWithOwner {
            request: request.clone(),
            owner_email: Some("owner@school.ac.ke".to_string()),
            owner_name: Some("Mary Achieng".to_string()),
        });
        request
    }

    pub fn add_school(&self, name: &str) -> School {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let school = School {
            id: state.next_id(),
            name: name.to_string(),
            contact_person: None,
            email: None,
            phone: None,
            address: None,
            location: Some("Kisumu".to_string()),
            school_type: SchoolLevel::Primary,
            student_count: Some(300),
            computers_received: 0,
            status: SchoolStatus::Active,
            created_at: now,
            updated_at: now,
        };
        state.schools.push(school.clone());
        school
    }

    /// Make every status write fail with a storage error
    pub fn fail_status_writes(&self) {
        self.state.lock().unwrap().fail_status_writes = true;
    }

    pub fn stored_donation(&self, id: i64) -> Option<Donation> {
        self.state.lock().unwrap().donations.iter().find(|d| d.id == id).cloned()
    }

    pub fn stored_request(&self, id: i64) -> Option<SchoolRequest> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.request.id == id)
            .map(|r| r.request.clone())
    }

    pub fn inventory_for(&self, donation_id: i64) -> Vec<InventoryItem> {
        self.state
            .lock()
            .unwrap()
            .inventory
            .iter()
            .filter(|i| i.donation_id == donation_id)
            .cloned()
            .collect()
    }

    pub fn inventory_for_item(&self, id: i64) -> Option<InventoryItem> {
        self.state.lock().unwrap().inventory.iter().find(|i| i.id == id).cloned()
    }

    pub fn school(&self, id: i64) -> Option<School> {
        self.state.lock().unwrap().schools.iter().find(|s| s.id == id).cloned()
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn donation(&self, id: i64) -> AppResult<Donation> {
        self.stored_donation(id)
            .ok_or_else(|| AppError::NotFound(format!("Donation {} not found", id)))
    }

    async fn set_donation_status(
        &self,
        id: i64,
        status: DonationStatus,
        pickup_date: Option<NaiveDate>,
    ) -> AppResult<Donation> {
        let mut state = self.state.lock().unwrap();
        if state.fail_status_writes {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let donation = state
            .donations
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Donation {} not found", id)))?;
        donation.status = status;
        if pickup_date.is_some() {
            donation.pickup_date = pickup_date;
        }
        donation.updated_at = Utc::now();
        Ok(donation.clone())
    }

    async fn insert_inventory_batch(&self, donation_id: i64, items: &[NewInventoryItem]) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        if !state.batches.insert(donation_id) {
            return Ok(0);
        }
        if state.inventory.iter().any(|i| i.donation_id == donation_id) {
            return Ok(0);
        }
        let now = Utc::now();
        for item in items {
            let id = state.next_id();
            state.inventory.push(InventoryItem {
                id,
                donation_id: item.donation_id,
                computer_type: item.computer_type,
                status: item.status,
                condition_received: item.condition_received,
                condition_after_refurbishment: None,
                refurbishment_notes: None,
                serial_number: item.serial_number.clone(),
                assigned_school_request_id: None,
                created_at: now,
                updated_at: now,
            });
        }
        Ok(items.len() as u64)
    }

    async fn request_with_owner(&self, id: i64) -> AppResult<SchoolRequestWithOwner> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.request.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("School request {} not found", id)))
    }

    async fn set_request_status(&self, id: i64, status: RequestStatus) -> AppResult<SchoolRequest> {
        let mut state = self.state.lock().unwrap();
        if state.fail_status_writes {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let entry = state
            .requests
            .iter_mut()
            .find(|r| r.request.id == id)
            .ok_or_else(|| AppError::NotFound(format!("School request {} not found", id)))?;
        entry.request.status = status;
        entry.request.updated_at = Utc::now();
        Ok(entry.request.clone())
    }

    async fn fulfill_request(&self, request_id: i64, item_ids: &[i64]) -> AppResult<FulfillmentOutcome> {
        let mut state = self.state.lock().unwrap();

        let request = state
            .requests
            .iter()
            .find(|r| r.request.id == request_id)
            .map(|r| r.request.clone())
            .ok_or_else(|| AppError::NotFound(format!("School request {} not found", request_id)))?;

        let missing: Vec<String> = item_ids
            .iter()
            .filter(|id| !state.inventory.iter().any(|i| i.id == **id))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::NotFound(format!(
                "Inventory item(s) not found: {}",
                missing.join(", ")
            )));
        }

        let now = Utc::now();
        let mut delivered = 0i64;
        for item in state
            .inventory
            .iter_mut()
            .filter(|i| item_ids.contains(&i.id) && i.assigned_school_request_id != Some(request_id))
        {
            item.status = InventoryStatus::Delivered;
            item.assigned_school_request_id = Some(request_id);
            item.updated_at = now;
            delivered += 1;
        }

        let assigned_count = state
            .inventory
            .iter()
            .filter(|i| i.assigned_school_request_id == Some(request_id))
            .count() as i64;
        let quantity = i64::from(request.quantity);
        let request_status =
            transitions::status_after_assignment(request.status, assigned_count, quantity);

        if let Some(entry) = state.requests.iter_mut().find(|r| r.request.id == request_id) {
            entry.request.status = request_status;
        }

        let school = match request.school_id {
            Some(id) => state.schools.iter_mut().find(|s| s.id == id),
            None => state
                .schools
                .iter_mut()
                .find(|s| s.name.eq_ignore_ascii_case(request.school_name.trim())),
        };
        let school_credited = match school {
            Some(school) => {
                school.computers_received += delivered as i32;
                true
            }
            None => false,
        };

        Ok(FulfillmentOutcome {
            delivered,
            assigned_count,
            quantity,
            request_status,
            school_credited,
        })
    }
}
