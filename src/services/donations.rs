//! Donation intake and queries

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        donation::{CreateDonation, Donation, DonationPage, DonationQuery, DonationStats},
        AuthUser, PageWindow,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct DonationsService {
    repository: Repository,
}

impl DonationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record a new pledge as `pending`, owned by the caller when signed in
    pub async fn create(&self, data: CreateDonation, caller: Option<&AuthUser>) -> AppResult<Donation> {
        data.validate()?;

        let owner = match caller {
            Some(user) => {
                if self.repository.users.ensure_profile(user).await? {
                    Some(user.id)
                } else {
                    tracing::warn!(user_id = %user.id, "No profile for caller, donation stored without owner");
                    None
                }
            }
            None => None,
        };

        let donation = self.repository.donations.create(&data, owner).await?;
        tracing::info!(
            donation_id = donation.id,
            quantity = donation.quantity,
            computer_type = %donation.computer_type,
            "Donation submitted"
        );
        Ok(donation)
    }

    pub async fn list(&self, query: &DonationQuery) -> AppResult<DonationPage> {
        let window = PageWindow::new(query.page, query.limit);
        let (donations, total) = self.repository.donations.list(query, window).await?;
        Ok(DonationPage {
            donations,
            pagination: window.pagination(total),
        })
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Donation>> {
        self.repository.donations.list_for_user(user_id).await
    }

    pub async fn get(&self, id: i64) -> AppResult<Donation> {
        self.repository.donations.get_by_id(id).await
    }

    pub async fn stats(&self) -> AppResult<DonationStats> {
        self.repository.donations.stats().await
    }
}
