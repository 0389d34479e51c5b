//! School equipment requests

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        school_request::{
            CreateSchoolRequest, SchoolRequest, SchoolRequestPage, SchoolRequestQuery, SchoolRequestStats,
        },
        AuthUser, PageWindow,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct SchoolRequestsService {
    repository: Repository,
}

impl SchoolRequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, data: CreateSchoolRequest, caller: &AuthUser) -> AppResult<SchoolRequest> {
        data.validate()?;
        if !self.repository.users.ensure_profile(caller).await? {
            return Err(AppError::BadRequest(
                "No profile found for this account and the token carries no email".to_string(),
            ));
        }
        if let Some(school_id) = data.school_id {
            // Surface a bad directory link as 404 rather than a foreign key error
            self.repository.schools.get_by_id(school_id).await?;
        }
        let request = self.repository.school_requests.create(&data, caller.id).await?;
        tracing::info!(
            request_id = request.id,
            school = %request.school_name,
            quantity = request.quantity,
            "School request submitted"
        );
        Ok(request)
    }

    pub async fn list(&self, query: &SchoolRequestQuery) -> AppResult<SchoolRequestPage> {
        let window = PageWindow::new(query.page, query.limit);
        let (requests, total) = self.repository.school_requests.list(query, window).await?;
        Ok(SchoolRequestPage {
            requests,
            pagination: window.pagination(total),
        })
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<SchoolRequest>> {
        self.repository.school_requests.list_for_user(user_id).await
    }

    pub async fn get(&self, id: i64) -> AppResult<SchoolRequest> {
        self.repository.school_requests.get_by_id(id).await
    }

    pub async fn stats(&self) -> AppResult<SchoolRequestStats> {
        self.repository.school_requests.stats().await
    }
}
