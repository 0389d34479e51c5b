//! School directory

use crate::{
    error::AppResult,
    models::{
        school::{School, SchoolPage, SchoolQuery},
        PageWindow,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct SchoolsService {
    repository: Repository,
}

impl SchoolsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &SchoolQuery) -> AppResult<SchoolPage> {
        let window = PageWindow::new(query.page, query.limit);
        let (schools, total) = self.repository.schools.list(query, window).await?;
        Ok(SchoolPage {
            schools,
            pagination: window.pagination(total),
        })
    }

    pub async fn get(&self, id: i64) -> AppResult<School> {
        self.repository.schools.get_by_id(id).await
    }
}
