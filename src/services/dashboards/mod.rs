pub mod student;
pub mod teacher;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::analytics::SchoolCalendar;
use crate::config::{AppConfig, DashboardConfig};
use crate::storage::Storage;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &DashboardConfig {
        &AppConfig::get().dashboard
    }

    pub(crate) fn calendar(&self) -> SchoolCalendar {
        SchoolCalendar::from_offset_minutes(self.get_config().utc_offset_minutes)
    }

    // 学生看板
    pub async fn student_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::handle_student_dashboard(self, request).await
    }

    // 教师看板
    pub async fn teacher_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        teacher::handle_teacher_dashboard(self, request).await
    }
}
