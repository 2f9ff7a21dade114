pub mod assessment;
pub mod class;
pub mod student;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::analytics::SchoolCalendar;
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
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

    pub(crate) fn calendar(&self) -> SchoolCalendar {
        SchoolCalendar::from_config()
    }

    // 单个测评的成绩报表
    pub async fn assessment_report(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
    ) -> ActixResult<HttpResponse> {
        assessment::handle_assessment_report(self, request, assessment_id).await
    }

    // 班级报表
    pub async fn class_report(&self, request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        class::handle_class_report(self, request, class_id).await
    }

    // 学生个人报表
    pub async fn student_report(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        student::handle_student_report(self, request, student_id).await
    }
}
