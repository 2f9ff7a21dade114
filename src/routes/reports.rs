use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::ReportService;
use crate::utils::SafeIDI64;

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn assessment_report(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.assessment_report(&req, path.0).await
}

pub async fn class_report(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.class_report(&req, path.0).await
}

pub async fn student_report(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.student_report(&req, path.0).await
}

// 配置路由，权限全部在业务层检查
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .route("/assessments/{id}", web::get().to(assessment_report))
            .route("/classes/{id}", web::get().to(class_report))
            .route("/students/{id}", web::get().to(student_report)),
    );
}
