use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::ReviewSubmissionRequest;
use crate::models::users::entities::UserRole;
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 我的提交
pub async fn list_my_submissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_mine(&req).await
}

// 获取提交详情
pub async fn get_submission(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(&req, path.0).await
}

// 批改
pub async fn review_submission(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<ReviewSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .review(&req, path.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            // 需在 /{id} 之前注册
            .service(web::resource("/mine").route(web::get().to(list_my_submissions)))
            .service(web::resource("/{id}").route(web::get().to(get_submission)))
            .service(
                web::resource("/{id}/review").route(
                    web::put()
                        .to(review_submission)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            ),
    );
}
