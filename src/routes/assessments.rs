use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assessments::requests::{
    AssessmentListParams, CreateAssessmentRequest, UpdateAssessmentRequest,
};
use crate::models::submissions::requests::SubmitAnswersRequest;
use crate::models::users::entities::UserRole;
use crate::services::{AssessmentService, SubmissionService};
use crate::utils::SafeIDI64;

// 懒加载的全局实例
static ASSESSMENT_SERVICE: Lazy<AssessmentService> = Lazy::new(AssessmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 列出作业 / 测验
pub async fn list_assessments(
    req: HttpRequest,
    query: web::Query<AssessmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .list_assessments(&req, query.into_inner())
        .await
}

// 创建作业 / 测验
pub async fn create_assessment(
    req: HttpRequest,
    body: web::Json<CreateAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .create_assessment(&req, body.into_inner())
        .await
}

pub async fn get_assessment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE.get_assessment(&req, path.0).await
}

// 通过分享码查找
pub async fn get_assessment_by_code(
    req: HttpRequest,
    code: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .get_assessment_by_code(&req, code.into_inner())
        .await
}

pub async fn update_assessment(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .update_assessment(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_assessment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE.delete_assessment(&req, path.0).await
}

// 开始作答：题目不含答案
pub async fn get_attempt(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_attempt(&req, path.0).await
}

pub async fn submit_answers(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<SubmitAnswersRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit(&req, path.0, body.into_inner())
        .await
}

pub async fn list_submissions(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_for_assessment(&req, path.0).await
}

// 配置路由
pub fn configure_assessment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assessments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列表按角色过滤
                    .route(web::get().to(list_assessments))
                    // 创建 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(create_assessment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(web::resource("/code/{code}").route(web::get().to(get_assessment_by_code)))
            .service(
                web::resource("/{id}")
                    // 详情 - 业务层验证班级成员资格
                    .route(web::get().to(get_assessment))
                    .route(
                        web::put()
                            .to(update_assessment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_assessment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/attempt").route(
                    web::get()
                        .to(get_attempt)
                        .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                ),
            )
            .service(
                web::resource("/{id}/submissions")
                    // 提交列表 - 班级教师或管理员，业务层检查
                    .route(web::get().to(list_submissions))
                    .route(
                        web::post()
                            .to(submit_answers)
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                    ),
            ),
    );
}
