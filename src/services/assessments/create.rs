use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssessmentService, build_detail};
use crate::errors::{Result, SchoolHubError};
use crate::models::assessments::entities::AssessmentKind;
use crate::models::assessments::requests::{CreateAssessmentRequest, NewAssessment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    ClassAccess, current_user, load_class, require_class_manager, storage_error,
};
use crate::services::respond_on_err;
use crate::storage::Storage;
use crate::utils::random_code::generate_share_code;
use crate::utils::validate::{validate_name, validate_questions};

const CODE_LEN: usize = 6;
const CODE_ATTEMPTS: usize = 5;

pub async fn create_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    create_data: CreateAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));

    let validated = validate_name("Name", &create_data.name).and_then(|name| {
        let subject = validate_name("Subject", &create_data.subject)?;
        let questions = validate_questions(&create_data.questions)?;
        Ok((name, subject, questions))
    });
    let (name, subject, questions) = match validated {
        Ok(values) => values,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::AssessmentInvalid, msg)));
        }
    };

    // 班级必须存在且由当前用户任教
    let class = respond_on_err!(load_class(&storage, create_data.class_id).await);
    respond_on_err!(require_class_manager(&storage, &user, &class).await);

    let code = match unique_code(&storage, create_data.kind).await {
        Ok(code) => code,
        Err(e) => return Ok(storage_error(e)),
    };

    let assessment = match storage
        .create_assessment(NewAssessment {
            kind: create_data.kind,
            name,
            subject,
            code,
            class_id: class.id,
            created_by: user.id,
            due_at: create_data.due_at,
            questions,
        })
        .await
    {
        Ok(assessment) => assessment,
        Err(e) => return Ok(storage_error(e)),
    };

    info!(
        "{} {} ({}) created in class {} by {}",
        assessment.kind, assessment.id, assessment.code, class.id, user.id
    );

    let calendar = service.calendar();
    match build_detail(&storage, &calendar, &user, assessment, ClassAccess::Manager).await {
        Ok(detail) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(detail, "Assessment created successfully"))),
        Err(e) => Ok(storage_error(e)),
    }
}

/// 作业以 HW 开头，测验以 QZ 开头
async fn unique_code(storage: &Arc<dyn Storage>, kind: AssessmentKind) -> Result<String> {
    let prefix = match kind {
        AssessmentKind::Assignment => "HW",
        AssessmentKind::Quiz => "QZ",
    };
    for _ in 0..CODE_ATTEMPTS {
        let code = generate_share_code(prefix, CODE_LEN);
        if storage.get_assessment_by_code(&code).await?.is_none() {
            return Ok(code);
        }
    }
    Err(SchoolHubError::conflict("Unable to allocate a unique assessment code"))
}
