//! 请求级的身份与班级权限辅助函数
//!
//! 失败时直接给出可返回的 `HttpResponse`，配合 `respond_on_err!` 使用。

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::errors::SchoolHubError;
use crate::middlewares::RequireJWT;
use crate::models::assessments::entities::Assessment;
use crate::models::classes::entities::{Class, ClassMemberRole};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub(crate) fn storage_error(err: SchoolHubError) -> HttpResponse {
    ApiResponse::from_error(&err)
}

/// 当前登录用户
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

pub(crate) async fn load_class(
    storage: &Arc<dyn Storage>,
    class_id: i64,
) -> Result<Class, HttpResponse> {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => Ok(class),
        Ok(None) => Err(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::ClassNotFound, "Class not found"))),
        Err(e) => Err(storage_error(e)),
    }
}

pub(crate) async fn load_assessment(
    storage: &Arc<dyn Storage>,
    assessment_id: i64,
) -> Result<Assessment, HttpResponse> {
    match storage.get_assessment_by_id(assessment_id).await {
        Ok(Some(assessment)) => Ok(assessment),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssessmentNotFound,
            "Assessment not found",
        ))),
        Err(e) => Err(storage_error(e)),
    }
}

pub(crate) async fn load_submission(
    storage: &Arc<dyn Storage>,
    submission_id: i64,
) -> Result<Submission, HttpResponse> {
    match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => Ok(submission),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))),
        Err(e) => Err(storage_error(e)),
    }
}

/// 班级内的身份
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClassAccess {
    /// 管理员、班主任或班级内的教师成员
    Manager,
    Student,
    None,
}

impl ClassAccess {
    pub(crate) fn can_view(self) -> bool {
        self != ClassAccess::None
    }
}

pub(crate) async fn class_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    class: &Class,
) -> Result<ClassAccess, SchoolHubError> {
    if user.is_admin() || class.teacher_id == user.id {
        return Ok(ClassAccess::Manager);
    }
    let access = match storage.get_class_member(class.id, user.id).await? {
        Some(member) => match member.role {
            ClassMemberRole::Teacher if user.role != UserRole::Student => ClassAccess::Manager,
            ClassMemberRole::Teacher => ClassAccess::None,
            ClassMemberRole::Student => ClassAccess::Student,
        },
        None => ClassAccess::None,
    };
    Ok(access)
}

fn class_forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::ClassPermissionDenied,
        message,
    ))
}

/// 要求当前用户能管理该班级
pub(crate) async fn require_class_manager(
    storage: &Arc<dyn Storage>,
    user: &User,
    class: &Class,
) -> Result<(), HttpResponse> {
    match class_access(storage, user, class).await {
        Ok(ClassAccess::Manager) => Ok(()),
        Ok(_) => Err(class_forbidden("You do not manage this class")),
        Err(e) => Err(storage_error(e)),
    }
}

/// 要求当前用户是该班级学生
pub(crate) async fn require_class_student(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_class_member(class_id, user.id).await {
        Ok(Some(member)) if member.role == ClassMemberRole::Student => Ok(()),
        Ok(_) => Err(class_forbidden("You are not a student of this class")),
        Err(e) => Err(storage_error(e)),
    }
}

/// 要求当前用户能查看该班级
pub(crate) async fn require_class_viewer(
    storage: &Arc<dyn Storage>,
    user: &User,
    class: &Class,
) -> Result<ClassAccess, HttpResponse> {
    match class_access(storage, user, class).await {
        Ok(access) if access.can_view() => Ok(access),
        Ok(_) => Err(class_forbidden("You are not a member of this class")),
        Err(e) => Err(storage_error(e)),
    }
}

/// 测评由创建者或管理员维护
pub(crate) fn require_assessment_owner(
    user: &User,
    assessment: &Assessment,
) -> Result<(), HttpResponse> {
    if user.is_admin() || assessment.created_by == user.id {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the creator can modify this assessment",
        )))
    }
}
