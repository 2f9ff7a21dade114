use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::classes::requests::ClassMemberParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, load_class, require_class_manager, storage_error};
use crate::services::respond_on_err;

pub async fn list_members(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    query: ClassMemberParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let class = respond_on_err!(load_class(&storage, class_id).await);
    respond_on_err!(require_class_manager(&storage, &user, &class).await);

    let (page, size) = query.pagination.normalized();
    let search = query.search.filter(|s| !s.trim().is_empty());

    match storage
        .list_class_members_with_pagination(class.id, page, size, search)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class members retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}

pub async fn remove_member(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    member_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = respond_on_err!(current_user(request));
    let class = respond_on_err!(load_class(&storage, class_id).await);
    respond_on_err!(require_class_manager(&storage, &user, &class).await);

    if member_id == class.teacher_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "The class teacher cannot be removed",
        )));
    }

    match storage.leave_class(member_id, class.id).await {
        Ok(true) => {
            info!("User {} removed from class {} by {}", member_id, class.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Member removed")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassMemberNotFound,
            "Class member not found",
        ))),
        Err(e) => Ok(storage_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use crate::models::users::entities::UserRole;
    use crate::services::test_support;

    #[actix_web::test]
    async fn test_class_lifecycle() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let other = test_support::user(&storage, "teacher2", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(crate::routes::configure_classes_routes),
        )
        .await;

        // 教师建班
        let req = test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(test_support::bearer(&teacher))
            .set_json(json!({"name": "  Grade 7A ", "description": "Morning class"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let class_id = body["data"]["id"].as_i64().unwrap();
        let invite = body["data"]["invite_code"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["name"], "Grade 7A");

        // 同名班级冲突
        let req = test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(test_support::bearer(&other))
            .set_json(json!({"name": "Grade 7A"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // 学生不能建班
        let req = test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(test_support::bearer(&student))
            .set_json(json!({"name": "Rogue"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 学生凭邀请码加入，重复加入冲突
        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/api/v1/classes/join")
                .insert_header(test_support::bearer(&student))
                .set_json(json!({"invite_code": invite}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }

        // 学生可以看详情，无关教师不行
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/classes/{class_id}"))
            .insert_header(test_support::bearer(&student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["student_count"], 1);
        assert_eq!(body["data"]["teacher"]["username"], "teacher1");

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/classes/{class_id}"))
            .insert_header(test_support::bearer(&other))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 学生列表只包含自己的班级
        let req = test::TestRequest::get()
            .uri("/api/v1/classes")
            .insert_header(test_support::bearer(&student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["pagination"]["total"], 1);

        // 成员列表与移除
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/classes/{class_id}/members"))
            .insert_header(test_support::bearer(&teacher))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["pagination"]["total"], 2);

        let uri = format!("/api/v1/classes/{class_id}/members/{}", student.id);
        for expected in [StatusCode::OK, StatusCode::NOT_FOUND] {
            let req = test::TestRequest::delete()
                .uri(&uri)
                .insert_header(test_support::bearer(&teacher))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/classes/{class_id}/members/{}", teacher.id))
            .insert_header(test_support::bearer(&teacher))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
