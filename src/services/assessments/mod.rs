pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::analytics::{SchoolCalendar, classify};
use crate::errors::Result;
use crate::models::assessments::entities::Assessment;
use crate::models::assessments::requests::{
    AssessmentListParams, CreateAssessmentRequest, UpdateAssessmentRequest,
};
use crate::models::assessments::responses::{AssessmentDetail, QuestionView};
use crate::models::users::entities::User;
use crate::services::access::ClassAccess;
use crate::storage::Storage;

pub struct AssessmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssessmentService {
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

    // 创建作业 / 测验
    pub async fn create_assessment(
        &self,
        request: &HttpRequest,
        create_data: CreateAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assessment(self, request, create_data).await
    }

    // 分页列出测评
    pub async fn list_assessments(
        &self,
        request: &HttpRequest,
        query: AssessmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assessments(self, request, query).await
    }

    pub async fn get_assessment(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assessment(self, request, assessment_id).await
    }

    // 通过分享码查找
    pub async fn get_assessment_by_code(
        &self,
        request: &HttpRequest,
        code: String,
    ) -> ActixResult<HttpResponse> {
        detail::get_assessment_by_code(self, request, code).await
    }

    pub async fn update_assessment(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
        update_data: UpdateAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assessment(self, request, assessment_id, update_data).await
    }

    pub async fn delete_assessment(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assessment(self, request, assessment_id).await
    }
}

/// 组装详情：学生在提交被批改前看不到正确答案
pub(crate) async fn build_detail(
    storage: &Arc<dyn Storage>,
    calendar: &SchoolCalendar,
    user: &User,
    assessment: Assessment,
    access: ClassAccess,
) -> Result<AssessmentDetail> {
    let questions = storage.list_questions(assessment.id).await?;
    let due_date = calendar.date_of(assessment.due_at);

    let (reveal, status, submission_status) = if access == ClassAccess::Student {
        let submission = storage
            .get_submission_by_assessment_and_student(assessment.id, user.id)
            .await?;
        let status = classify(due_date, submission.is_some(), calendar.today());
        (
            submission.as_ref().is_some_and(|s| s.is_reviewed()),
            Some(status),
            submission.map(|s| s.status),
        )
    } else {
        (true, None, None)
    };

    Ok(AssessmentDetail {
        questions: questions
            .iter()
            .map(|q| QuestionView::from_question(q, reveal))
            .collect(),
        assessment,
        due_date,
        status,
        submission_status,
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use chrono::{Duration, Utc};
    use serde_json::{Value, json};

    use crate::models::assessments::entities::AssessmentKind;
    use crate::models::submissions::requests::NewSubmission;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;

    fn quiz_payload(class_id: i64) -> Value {
        json!({
            "kind": "quiz",
            "name": "Fractions check",
            "subject": "Math",
            "class_id": class_id,
            "due_at": (Utc::now() + Duration::days(3)).to_rfc3339(),
            "questions": [
                {"text": "1/2 + 1/2 = ?", "options": ["1", "2"], "correct_option": 0},
                {"text": "1/4 of 8?", "options": ["4", "2", "8"], "correct_option": 1, "difficulty": "hard"}
            ]
        })
    }

    #[actix_web::test]
    async fn test_create_and_view_assessment() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let outsider = test_support::user(&storage, "teacher2", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let stranger = test_support::user(&storage, "student2", UserRole::Student).await;
        let class = test_support::class_with_students(&storage, &teacher, "7A", &[&student]).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(crate::routes::configure_assessment_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/assessments")
            .insert_header(test_support::bearer(&teacher))
            .set_json(quiz_payload(class.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["id"].as_i64().unwrap();
        let code = body["data"]["code"].as_str().unwrap().to_string();
        assert!(code.starts_with("QZ-"));
        assert_eq!(body["data"]["question_count"], 2);
        assert_eq!(body["data"]["questions"][1]["correct_option"], 1);
        assert_eq!(body["data"]["questions"][0]["difficulty"], "medium");

        // 非任教教师不能在该班布置
        let req = test::TestRequest::post()
            .uri("/api/v1/assessments")
            .insert_header(test_support::bearer(&outsider))
            .set_json(quiz_payload(class.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 题目不合法
        let mut invalid = quiz_payload(class.id);
        invalid["questions"][0]["options"] = json!(["only one"]);
        let req = test::TestRequest::post()
            .uri("/api/v1/assessments")
            .insert_header(test_support::bearer(&teacher))
            .set_json(invalid)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 4001);

        // 学生看不到正确答案
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/assessments/{id}"))
            .insert_header(test_support::bearer(&student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["status"], "pending");
        assert!(body["data"]["questions"][0].get("correct_option").is_none());

        // 分享码大小写不敏感
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/assessments/code/{}", code.to_lowercase()))
            .insert_header(test_support::bearer(&student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/assessments/{id}"))
            .insert_header(test_support::bearer(&stranger))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_share_code_lookup_normalizes_input() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class_with_students(&storage, &teacher, "7A", &[&student]).await;
        let assessment = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Assignment, "Essay", "English", 3,
        )
        .await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(crate::routes::configure_assessment_routes),
        )
        .await;

        let lower = assessment.code.to_lowercase();
        for code in [lower.clone(), format!("%20{lower}%20")] {
            let req = test::TestRequest::get()
                .uri(&format!("/api/v1/assessments/code/{code}"))
                .insert_header(test_support::bearer(&student))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "code {code}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["data"]["id"], assessment.id);
        }

        let req = test::TestRequest::get()
            .uri("/api/v1/assessments/code/nope-0000")
            .insert_header(test_support::bearer(&student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 4000);
    }

    #[actix_web::test]
    async fn test_list_annotations_by_role() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let s1 = test_support::user(&storage, "student1", UserRole::Student).await;
        let s2 = test_support::user(&storage, "student2", UserRole::Student).await;
        let class = test_support::class_with_students(&storage, &teacher, "7A", &[&s1, &s2]).await;

        let done = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Assignment, "Essay", "English", 2,
        )
        .await;
        test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Quiz, "Old quiz", "Math", -3,
        )
        .await;
        storage
            .create_submission(NewSubmission {
                assessment_id: done.id,
                student_id: s1.id,
                answers: vec![],
                score: 50.0,
                is_late: false,
                submitted_at: Utc::now(),
            })
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(crate::routes::configure_assessment_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/assessments")
            .insert_header(test_support::bearer(&s1))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        // 按截止时间升序：先是已截止的测验
        assert_eq!(items[0]["status"], "overdue");
        assert_eq!(items[1]["status"], "completed");
        // 作业未批改，分数不公开
        assert!(items[1].get("score").is_none());

        let req = test::TestRequest::get()
            .uri("/api/v1/assessments?kind=assignment")
            .insert_header(test_support::bearer(&teacher))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["submitted_count"], 1);
        assert_eq!(items[0]["student_count"], 2);
        assert!(items[0].get("status").is_none());
    }

    #[actix_web::test]
    async fn test_questions_locked_after_submission() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let other = test_support::user(&storage, "teacher2", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class_with_students(&storage, &teacher, "7A", &[&student]).await;
        let assessment = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Quiz, "Quiz 1", "Math", 2,
        )
        .await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(crate::routes::configure_assessment_routes),
        )
        .await;
        let uri = format!("/api/v1/assessments/{}", assessment.id);
        let new_questions = json!({"questions": [
            {"text": "Only question", "options": ["a", "b"], "correct_option": 1}
        ]});

        // 非创建者不能修改
        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(test_support::bearer(&other))
            .set_json(json!({"name": "Hijacked"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(test_support::bearer(&teacher))
            .set_json(&new_questions)
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["question_count"], 1);

        storage
            .create_submission(NewSubmission {
                assessment_id: assessment.id,
                student_id: student.id,
                answers: vec![],
                score: 0.0,
                is_late: false,
                submitted_at: Utc::now(),
            })
            .await
            .unwrap();

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(test_support::bearer(&teacher))
            .set_json(&new_questions)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 4002);

        // 非题目字段仍可修改
        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(test_support::bearer(&teacher))
            .set_json(json!({"name": "  Quiz 1 (revised) "}))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["name"], "Quiz 1 (revised)");

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(test_support::bearer(&teacher))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert!(storage.get_submission_by_assessment_and_student(assessment.id, student.id).await.unwrap().is_none());
    }
}
