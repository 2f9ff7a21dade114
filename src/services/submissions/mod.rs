pub mod attempt;
pub mod detail;
pub mod list;
pub mod mine;
pub mod review;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::analytics::SchoolCalendar;
use crate::models::submissions::requests::{ReviewSubmissionRequest, SubmitAnswersRequest};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    // 学生作答页：题目（不含答案）与当前状态
    pub async fn get_attempt(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
    ) -> ActixResult<HttpResponse> {
        attempt::get_attempt(self, request, assessment_id).await
    }

    // 提交答案并自动评分
    pub async fn submit(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
        submit_data: SubmitAnswersRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_answers(self, request, assessment_id, submit_data).await
    }

    // 某测评的全部提交（教师）
    pub async fn list_for_assessment(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_for_assessment(self, request, assessment_id).await
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, submission_id).await
    }

    // 批改
    pub async fn review(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        review_data: ReviewSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        review::review_submission(self, request, submission_id, review_data).await
    }

    // 当前学生的全部提交
    pub async fn list_mine(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::list_mine(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use crate::models::assessments::entities::AssessmentKind;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support;

    macro_rules! app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($storage.clone()))
                    .configure(crate::routes::configure_assessment_routes)
                    .configure(crate::routes::configure_submission_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_quiz_attempt_submit_and_review() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let peer = test_support::user(&storage, "student2", UserRole::Student).await;
        let class =
            test_support::class_with_students(&storage, &teacher, "7A", &[&student, &peer]).await;
        let quiz = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Quiz, "Quiz 1", "Math", 2,
        )
        .await;
        let app = app!(storage);
        let base = format!("/api/v1/assessments/{}", quiz.id);

        let req = test::TestRequest::get()
            .uri(&format!("{base}/attempt"))
            .insert_header(test_support::bearer(&student))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["can_submit"], true);
        assert_eq!(body["data"]["status"], "pending");
        assert!(body["data"]["questions"][0].get("correct_option").is_none());

        // 第 1 题答对，第 2 题答错
        let req = test::TestRequest::post()
            .uri(&format!("{base}/submissions"))
            .insert_header(test_support::bearer(&student))
            .set_json(json!({"answers": {"1": 0, "2": 2}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        // 测验只能提交一次，分数直接公开，逐题得分率要等批改
        assert_eq!(body["data"]["submission"]["score"], 50.0);
        assert_eq!(body["data"]["answered_count"], 2);
        assert_eq!(body["data"]["question_count"], 2);
        assert!(body["data"].get("correct_count").is_none());
        assert!(body["data"]["submission"]["answers"][1]["rate"].is_null());
        assert_eq!(body["data"]["submission"]["is_late"], false);
        let submission_id = body["data"]["submission"]["id"].as_i64().unwrap();

        // 测验只能提交一次
        let req = test::TestRequest::post()
            .uri(&format!("{base}/submissions"))
            .insert_header(test_support::bearer(&student))
            .set_json(json!({"answers": {"1": 0, "2": 1}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 5003);

        let req = test::TestRequest::get()
            .uri(&format!("{base}/submissions"))
            .insert_header(test_support::bearer(&teacher))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["items"][0]["student"]["username"], "student1");

        // 同学之间不能互看提交
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/submissions/{submission_id}"))
            .insert_header(test_support::bearer(&peer))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/review"))
            .insert_header(test_support::bearer(&teacher))
            .set_json(json!({"rates": {"2": 1.5}}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/review"))
            .insert_header(test_support::bearer(&teacher))
            .set_json(json!({"rates": {"2": 0.5}, "feedback": " Good work "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["score"], 75.0);
        assert_eq!(body["data"]["status"], "reviewed");
        assert_eq!(body["data"]["feedback"], "Good work");

        // 批改后学生可以看到正确答案
        let req = test::TestRequest::get()
            .uri(&base)
            .insert_header(test_support::bearer(&student))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["questions"][1]["correct_option"], 1);
        assert_eq!(body["data"]["submission_status"], "reviewed");

        let req = test::TestRequest::get()
            .uri("/api/v1/submissions/mine")
            .insert_header(test_support::bearer(&student))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["items"][0]["assessment_name"], "Quiz 1");
        assert_eq!(body["data"]["items"][0]["score"], 75.0);
        assert_eq!(body["data"]["items"][0]["answers"][1]["rate"], 0.5);
    }

    #[actix_web::test]
    async fn test_late_assignment_and_closed_quiz() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class_with_students(&storage, &teacher, "7A", &[&student]).await;
        let essay = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Assignment, "Essay", "English", -2,
        )
        .await;
        let closed = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Quiz, "Old quiz", "Math", -1,
        )
        .await;
        let app = app!(storage);
        let submit_uri = format!("/api/v1/assessments/{}/submissions", essay.id);

        let req = test::TestRequest::post()
            .uri(&submit_uri)
            .insert_header(test_support::bearer(&student))
            .set_json(json!({"answers": {"9": 0}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 5001);

        // 逾期提交被标记，批改前可以重交
        let req = test::TestRequest::post()
            .uri(&submit_uri)
            .insert_header(test_support::bearer(&student))
            .set_json(json!({"answers": {"1": 1}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["submission"]["is_late"], true);
        assert!(body["data"]["submission"]["score"].is_null());
        let submission_id = body["data"]["submission"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri(&submit_uri)
            .insert_header(test_support::bearer(&student))
            .set_json(json!({"answers": {"1": 0, "2": 1}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["submission"]["id"], submission_id);
        assert!(body["data"]["submission"]["score"].is_null());

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/review"))
            .insert_header(test_support::bearer(&teacher))
            .set_json(json!({}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri(&submit_uri)
            .insert_header(test_support::bearer(&student))
            .set_json(json!({"answers": {"1": 0}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 5004);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/assessments/{}/submissions", closed.id))
            .insert_header(test_support::bearer(&student))
            .set_json(json!({"answers": {"1": 0}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 5002);

        // 教师不能以学生身份提交
        let req = test::TestRequest::post()
            .uri(&submit_uri)
            .insert_header(test_support::bearer(&teacher))
            .set_json(json!({"answers": {"1": 0}}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_resubmission_does_not_reveal_correct_option() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;
        let class = test_support::class_with_students(&storage, &teacher, "7A", &[&student]).await;
        let essay = test_support::assessment(
            &storage, &class, &teacher, AssessmentKind::Assignment, "Essay", "English", 3,
        )
        .await;
        let app = app!(storage);
        let submit_uri = format!("/api/v1/assessments/{}/submissions", essay.id);

        // 逐个尝试第 2 题的选项，响应里既没有得分率也没有分数
        let mut submission_id = 0;
        for option in 0..3 {
            let req = test::TestRequest::post()
                .uri(&submit_uri)
                .insert_header(test_support::bearer(&student))
                .set_json(json!({"answers": {"2": option}}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
            let body: Value = test::read_body_json(resp).await;
            let submission = &body["data"]["submission"];
            assert_eq!(submission["status"], "submitted");
            assert!(submission["score"].is_null(), "option {option}");
            for answer in submission["answers"].as_array().unwrap() {
                assert!(answer["rate"].is_null(), "option {option}");
            }
            assert!(body["data"].get("correct_count").is_none());
            submission_id = submission["id"].as_i64().unwrap();
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/submissions/{submission_id}"))
            .insert_header(test_support::bearer(&student))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert!(body["data"]["score"].is_null());
        assert!(body["data"]["answers"][1]["rate"].is_null());
        assert!(body["data"].get("reviewed_by").is_none());

        let req = test::TestRequest::get()
            .uri("/api/v1/submissions/mine")
            .insert_header(test_support::bearer(&student))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        let item = &body["data"]["items"][0];
        assert!(item["score"].is_null());
        assert!(item["answers"][1]["rate"].is_null());

        // 教师仍能看到完整的自动评分
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/submissions/{submission_id}"))
            .insert_header(test_support::bearer(&teacher))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["answers"][1]["rate"], 0.0);
        assert_eq!(body["data"]["student"]["username"], "student1");

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/review"))
            .insert_header(test_support::bearer(&teacher))
            .set_json(json!({}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        // 批改后公开
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/submissions/{submission_id}"))
            .insert_header(test_support::bearer(&student))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["status"], "reviewed");
        assert_eq!(body["data"]["score"], 0.0);
        assert_eq!(body["data"]["answers"][1]["rate"], 0.0);
    }
}
