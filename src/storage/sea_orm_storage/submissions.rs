//! 提交存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{Result, SchoolHubError};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{NewSubmission, SubmissionReview},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let model = ActiveModel {
            assessment_id: Set(req.assessment_id),
            student_id: Set(req.student_id),
            answers: Set(serde_json::to_string(&req.answers)?),
            score: Set(req.score),
            status: Set(SubmissionStatus::Submitted.to_string()),
            is_late: Set(req.is_late),
            submitted_at: Set(req.submitted_at.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建提交", e))?;

        Ok(result.into_submission())
    }

    /// 重新提交：覆盖作答、分数、迟交标记与提交时间
    ///
    /// 只覆盖尚未批改的提交，已批改或不存在时返回 None
    pub async fn replace_submission_impl(
        &self,
        id: i64,
        req: NewSubmission,
    ) -> Result<Option<Submission>> {
        let result = Submissions::update_many()
            .col_expr(
                Column::Answers,
                Expr::value(serde_json::to_string(&req.answers)?),
            )
            .col_expr(Column::Score, Expr::value(req.score))
            .col_expr(Column::IsLate, Expr::value(req.is_late))
            .col_expr(Column::SubmittedAt, Expr::value(req.submitted_at.timestamp()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(SubmissionStatus::Submitted.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| write_error("更新提交", e))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_submission_by_id_impl(id).await
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取学生对某测评的提交
    pub async fn get_submission_by_assessment_and_student_impl(
        &self,
        assessment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(
                Condition::all()
                    .add(Column::AssessmentId.eq(assessment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 统计测评的提交数量
    pub async fn count_submissions_by_assessment_impl(&self, assessment_id: i64) -> Result<i64> {
        let count = Submissions::find()
            .filter(Column::AssessmentId.eq(assessment_id))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计提交数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 若干测评的全部提交，按提交时间升序
    pub async fn list_submissions_by_assessments_impl(
        &self,
        assessment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        if assessment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = Submissions::find()
            .filter(Column::AssessmentId.is_in(assessment_ids.iter().copied()))
            .order_by_asc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 学生的全部提交，最新在前
    pub async fn list_submissions_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        let items = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 批改提交
    pub async fn review_submission_impl(
        &self,
        id: i64,
        review: SubmissionReview,
    ) -> Result<Option<Submission>> {
        if self.get_submission_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            answers: Set(serde_json::to_string(&review.answers)?),
            score: Set(review.score),
            status: Set(SubmissionStatus::Reviewed.to_string()),
            feedback: Set(review.feedback),
            reviewed_by: Set(Some(review.reviewed_by)),
            reviewed_at: Set(Some(review.reviewed_at.timestamp())),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("批改提交", e))?;

        Ok(Some(result.into_submission()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::models::assessments::{
        entities::{AssessmentKind, Difficulty, Question},
        requests::NewAssessment,
    };
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::submissions::{
        entities::{AnswerRecord, SubmissionStatus},
        requests::{NewSubmission, SubmissionReview},
    };
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support::memory_storage};

    async fn seed(storage: &SeaOrmStorage) -> (i64, i64, i64) {
        let mut ids = Vec::new();
        for (name, role) in [("teacher", UserRole::Teacher), ("stu", UserRole::Student)] {
            let user = storage
                .create_user_impl(CreateUserRequest {
                    username: name.into(),
                    email: format!("{name}@school.test"),
                    password: "hash".into(),
                    role,
                    display_name: None,
                    student_code: None,
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let class = storage
            .create_class_impl(CreateClassRequest {
                teacher_id: Some(ids[0]),
                name: "9C".into(),
                description: None,
            })
            .await
            .unwrap();
        let assessment = storage
            .create_assessment_impl(NewAssessment {
                kind: AssessmentKind::Assignment,
                name: "Essay".into(),
                subject: "english".into(),
                code: "HW1234".into(),
                class_id: class.id,
                created_by: ids[0],
                due_at: Utc::now() + Duration::days(1),
                questions: vec![Question {
                    number: 1,
                    text: "Pick one".into(),
                    options: vec!["A".into(), "B".into()],
                    correct_option: 0,
                    difficulty: Difficulty::Hard,
                }],
            })
            .await
            .unwrap();
        (ids[0], ids[1], assessment.id)
    }

    fn answer(selected: i32, rate: f64) -> Vec<AnswerRecord> {
        vec![AnswerRecord {
            question_number: 1,
            selected_option: Some(selected),
            rate,
        }]
    }

    #[tokio::test]
    async fn test_submission_lifecycle() {
        let storage = memory_storage().await;
        let (teacher, student, assessment_id) = seed(&storage).await;

        let created = storage
            .create_submission_impl(NewSubmission {
                assessment_id,
                student_id: student,
                answers: answer(1, 0.0),
                score: 0.0,
                is_late: false,
                submitted_at: Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(created.status, SubmissionStatus::Submitted);

        // 每个学生每个测评只有一条提交
        let dup = storage
            .create_submission_impl(NewSubmission {
                assessment_id,
                student_id: student,
                answers: answer(0, 1.0),
                score: 100.0,
                is_late: false,
                submitted_at: Utc::now(),
            })
            .await;
        assert_eq!(dup.unwrap_err().code(), "E202");

        let replaced = storage
            .replace_submission_impl(
                created.id,
                NewSubmission {
                    assessment_id,
                    student_id: student,
                    answers: answer(0, 1.0),
                    score: 100.0,
                    is_late: true,
                    submitted_at: Utc::now(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.score, 100.0);
        assert!(replaced.is_late);
        assert_eq!(replaced.answers[0].selected_option, Some(0));

        let reviewed = storage
            .review_submission_impl(
                created.id,
                SubmissionReview {
                    answers: answer(0, 0.5),
                    score: 50.0,
                    feedback: Some("show your work".into()),
                    reviewed_by: teacher,
                    reviewed_at: Utc::now(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reviewed.is_reviewed());
        assert_eq!(reviewed.reviewed_by, Some(teacher));
        assert_eq!(reviewed.score, 50.0);

        // 批改后的提交不会被重交覆盖
        let late_replace = storage
            .replace_submission_impl(
                created.id,
                NewSubmission {
                    assessment_id,
                    student_id: student,
                    answers: answer(1, 0.0),
                    score: 0.0,
                    is_late: true,
                    submitted_at: Utc::now(),
                },
            )
            .await
            .unwrap();
        assert!(late_replace.is_none());
        let kept = storage.get_submission_by_id_impl(created.id).await.unwrap().unwrap();
        assert_eq!(kept.score, 50.0);
        assert_eq!(kept.answers[0].rate, 0.5);
        assert!(kept.is_reviewed());

        assert_eq!(
            storage
                .count_submissions_by_assessment_impl(assessment_id)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            storage
                .list_submissions_by_student_impl(student)
                .await
                .unwrap()
                .len(),
            1
        );

        // 删除测评时提交级联删除
        assert!(storage.delete_assessment_impl(assessment_id).await.unwrap());
        assert!(
            storage
                .get_submission_by_id_impl(created.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
