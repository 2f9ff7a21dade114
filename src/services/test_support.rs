//! 服务层测试用的数据与请求构造

use std::sync::Arc;

use actix_web::http::header;
use chrono::{Duration, Utc};

use crate::models::assessments::entities::{Assessment, AssessmentKind, Difficulty, Question};
use crate::models::assessments::requests::NewAssessment;
use crate::models::classes::entities::{Class, ClassMemberRole};
use crate::models::classes::requests::CreateClassRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::test_support::memory_storage;
use crate::utils::jwt::JwtUtils;

pub async fn storage() -> Arc<dyn Storage> {
    Arc::new(memory_storage().await)
}

pub async fn user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password: "unused-hash".to_string(),
            role,
            display_name: None,
            student_code: None,
        })
        .await
        .unwrap()
}

pub fn bearer(user: &User) -> (header::HeaderName, String) {
    let token = JwtUtils::generate_access_token(user.id, &user.role.to_string()).unwrap();
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// 教师建班并把学生加入
pub async fn class_with_students(
    storage: &Arc<dyn Storage>,
    teacher: &User,
    name: &str,
    students: &[&User],
) -> Class {
    let class = storage
        .create_class(CreateClassRequest {
            teacher_id: Some(teacher.id),
            name: name.to_string(),
            description: None,
        })
        .await
        .unwrap();
    storage
        .join_class(teacher.id, class.id, ClassMemberRole::Teacher)
        .await
        .unwrap();
    for student in students {
        storage
            .join_class(student.id, class.id, ClassMemberRole::Student)
            .await
            .unwrap();
    }
    class
}

/// 两道题：第 1 题正确选项 0，第 2 题正确选项 1
pub fn two_questions() -> Vec<Question> {
    vec![
        Question {
            number: 1,
            text: "2 + 2 = ?".to_string(),
            options: vec!["4".to_string(), "5".to_string()],
            correct_option: 0,
            difficulty: Difficulty::Easy,
        },
        Question {
            number: 2,
            text: "Capital of France?".to_string(),
            options: vec!["Rome".to_string(), "Paris".to_string(), "Oslo".to_string()],
            correct_option: 1,
            difficulty: Difficulty::Hard,
        },
    ]
}

/// `due_in_days` 为负表示已截止
pub async fn assessment(
    storage: &Arc<dyn Storage>,
    class: &Class,
    teacher: &User,
    kind: AssessmentKind,
    name: &str,
    subject: &str,
    due_in_days: i64,
) -> Assessment {
    storage
        .create_assessment(NewAssessment {
            kind,
            name: name.to_string(),
            subject: subject.to_string(),
            code: crate::utils::random_code::generate_share_code("T", 8),
            class_id: class.id,
            created_by: teacher.id,
            due_at: Utc::now() + Duration::days(due_in_days),
            questions: two_questions(),
        })
        .await
        .unwrap()
}
