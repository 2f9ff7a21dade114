use std::sync::Arc;

use crate::models::{
    assessments::{
        entities::{Assessment, Question},
        requests::{AssessmentChanges, AssessmentListQuery, NewAssessment},
        responses::AssessmentPage,
    },
    classes::{
        entities::{Class, ClassMember, ClassMemberRole},
        requests::{ClassListQuery, CreateClassRequest},
        responses::{ClassListResponse, ClassMemberListResponse},
    },
    submissions::{
        entities::Submission,
        requests::{NewSubmission, SubmissionReview},
    },
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过学号获取用户信息
    async fn get_user_by_student_code(&self, student_code: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 批量获取用户
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 统计某角色的用户数量
    async fn count_users_by_role(&self, role: UserRole) -> Result<u64>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 班级管理方法
    // 创建班级（teacher_id 必须已设置）
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 通过名称获取班级信息
    async fn get_class_by_name(&self, name: &str) -> Result<Option<Class>>;
    // 通过邀请码获取班级信息
    async fn get_class_by_code(&self, invite_code: &str) -> Result<Option<Class>>;
    // 列出班级
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    // 用户所在班级的 ID
    async fn list_class_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>>;
    // 用户以学生身份加入的班级 ID
    async fn list_student_class_ids(&self, user_id: i64) -> Result<Vec<i64>>;

    /// 班级成员管理方法
    // 加入班级
    async fn join_class(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassMemberRole,
    ) -> Result<ClassMember>;
    // 离开/移出班级
    async fn leave_class(&self, user_id: i64, class_id: i64) -> Result<bool>;
    // 获取用户在班级中的成员信息
    async fn get_class_member(&self, class_id: i64, user_id: i64) -> Result<Option<ClassMember>>;
    // 分页列出班级成员
    async fn list_class_members_with_pagination(
        &self,
        class_id: i64,
        page: u64,
        size: u64,
        search: Option<String>,
    ) -> Result<ClassMemberListResponse>;
    // 班级全部学生
    async fn list_class_students(&self, class_id: i64) -> Result<Vec<User>>;
    // 班级学生人数
    async fn count_class_students(&self, class_id: i64) -> Result<i64>;

    /// 作业 / 测验管理方法
    // 创建测评及题目
    async fn create_assessment(&self, assessment: NewAssessment) -> Result<Assessment>;
    // 通过ID获取测评
    async fn get_assessment_by_id(&self, id: i64) -> Result<Option<Assessment>>;
    // 通过分享码获取测评
    async fn get_assessment_by_code(&self, code: &str) -> Result<Option<Assessment>>;
    // 获取测评题目（按题号升序）
    async fn list_questions(&self, assessment_id: i64) -> Result<Vec<Question>>;
    // 分页列出测评
    async fn list_assessments_with_pagination(
        &self,
        query: AssessmentListQuery,
    ) -> Result<AssessmentPage>;
    // 列出若干班级的全部测评
    async fn list_assessments_by_classes(&self, class_ids: &[i64]) -> Result<Vec<Assessment>>;
    // 列出教师创建的全部测评
    async fn list_assessments_by_creator(&self, user_id: i64) -> Result<Vec<Assessment>>;
    // 更新测评（题目替换时一并更新题目数）
    async fn update_assessment(
        &self,
        id: i64,
        changes: AssessmentChanges,
    ) -> Result<Option<Assessment>>;
    // 删除测评
    async fn delete_assessment(&self, id: i64) -> Result<bool>;

    /// 提交管理方法
    // 创建提交
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    // 重新提交，覆盖作答与分数（仅限未批改；已批改时返回 None）
    async fn replace_submission(
        &self,
        id: i64,
        submission: NewSubmission,
    ) -> Result<Option<Submission>>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 获取学生对某测评的提交
    async fn get_submission_by_assessment_and_student(
        &self,
        assessment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 统计测评的提交数量
    async fn count_submissions_by_assessment(&self, assessment_id: i64) -> Result<i64>;
    // 列出若干测评的全部提交
    async fn list_submissions_by_assessments(
        &self,
        assessment_ids: &[i64],
    ) -> Result<Vec<Submission>>;
    // 列出学生的全部提交
    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<Submission>>;
    // 批改提交
    async fn review_submission(
        &self,
        id: i64,
        review: SubmissionReview,
    ) -> Result<Option<Submission>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
