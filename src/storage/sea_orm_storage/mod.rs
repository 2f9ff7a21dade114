//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assessments;
mod class_members;
mod classes;
mod submissions;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{Result, SchoolHubError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(database: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, database).await?
        } else {
            Self::connect_generic(&db_url, database).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, database: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        // 内存库只能使用单连接，否则每个连接各自一份数据
        let in_memory = url.contains(":memory:");

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(if in_memory {
                SqliteJournalMode::Memory
            } else {
                SqliteJournalMode::Wal
            })
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let max_connections = if in_memory { 1 } else { database.pool_size };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(database.timeout))
            .idle_timeout(if in_memory {
                None
            } else {
                Some(Duration::from_secs(300))
            })
            .max_lifetime(if in_memory {
                None
            } else {
                Some(Duration::from_secs(1800))
            })
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, database: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(database.timeout))
            .acquire_timeout(Duration::from_secs(database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写入错误：唯一约束冲突映射为 Conflict，其余为数据库操作错误
pub(crate) fn write_error(action: &str, err: DbErr) -> SchoolHubError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            SchoolHubError::conflict(format!("{action}失败: 记录已存在 ({detail})"))
        }
        _ => SchoolHubError::database_operation(format!("{action}失败: {err}")),
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_student_code(&self, student_code: &str) -> Result<Option<User>> {
        self.get_user_by_student_code_impl(student_code).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn count_users_by_role(&self, role: UserRole) -> Result<u64> {
        self.count_users_by_role_impl(role).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_name(&self, name: &str) -> Result<Option<Class>> {
        self.get_class_by_name_impl(name).await
    }

    async fn get_class_by_code(&self, invite_code: &str) -> Result<Option<Class>> {
        self.get_class_by_code_impl(invite_code).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn list_class_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>> {
        self.list_class_ids_for_user_impl(user_id).await
    }

    async fn list_student_class_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        self.list_student_class_ids_impl(user_id).await
    }

    // 班级成员模块
    async fn join_class(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassMemberRole,
    ) -> Result<ClassMember> {
        self.join_class_impl(user_id, class_id, role).await
    }

    async fn leave_class(&self, user_id: i64, class_id: i64) -> Result<bool> {
        self.leave_class_impl(user_id, class_id).await
    }

    async fn get_class_member(&self, class_id: i64, user_id: i64) -> Result<Option<ClassMember>> {
        self.get_class_member_impl(class_id, user_id).await
    }

    async fn list_class_members_with_pagination(
        &self,
        class_id: i64,
        page: u64,
        size: u64,
        search: Option<String>,
    ) -> Result<ClassMemberListResponse> {
        self.list_class_members_with_pagination_impl(class_id, page, size, search)
            .await
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<User>> {
        self.list_class_students_impl(class_id).await
    }

    async fn count_class_students(&self, class_id: i64) -> Result<i64> {
        self.count_class_students_impl(class_id).await
    }

    // 测评模块
    async fn create_assessment(&self, assessment: NewAssessment) -> Result<Assessment> {
        self.create_assessment_impl(assessment).await
    }

    async fn get_assessment_by_id(&self, id: i64) -> Result<Option<Assessment>> {
        self.get_assessment_by_id_impl(id).await
    }

    async fn get_assessment_by_code(&self, code: &str) -> Result<Option<Assessment>> {
        self.get_assessment_by_code_impl(code).await
    }

    async fn list_questions(&self, assessment_id: i64) -> Result<Vec<Question>> {
        self.list_questions_impl(assessment_id).await
    }

    async fn list_assessments_with_pagination(
        &self,
        query: AssessmentListQuery,
    ) -> Result<AssessmentPage> {
        self.list_assessments_with_pagination_impl(query).await
    }

    async fn list_assessments_by_classes(&self, class_ids: &[i64]) -> Result<Vec<Assessment>> {
        self.list_assessments_by_classes_impl(class_ids).await
    }

    async fn list_assessments_by_creator(&self, user_id: i64) -> Result<Vec<Assessment>> {
        self.list_assessments_by_creator_impl(user_id).await
    }

    async fn update_assessment(
        &self,
        id: i64,
        changes: AssessmentChanges,
    ) -> Result<Option<Assessment>> {
        self.update_assessment_impl(id, changes).await
    }

    async fn delete_assessment(&self, id: i64) -> Result<bool> {
        self.delete_assessment_impl(id).await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn replace_submission(
        &self,
        id: i64,
        submission: NewSubmission,
    ) -> Result<Option<Submission>> {
        self.replace_submission_impl(id, submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_by_assessment_and_student(
        &self,
        assessment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_assessment_and_student_impl(assessment_id, student_id)
            .await
    }

    async fn count_submissions_by_assessment(&self, assessment_id: i64) -> Result<i64> {
        self.count_submissions_by_assessment_impl(assessment_id)
            .await
    }

    async fn list_submissions_by_assessments(
        &self,
        assessment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        self.list_submissions_by_assessments_impl(assessment_ids)
            .await
    }

    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<Submission>> {
        self.list_submissions_by_student_impl(student_id).await
    }

    async fn review_submission(
        &self,
        id: i64,
        review: SubmissionReview,
    ) -> Result<Option<Submission>> {
        self.review_submission_impl(id, review).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("schoolhub.db").unwrap(),
            "sqlite://schoolhub.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u@h/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }
}
