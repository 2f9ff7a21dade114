use super::{SeaOrmStorage, write_error};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolHubError};
use crate::models::users::{
    entities::{User, UserRole, UserStatus},
    requests::CreateUserRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            student_code: Set(req.student_code),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建用户", e))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        self.find_user_by(Column::Username.eq(username)).await
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        self.find_user_by(Column::Email.eq(email)).await
    }

    /// 通过学号获取用户
    pub async fn get_user_by_student_code_impl(&self, student_code: &str) -> Result<Option<User>> {
        self.find_user_by(Column::StudentCode.eq(student_code)).await
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        self.find_user_by(
            Condition::any()
                .add(Column::Username.eq(identifier))
                .add(Column::Email.eq(identifier)),
        )
        .await
    }

    async fn find_user_by<F>(&self, filter: F) -> Result<Option<User>>
    where
        F: sea_orm::sea_query::IntoCondition,
    {
        let result = Users::find()
            .filter(filter)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 批量获取用户，按用户名排序
    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = Users::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Username)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 统计某角色的用户数量
    pub async fn count_users_by_role_impl(&self, role: UserRole) -> Result<u64> {
        let count = Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                SchoolHubError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    fn new_user(username: &str, code: Option<&str>) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password: "hash".to_string(),
            role: UserRole::Student,
            display_name: None,
            student_code: code.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl(new_user("alice", Some("S001")))
            .await
            .unwrap();

        let by_code = storage.get_user_by_student_code_impl("S001").await.unwrap();
        assert_eq!(by_code.map(|u| u.id), Some(user.id));

        let by_email = storage
            .get_user_by_username_or_email_impl("alice@school.test")
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.username), Some("alice".to_string()));

        assert_eq!(
            storage.count_users_by_role_impl(UserRole::Student).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let storage = memory_storage().await;
        storage.create_user_impl(new_user("bob", None)).await.unwrap();
        let err = storage
            .create_user_impl(new_user("bob", None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E202");
    }
}
