//! 班级成员存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::class_members::{ActiveModel, Column, Entity as ClassMembers};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::{ClassMember, ClassMemberRole},
        responses::{ClassMemberItem, ClassMemberListResponse},
    },
    users::entities::{User, UserBrief},
};
use crate::utils::contains_literal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 加入班级
    pub async fn join_class_impl(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassMemberRole,
    ) -> Result<ClassMember> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            joined_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("加入班级", e))?;

        Ok(result.into_class_member())
    }

    /// 离开班级
    pub async fn leave_class_impl(&self, user_id: i64, class_id: i64) -> Result<bool> {
        let result = ClassMembers::delete_many()
            .filter(
                Condition::all()
                    .add(Column::UserId.eq(user_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("离开班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 获取用户在班级中的信息
    pub async fn get_class_member_impl(
        &self,
        class_id: i64,
        user_id: i64,
    ) -> Result<Option<ClassMember>> {
        let result = ClassMembers::find()
            .filter(
                Condition::all()
                    .add(Column::UserId.eq(user_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(result.map(|m| m.into_class_member()))
    }

    /// 分页列出班级成员（含用户信息）
    pub async fn list_class_members_with_pagination_impl(
        &self,
        class_id: i64,
        page: u64,
        size: u64,
        search: Option<String>,
    ) -> Result<ClassMemberListResponse> {
        let page = page.max(1);
        let size = size.clamp(1, 100);

        let mut select = ClassMembers::find()
            .find_also_related(Users)
            .filter(Column::ClassId.eq(class_id));

        if let Some(ref search) = search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(contains_literal(UserColumn::Username, search))
                    .add(contains_literal(UserColumn::DisplayName, search))
                    .add(contains_literal(UserColumn::StudentCode, search)),
            );
        }

        let paginator = select
            .order_by_desc(Column::Role)
            .order_by_asc(Column::JoinedAt)
            .paginate(&self.db, size);

        let total = paginator.num_items().await.map_err(|e| {
            SchoolHubError::database_operation(format!("查询班级成员总数失败: {e}"))
        })?;

        let rows = paginator.fetch_page(page - 1).await.map_err(|e| {
            SchoolHubError::database_operation(format!("查询班级成员列表失败: {e}"))
        })?;

        let items = rows
            .into_iter()
            .filter_map(|(member, user)| {
                let user = user?.into_user();
                let member = member.into_class_member();
                Some(ClassMemberItem {
                    user: UserBrief::from(&user),
                    role: member.role,
                    joined_at: member.joined_at,
                })
            })
            .collect();

        Ok(ClassMemberListResponse {
            items,
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 班级全部学生，按学号、用户名排序
    pub async fn list_class_students_impl(&self, class_id: i64) -> Result<Vec<User>> {
        let users = Users::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::users::Relation::ClassMembers.def(),
            )
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Role.eq(ClassMemberRole::Student.to_string()))
            .order_by_asc(UserColumn::StudentCode)
            .order_by_asc(UserColumn::Username)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 班级学生人数
    pub async fn count_class_students_impl(&self, class_id: i64) -> Result<i64> {
        let count = ClassMembers::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Role.eq(ClassMemberRole::Student.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| {
                SchoolHubError::database_operation(format!("查询班级学生数量失败: {e}"))
            })?;

        Ok(count as i64)
    }
}
