//! 班级存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::class_members::{Column as MemberColumn, Entity as ClassMembers};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::{Class, ClassMemberRole},
        requests::{ClassListQuery, CreateClassRequest},
        responses::ClassListResponse,
    },
};
use crate::utils::{contains_literal, random_code::generate_random_code};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();
        let invite_code = generate_random_code(8); // 自动生成邀请码

        // teacher_id 必须由服务层确保已设置
        let teacher_id = req.teacher_id.ok_or_else(|| {
            SchoolHubError::database_operation("teacher_id must be set before calling create_class")
        })?;

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(req.name),
            description: Set(req.description),
            invite_code: Set(invite_code),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建班级", e))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 通过名称获取班级
    pub async fn get_class_by_name_impl(&self, name: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 通过邀请码获取班级
    pub async fn get_class_by_code_impl(&self, invite_code: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::InviteCode.eq(invite_code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 用户所在班级的 ID
    pub async fn list_class_ids_for_user_impl(&self, user_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = ClassMembers::find()
            .select_only()
            .column(MemberColumn::ClassId)
            .filter(MemberColumn::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| {
                SchoolHubError::database_operation(format!("查询用户班级关联失败: {e}"))
            })?;

        Ok(ids)
    }

    /// 用户以学生身份加入的班级 ID
    pub async fn list_student_class_ids_impl(&self, user_id: i64) -> Result<Vec<i64>> {
        ClassMembers::find()
            .select_only()
            .column(MemberColumn::ClassId)
            .filter(MemberColumn::UserId.eq(user_id))
            .filter(MemberColumn::Role.eq(ClassMemberRole::Student.to_string()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生班级失败: {e}")))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Classes::find();

        // 成员筛选
        if let Some(member_id) = query.member_id {
            let class_ids = self.list_class_ids_for_user_impl(member_id).await?;
            if class_ids.is_empty() {
                return Ok(ClassListResponse {
                    items: vec![],
                    pagination: PaginationInfo::new(page as i64, size as i64, 0),
                });
            }
            select = select.filter(Column::Id.is_in(class_ids));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(contains_literal(Column::Name, search));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级总数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }
}
