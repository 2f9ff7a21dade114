//! 作业 / 测验存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::assessments::{ActiveModel, Column, Entity as Assessments};
use crate::entity::questions::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as Questions,
};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo,
    assessments::{
        entities::{Assessment, Question},
        requests::{AssessmentChanges, AssessmentListQuery, NewAssessment},
        responses::AssessmentPage,
    },
};
use crate::utils::contains_literal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建测评及其题目（同一事务）
    pub async fn create_assessment_impl(&self, req: NewAssessment) -> Result<Assessment> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            kind: Set(req.kind.to_string()),
            name: Set(req.name),
            subject: Set(req.subject),
            code: Set(req.code),
            class_id: Set(req.class_id),
            created_by: Set(req.created_by),
            due_at: Set(req.due_at.timestamp()),
            question_count: Set(req.questions.len() as i32),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| write_error("创建测评", e))?;

        insert_questions(&txn, inserted.id, &req.questions).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(inserted.into_assessment())
    }

    /// 通过 ID 获取测评
    pub async fn get_assessment_by_id_impl(&self, id: i64) -> Result<Option<Assessment>> {
        let result = Assessments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询测评失败: {e}")))?;

        Ok(result.map(|m| m.into_assessment()))
    }

    /// 通过分享码获取测评
    pub async fn get_assessment_by_code_impl(&self, code: &str) -> Result<Option<Assessment>> {
        let result = Assessments::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询测评失败: {e}")))?;

        Ok(result.map(|m| m.into_assessment()))
    }

    /// 获取测评题目
    pub async fn list_questions_impl(&self, assessment_id: i64) -> Result<Vec<Question>> {
        let questions = Questions::find()
            .filter(QuestionColumn::AssessmentId.eq(assessment_id))
            .order_by_asc(QuestionColumn::Number)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(questions.into_iter().map(|m| m.into_question()).collect())
    }

    /// 分页列出测评，按截止时间升序
    pub async fn list_assessments_with_pagination_impl(
        &self,
        query: AssessmentListQuery,
    ) -> Result<AssessmentPage> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Assessments::find();

        // 班级范围
        if let Some(class_ids) = query.class_ids {
            if class_ids.is_empty() {
                return Ok(AssessmentPage {
                    items: vec![],
                    pagination: PaginationInfo::new(page as i64, size as i64, 0),
                });
            }
            select = select.filter(Column::ClassId.is_in(class_ids));
        }

        if let Some(kind) = query.kind {
            select = select.filter(Column::Kind.eq(kind.to_string()));
        }

        if let Some(ref subject) = query.subject
            && !subject.trim().is_empty()
        {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(contains_literal(Column::Name, search))
                    .add(contains_literal(Column::Subject, search))
                    .add(contains_literal(Column::Code, search)),
            );
        }

        let paginator = select
            .order_by_asc(Column::DueAt)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询测评总数失败: {e}")))?;

        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询测评列表失败: {e}")))?;

        Ok(AssessmentPage {
            items: items.into_iter().map(|m| m.into_assessment()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 若干班级的全部测评
    pub async fn list_assessments_by_classes_impl(
        &self,
        class_ids: &[i64],
    ) -> Result<Vec<Assessment>> {
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = Assessments::find()
            .filter(Column::ClassId.is_in(class_ids.iter().copied()))
            .order_by_asc(Column::DueAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询测评列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_assessment()).collect())
    }

    /// 教师创建的全部测评
    pub async fn list_assessments_by_creator_impl(&self, user_id: i64) -> Result<Vec<Assessment>> {
        let items = Assessments::find()
            .filter(Column::CreatedBy.eq(user_id))
            .order_by_asc(Column::DueAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询测评列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_assessment()).collect())
    }

    /// 更新测评
    pub async fn update_assessment_impl(
        &self,
        id: i64,
        changes: AssessmentChanges,
    ) -> Result<Option<Assessment>> {
        // 先检查测评是否存在
        if self.get_assessment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = changes.name {
            model.name = Set(name);
        }

        if let Some(subject) = changes.subject {
            model.subject = Set(subject);
        }

        if let Some(due_at) = changes.due_at {
            model.due_at = Set(due_at.timestamp());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        if let Some(questions) = changes.questions {
            model.question_count = Set(questions.len() as i32);

            Questions::delete_many()
                .filter(QuestionColumn::AssessmentId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("删除题目失败: {e}")))?;

            insert_questions(&txn, id, &questions).await?;
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| write_error("更新测评", e))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_assessment()))
    }

    /// 删除测评（题目与提交级联删除）
    pub async fn delete_assessment_impl(&self, id: i64) -> Result<bool> {
        let result = Assessments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除测评失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

async fn insert_questions<C>(conn: &C, assessment_id: i64, questions: &[Question]) -> Result<()>
where
    C: ConnectionTrait,
{
    if questions.is_empty() {
        return Ok(());
    }

    let mut models = Vec::with_capacity(questions.len());
    for q in questions {
        models.push(QuestionActiveModel {
            assessment_id: Set(assessment_id),
            number: Set(q.number),
            text: Set(q.text.clone()),
            options: Set(serde_json::to_string(&q.options)?),
            correct_option: Set(q.correct_option),
            difficulty: Set(q.difficulty.to_string()),
            ..Default::default()
        });
    }

    Questions::insert_many(models)
        .exec(conn)
        .await
        .map_err(|e| write_error("写入题目", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::models::assessments::{
        entities::{AssessmentKind, Difficulty, Question},
        requests::{AssessmentChanges, AssessmentListQuery, NewAssessment},
    };
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support::memory_storage};

    fn question(number: i32) -> Question {
        Question {
            number,
            text: format!("Q{number}"),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_option: 1,
            difficulty: Difficulty::Easy,
        }
    }

    async fn seed_class(storage: &SeaOrmStorage) -> (i64, i64) {
        let teacher = storage
            .create_user_impl(CreateUserRequest {
                username: "teacher".into(),
                email: "teacher@school.test".into(),
                password: "hash".into(),
                role: UserRole::Teacher,
                display_name: None,
                student_code: None,
            })
            .await
            .unwrap();
        let class = storage
            .create_class_impl(CreateClassRequest {
                teacher_id: Some(teacher.id),
                name: "8B".into(),
                description: None,
            })
            .await
            .unwrap();
        (teacher.id, class.id)
    }

    fn new_assessment(class_id: i64, created_by: i64, code: &str) -> NewAssessment {
        NewAssessment {
            kind: AssessmentKind::Quiz,
            name: "Fractions".into(),
            subject: "math".into(),
            code: code.into(),
            class_id,
            created_by,
            due_at: Utc::now() + Duration::days(3),
            questions: vec![question(1), question(2)],
        }
    }

    #[tokio::test]
    async fn test_create_and_replace_questions() {
        let storage = memory_storage().await;
        let (teacher, class_id) = seed_class(&storage).await;

        let created = storage
            .create_assessment_impl(new_assessment(class_id, teacher, "QZ0001"))
            .await
            .unwrap();
        assert_eq!(created.question_count, 2);
        assert_eq!(storage.list_questions_impl(created.id).await.unwrap().len(), 2);

        let updated = storage
            .update_assessment_impl(
                created.id,
                AssessmentChanges {
                    name: Some("Fractions II".into()),
                    questions: Some(vec![question(1), question(2), question(3)]),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Fractions II");
        assert_eq!(updated.question_count, 3);

        let questions = storage.list_questions_impl(created.id).await.unwrap();
        assert_eq!(
            questions.iter().map(|q| q.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(questions[0].options.len(), 3);
    }

    #[tokio::test]
    async fn test_list_filters_and_code_lookup() {
        let storage = memory_storage().await;
        let (teacher, class_id) = seed_class(&storage).await;
        storage
            .create_assessment_impl(new_assessment(class_id, teacher, "QZ0001"))
            .await
            .unwrap();
        let mut homework = new_assessment(class_id, teacher, "HW0001");
        homework.kind = AssessmentKind::Assignment;
        homework.subject = "english".into();
        storage.create_assessment_impl(homework).await.unwrap();

        let page = storage
            .list_assessments_with_pagination_impl(AssessmentListQuery {
                page: 1,
                size: 10,
                class_ids: Some(vec![class_id]),
                kind: Some(AssessmentKind::Assignment),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].code, "HW0001");

        let none = storage
            .list_assessments_with_pagination_impl(AssessmentListQuery {
                page: 1,
                size: 10,
                class_ids: Some(vec![]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.items.is_empty());

        let by_code = storage.get_assessment_by_code_impl("QZ0001").await.unwrap();
        assert_eq!(by_code.map(|a| a.kind), Some(AssessmentKind::Quiz));

        let dup = storage
            .create_assessment_impl(new_assessment(class_id, teacher, "QZ0001"))
            .await;
        assert!(dup.is_err());
    }
}
