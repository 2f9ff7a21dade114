//! 题目实体，选项以 JSON 数组存储

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assessment_id: i64,
    pub number: i32,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    #[sea_orm(column_type = "Text")]
    pub options: String,
    pub correct_option: i32,
    pub difficulty: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assessments::Entity",
        from = "Column::AssessmentId",
        to = "super::assessments::Column::Id"
    )]
    Assessment,
}

impl Related<super::assessments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::assessments::entities::Question {
        use crate::models::assessments::entities::{Difficulty, Question};

        Question {
            number: self.number,
            text: self.text,
            options: serde_json::from_str(&self.options).unwrap_or_default(),
            correct_option: self.correct_option,
            difficulty: self
                .difficulty
                .parse::<Difficulty>()
                .unwrap_or(Difficulty::Medium),
        }
    }
}
