use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::db::dao::base_traits::{HasIdActiveModel, TimestampedActiveModel};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub commission_scolaire: String,
    pub school_name: String,
    /// JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub grade_levels: Json,
    /// JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub subjects: Json,
    pub phone_number: String,
    #[sea_orm(default_value = false)]
    pub is_verified: bool,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn grade_levels(&self) -> Vec<String> {
        string_list(&self.grade_levels)
    }

    pub fn subjects(&self) -> Vec<String> {
        string_list(&self.subjects)
    }
}

impl ActiveModel {
    /// Profile row with every teacher-facing field at its default.
    pub fn empty_for(user_id: Uuid) -> Self {
        Self {
            user_id: Set(user_id),
            commission_scolaire: Set(String::new()),
            school_name: Set(String::new()),
            grade_levels: Set(Json::Array(Vec::new())),
            subjects: Set(Json::Array(Vec::new())),
            phone_number: Set(String::new()),
            is_verified: Set(false),
            ..Default::default()
        }
    }

    pub fn set_grade_levels(&mut self, levels: Vec<String>) {
        self.grade_levels = Set(Json::from(levels));
    }

    pub fn set_subjects(&mut self, subjects: Vec<String>) {
        self.subjects = Set(Json::from(subjects));
    }
}

// Non-string entries are dropped rather than failing the whole read.
fn string_list(value: &Json) -> Vec<String> {
    match value {
        Json::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

impl HasIdActiveModel for ActiveModel {
    fn set_id(&mut self, id: Uuid) {
        self.id = Set(id);
    }
}

impl TimestampedActiveModel for ActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone) {
        self.created_at = Set(ts);
    }

    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone) {
        self.updated_at = Set(ts);
    }
}
