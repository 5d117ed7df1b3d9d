use common::{Department, TeamCategory};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub experience: Option<String>,

    /// JSON array of strings.
    #[sea_orm(column_type = "Json")]
    pub specialties: Json,
    /// JSON array of strings.
    #[sea_orm(column_type = "Json")]
    pub credentials: Json,

    pub category: TeamCategory,
    pub department: Department,
    pub is_active: bool,
    pub display_order: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
