use common::{Availability, ServiceCategory};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    pub short_description: String,
    #[sea_orm(column_type = "Text")]
    pub full_description: String,
    pub category: ServiceCategory,
    pub subcategory: Option<String>,
    pub icon: String,

    /// JSON array of strings.
    #[sea_orm(column_type = "Json")]
    pub features: Json,
    /// JSON array of strings.
    #[sea_orm(column_type = "Json")]
    pub technologies: Json,
    /// JSON array of strings.
    #[sea_orm(column_type = "Json")]
    pub tags: Json,

    pub availability: Availability,
    pub popularity: i32, // 1-10
    pub is_active: bool,
    pub is_featured: bool,
    pub display_order: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
