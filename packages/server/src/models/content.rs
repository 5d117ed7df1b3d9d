use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::{Availability, Department, ServiceCategory, TeamCategory};
use sea_orm::prelude::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{service, team_member};

fn strings(value: Json) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

/// Up to two uppercase initials taken from the first words of a name.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct TeamListQuery {
    /// Filter by team category label.
    pub category: Option<String>,
    /// Filter by department label.
    pub department: Option<String>,
    /// `true` (default) for active members, `false` for inactive ones.
    pub active: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub experience: Option<String>,
    pub specialties: Vec<String>,
    pub credentials: Vec<String>,
    pub category: TeamCategory,
    pub department: Department,
    pub is_active: bool,
    pub display_order: i32,
    #[schema(example = "JD")]
    pub initials: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<team_member::Model> for TeamMemberResponse {
    fn from(m: team_member::Model) -> Self {
        Self {
            id: m.id,
            initials: initials(&m.name),
            name: m.name,
            title: m.title,
            bio: m.bio,
            email: m.email,
            phone: m.phone,
            photo_url: m.photo_url,
            experience: m.experience,
            specialties: strings(m.specialties),
            credentials: strings(m.credentials),
            category: m.category,
            department: m.department,
            is_active: m.is_active,
            display_order: m.display_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TeamStats {
    pub total: u64,
    pub leadership: u64,
    pub core: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TeamListData {
    pub all: Vec<TeamMemberResponse>,
    /// Members keyed by category label.
    pub grouped: BTreeMap<String, Vec<TeamMemberResponse>>,
    pub stats: TeamStats,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TeamListResponse {
    pub success: bool,
    pub data: TeamListData,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TeamMemberEnvelope {
    pub success: bool,
    pub data: TeamMemberResponse,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ServiceListQuery {
    /// Filter by service category label.
    pub category: Option<String>,
    /// Filter by availability label.
    pub availability: Option<String>,
    /// `true` for featured services only, `false` for the rest.
    pub featured: Option<String>,
    /// `true` (default) for active services, `false` for inactive ones.
    pub active: Option<String>,
    /// Case-insensitive match on name, short description or tags.
    pub search: Option<String>,
    /// One of `displayOrder` (default), `popularity`, `availability`, `alphabetical`.
    #[param(example = "popularity")]
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ServiceCategoryQuery {
    /// `true` (default) for active services, `false` for inactive ones.
    pub active: Option<String>,
    /// One of `displayOrder` (default), `popularity`, `alphabetical`.
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub id: Uuid,
    pub name: String,
    pub short_description: String,
    pub full_description: String,
    pub category: ServiceCategory,
    pub subcategory: Option<String>,
    pub icon: String,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
    pub tags: Vec<String>,
    pub availability: Availability,
    /// 1-10.
    pub popularity: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<service::Model> for ServiceResponse {
    fn from(m: service::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            short_description: m.short_description,
            full_description: m.full_description,
            category: m.category,
            subcategory: m.subcategory,
            icon: m.icon,
            features: strings(m.features),
            technologies: strings(m.technologies),
            tags: strings(m.tags),
            availability: m.availability,
            popularity: m.popularity,
            is_active: m.is_active,
            is_featured: m.is_featured,
            display_order: m.display_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ServiceStats {
    pub total: u64,
    pub available: u64,
    pub featured: u64,
    /// Number of distinct categories in the result.
    pub categories: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ServiceListData {
    pub all: Vec<ServiceResponse>,
    /// Services keyed by category label.
    pub grouped: BTreeMap<String, Vec<ServiceResponse>>,
    pub stats: ServiceStats,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ServiceListResponse {
    pub success: bool,
    pub data: ServiceListData,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ServiceEnvelope {
    pub success: bool,
    pub data: ServiceResponse,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ServiceCategoryData {
    pub category: ServiceCategory,
    pub services: Vec<ServiceResponse>,
    pub count: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ServiceCategoryResponse {
    pub success: bool,
    pub data: ServiceCategoryData,
}
