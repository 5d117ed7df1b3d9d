use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::{Availability, ServiceCategory};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use super::{db, parse_label};
use crate::entity::service;
use crate::error::{AppError, ErrorBody};
use crate::models::content::*;
use crate::models::shared::flag;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServiceSort {
    DisplayOrder,
    Popularity,
    Availability,
    Alphabetical,
}

impl ServiceSort {
    fn parse(raw: Option<&str>, allow_availability: bool) -> Result<Self, AppError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None | Some("displayOrder") => Ok(Self::DisplayOrder),
            Some("popularity") => Ok(Self::Popularity),
            Some("alphabetical") => Ok(Self::Alphabetical),
            Some("availability") if allow_availability => Ok(Self::Availability),
            Some(other) => Err(AppError::invalid(format!(
                "Invalid sort '{other}'. Valid values: displayOrder, popularity, {}alphabetical",
                if allow_availability { "availability, " } else { "" }
            ))),
        }
    }

    fn apply(self, select: Select<service::Entity>) -> Select<service::Entity> {
        match self {
            Self::DisplayOrder => select
                .order_by_asc(service::Column::DisplayOrder)
                .order_by_asc(service::Column::CreatedAt),
            Self::Popularity => select
                .order_by_desc(service::Column::Popularity)
                .order_by_asc(service::Column::DisplayOrder),
            Self::Availability => select
                .order_by_asc(service::Column::Availability)
                .order_by_asc(service::Column::DisplayOrder),
            Self::Alphabetical => select.order_by_asc(service::Column::Name),
        }
    }
}

/// Case-insensitive match on name, short description or any tag.
fn matches_search(service: &ServiceResponse, term: &str) -> bool {
    service.name.to_lowercase().contains(term)
        || service.short_description.to_lowercase().contains(term)
        || service.tags.iter().any(|t| t.to_lowercase().contains(term))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Services",
    operation_id = "listServices",
    summary = "List services",
    description = "Returns the service catalogue grouped by category with summary counts. Only active services are returned unless `active=false`.",
    params(ServiceListQuery),
    responses(
        (status = 200, description = "Service catalogue", body = ServiceListResponse),
        (status = 400, description = "Invalid filter or sort (VALIDATION_ERROR)", body = ErrorBody),
        (status = 503, description = "Database unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceListQuery>,
) -> Result<Json<ServiceListResponse>, AppError> {
    let db = db(&state)?;
    let sort = ServiceSort::parse(query.sort.as_deref(), true)?;

    let mut select = service::Entity::find()
        .filter(service::Column::IsActive.eq(flag(query.active.as_deref()).unwrap_or(true)));
    if let Some(category) = parse_label::<ServiceCategory>(query.category.as_deref())? {
        select = select.filter(service::Column::Category.eq(category));
    }
    if let Some(availability) = parse_label::<Availability>(query.availability.as_deref())? {
        select = select.filter(service::Column::Availability.eq(availability));
    }
    if let Some(featured) = flag(query.featured.as_deref()) {
        select = select.filter(service::Column::IsFeatured.eq(featured));
    }

    let mut services: Vec<ServiceResponse> = sort
        .apply(select)
        .all(db)
        .await?
        .into_iter()
        .map(ServiceResponse::from)
        .collect();

    let term = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();
    if !term.is_empty() {
        services.retain(|s| matches_search(s, &term));
    }

    let mut grouped: BTreeMap<String, Vec<ServiceResponse>> = BTreeMap::new();
    for s in &services {
        grouped
            .entry(s.category.to_string())
            .or_default()
            .push(s.clone());
    }
    let stats = ServiceStats {
        total: services.len() as u64,
        available: services
            .iter()
            .filter(|s| s.availability == Availability::Available)
            .count() as u64,
        featured: services.iter().filter(|s| s.is_featured).count() as u64,
        categories: grouped.len() as u64,
    };

    Ok(Json(ServiceListResponse {
        success: true,
        data: ServiceListData {
            all: services,
            grouped,
            stats,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Services",
    operation_id = "getService",
    summary = "Get a service",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = ServiceEnvelope),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceEnvelope>, AppError> {
    let not_found = || AppError::NotFound("Service not found".into());
    let id: Uuid = id.parse().map_err(|_| not_found())?;

    let model = service::Entity::find_by_id(id)
        .one(db(&state)?)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(ServiceEnvelope {
        success: true,
        data: model.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/category/{category}",
    tag = "Services",
    operation_id = "listServicesByCategory",
    summary = "List services in one category",
    params(
        ("category" = String, Path, description = "Service category label"),
        ServiceCategoryQuery,
    ),
    responses(
        (status = 200, description = "Services in the category", body = ServiceCategoryResponse),
        (status = 400, description = "Unknown category or sort (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_services_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<ServiceCategoryQuery>,
) -> Result<Json<ServiceCategoryResponse>, AppError> {
    let category = parse_label::<ServiceCategory>(Some(&category))?
        .ok_or_else(|| AppError::invalid("category is required"))?;
    let sort = ServiceSort::parse(query.sort.as_deref(), false)?;

    let select = service::Entity::find()
        .filter(service::Column::Category.eq(category))
        .filter(service::Column::IsActive.eq(flag(query.active.as_deref()).unwrap_or(true)));

    let services: Vec<ServiceResponse> = sort
        .apply(select)
        .all(db(&state)?)
        .await?
        .into_iter()
        .map(ServiceResponse::from)
        .collect();

    Ok(Json(ServiceCategoryResponse {
        success: true,
        data: ServiceCategoryData {
            category,
            count: services.len() as u64,
            services,
        },
    }))
}
