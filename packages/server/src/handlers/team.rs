use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::{Department, TeamCategory};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use super::{db, parse_label};
use crate::entity::team_member;
use crate::error::{AppError, ErrorBody};
use crate::models::content::*;
use crate::models::shared::flag;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Team",
    operation_id = "listTeam",
    summary = "List team members",
    description = "Returns team members ordered by display order, grouped by category. Only active members are returned unless `active=false`.",
    params(TeamListQuery),
    responses(
        (status = 200, description = "Team roster", body = TeamListResponse),
        (status = 400, description = "Invalid filter (VALIDATION_ERROR)", body = ErrorBody),
        (status = 503, description = "Database unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_team(
    State(state): State<AppState>,
    Query(query): Query<TeamListQuery>,
) -> Result<Json<TeamListResponse>, AppError> {
    let db = db(&state)?;

    let mut select = team_member::Entity::find().filter(
        team_member::Column::IsActive.eq(flag(query.active.as_deref()).unwrap_or(true)),
    );
    if let Some(category) = parse_label::<TeamCategory>(query.category.as_deref())? {
        select = select.filter(team_member::Column::Category.eq(category));
    }
    if let Some(department) = parse_label::<Department>(query.department.as_deref())? {
        select = select.filter(team_member::Column::Department.eq(department));
    }

    let members: Vec<TeamMemberResponse> = select
        .order_by_asc(team_member::Column::DisplayOrder)
        .order_by_asc(team_member::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(TeamMemberResponse::from)
        .collect();

    let mut grouped: BTreeMap<String, Vec<TeamMemberResponse>> = BTreeMap::new();
    for member in &members {
        grouped
            .entry(member.category.to_string())
            .or_default()
            .push(member.clone());
    }
    let count = |category: TeamCategory| {
        members.iter().filter(|m| m.category == category).count() as u64
    };
    let stats = TeamStats {
        total: members.len() as u64,
        leadership: count(TeamCategory::Leadership),
        core: count(TeamCategory::Core),
    };

    Ok(Json(TeamListResponse {
        success: true,
        data: TeamListData {
            all: members,
            grouped,
            stats,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Team",
    operation_id = "getTeamMember",
    summary = "Get a team member",
    params(("id" = String, Path, description = "Team member ID")),
    responses(
        (status = 200, description = "Team member", body = TeamMemberEnvelope),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_team_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeamMemberEnvelope>, AppError> {
    let not_found = || AppError::NotFound("Team member not found".into());
    let id: Uuid = id.parse().map_err(|_| not_found())?;

    let member = team_member::Entity::find_by_id(id)
        .one(db(&state)?)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(TeamMemberEnvelope {
        success: true,
        data: member.into(),
    }))
}
