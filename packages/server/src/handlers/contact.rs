use axum::Json;
use axum::extract::{Path, Query, State};
use common::{ContactStatus, Priority, ServiceInterest};
use tracing::instrument;
use uuid::Uuid;

use super::parse_label;
use crate::error::{AppError, ErrorBody, RateLimitBody};
use crate::extractors::client::ClientInfo;
use crate::extractors::form::JsonOrForm;
use crate::extractors::json::AppJson;
use crate::intake::IntakeError;
use crate::intake::validation::MESSAGE_MAX;
use crate::models::contact::*;
use crate::models::shared::Pagination;
use crate::state::AppState;
use crate::store::{ContactFilter, ContactSort, PageRequest, StoreError, TriageUpdate};

fn intake_error(state: &AppState, err: IntakeError) -> AppError {
    let support = state.support_email();
    match err {
        IntakeError::Invalid(errors) => AppError::Validation {
            message: format!(
                "Please correct the highlighted fields and try again, or email us at {support}"
            ),
            errors,
        },
        IntakeError::Unavailable => AppError::ServiceUnavailable(format!(
            "We cannot accept messages right now. Please try again later or email us at {support}"
        )),
        IntakeError::Contract(detail) | IntakeError::Internal(detail) => AppError::Failed {
            message: format!(
                "Something went wrong while sending your message. Please email us at {support}"
            ),
            detail,
            reveal: state.config.server.is_development(),
        },
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Contacts",
    operation_id = "submitContact",
    summary = "Submit the contact form",
    description = "Validates and stores a lead, alerts staff by email and sends the visitor a confirmation. Accepts JSON or `application/x-www-form-urlencoded`. Email failures never fail the request; `emailSent` reports whether staff were notified. `id` is null when the lead could not be stored.",
    request_body(
        content(
            (ContactForm = "application/json"),
            (ContactForm = "application/x-www-form-urlencoded"),
        ),
    ),
    responses(
        (status = 200, description = "Submission accepted", body = SubmitContactResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 429, description = "Too many submissions from this address", body = RateLimitBody),
        (status = 500, description = "Submission failed (INTERNAL_ERROR)", body = ErrorBody),
        (status = 503, description = "Storage unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client, form))]
pub async fn submit_contact(
    State(state): State<AppState>,
    client: ClientInfo,
    JsonOrForm(form): JsonOrForm<ContactForm>,
) -> Result<Json<SubmitContactResponse>, AppError> {
    let ctx = RequestContext {
        ip_address: client.ip.map(|ip| ip.to_string()),
        user_agent: client.user_agent,
    };

    let receipt = state
        .intake
        .handle(&form, ctx)
        .await
        .map_err(|e| intake_error(&state, e))?;

    let message = if receipt.email_sent {
        "Thank you for your message! We will get back to you within 24 hours."
    } else {
        "Thank you for your message! We have received it and will get back to you soon."
    };

    Ok(Json(SubmitContactResponse {
        success: true,
        message: message.to_string(),
        data: SubmissionReceipt {
            id: receipt.id.map(|id| id.to_string()),
            email_sent: receipt.email_sent,
            timestamp: receipt.timestamp,
        },
    }))
}

fn contact_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid(format!("Invalid contact id '{raw}'")))
}

fn contact_error(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound => AppError::NotFound("Contact not found".into()),
        other => other.into(),
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Contacts",
    operation_id = "listContacts",
    summary = "List leads",
    description = "Returns leads with optional status, priority, service interest and source filters. Client address and user agent are omitted. Only mounted when admin routes are enabled.",
    params(ContactListQuery),
    responses(
        (status = 200, description = "Leads", body = ContactListResponse),
        (status = 400, description = "Invalid filter or sort (VALIDATION_ERROR)", body = ErrorBody),
        (status = 503, description = "Storage unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<ContactListResponse>, AppError> {
    let filter = ContactFilter {
        status: parse_label::<ContactStatus>(query.status.as_deref())?,
        priority: parse_label::<Priority>(query.priority.as_deref())?,
        service_interest: parse_label::<ServiceInterest>(query.service_interest.as_deref())?,
        source: query
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    };
    let sort = match query.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse::<ContactSort>().map_err(AppError::invalid)?,
        None => ContactSort::default(),
    };
    let page = PageRequest::new(query.limit, query.skip);

    let result = state.contacts.list(filter, sort, page).await?;
    let pagination = Pagination::new(
        result.total,
        page.limit,
        page.skip,
        result.contacts.len() as u64,
    );

    Ok(Json(ContactListResponse {
        success: true,
        data: ContactListData {
            contacts: result.contacts.into_iter().map(ContactListItem::from).collect(),
            pagination,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Contacts",
    operation_id = "getContact",
    summary = "Get a lead",
    params(("id" = String, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Lead", body = ContactResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContactResponse>, AppError> {
    let id = contact_id(&id)?;
    let contact = state.contacts.get(id).await.map_err(contact_error)?;

    Ok(Json(ContactResponse {
        success: true,
        data: contact,
    }))
}

#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = "Contacts",
    operation_id = "updateContactStatus",
    summary = "Triage a lead",
    description = "Sets the status, and optionally the priority and notes, of a lead.",
    params(("id" = String, Path, description = "Contact ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Lead updated", body = UpdateStatusResponse),
        (status = 400, description = "Invalid status, priority or notes (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(status = %payload.status))]
pub async fn update_contact_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, AppError> {
    let id = contact_id(&id)?;
    let status = parse_label::<ContactStatus>(Some(&payload.status))?
        .ok_or_else(|| AppError::invalid("status is required"))?;
    let priority = parse_label::<Priority>(payload.priority.as_deref())?;

    let notes = payload.notes.map(|n| n.trim().to_string());
    if notes
        .as_deref()
        .is_some_and(|n| n.chars().count() > MESSAGE_MAX)
    {
        return Err(AppError::invalid(format!(
            "Notes must be at most {MESSAGE_MAX} characters"
        )));
    }

    let contact = state
        .contacts
        .update_triage(
            id,
            TriageUpdate {
                status,
                priority,
                notes,
            },
        )
        .await
        .map_err(contact_error)?;

    tracing::info!(contact_id = %id, status = %contact.status, "Contact triaged");

    Ok(Json(UpdateStatusResponse {
        success: true,
        message: "Contact status updated successfully".into(),
        data: contact,
    }))
}

#[utoipa::path(
    get,
    path = "/stats/summary",
    tag = "Contacts",
    operation_id = "contactSummary",
    summary = "Lead statistics",
    description = "Counts leads by status and by service interest.",
    responses(
        (status = 200, description = "Statistics", body = ContactSummaryResponse),
        (status = 503, description = "Storage unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn contact_summary(
    State(state): State<AppState>,
) -> Result<Json<ContactSummaryResponse>, AppError> {
    let summary = state.contacts.summary().await?;

    Ok(Json(ContactSummaryResponse {
        success: true,
        data: ContactSummaryData {
            total: summary.total,
            new_contacts: summary.status_count(ContactStatus::New),
            contacted: summary.status_count(ContactStatus::Contacted),
            qualified: summary.status_count(ContactStatus::Qualified),
            closed: summary.status_count(ContactStatus::Closed),
            service_interest: summary
                .by_interest
                .into_iter()
                .map(|(service_interest, count)| InterestCount {
                    service_interest,
                    count,
                })
                .collect(),
        },
    }))
}
