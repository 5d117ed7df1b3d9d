use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::chat::ChatError;
use crate::error::{AppError, ErrorBody, RateLimitBody};
use crate::extractors::client::ClientInfo;
use crate::extractors::json::AppJson;
use crate::models::chat::*;
use crate::models::contact::RequestContext;
use crate::state::AppState;

fn chat_error(state: &AppState, err: ChatError) -> AppError {
    let support = state.support_email();
    match err {
        ChatError::Invalid(errors) => AppError::Validation {
            message: "Please correct the highlighted fields and try again".into(),
            errors,
        },
        ChatError::Unavailable => AppError::ServiceUnavailable(format!(
            "Chat is temporarily unavailable. Please try again later or email us at {support}"
        )),
        ChatError::Internal(detail) => AppError::Failed {
            message: format!("Something went wrong. Please email us at {support}"),
            detail,
            reveal: state.config.server.is_development(),
        },
    }
}

fn context(client: ClientInfo) -> RequestContext {
    RequestContext {
        ip_address: client.ip.map(|ip| ip.to_string()),
        user_agent: client.user_agent,
    }
}

#[utoipa::path(
    post,
    path = "/message",
    tag = "Chat",
    operation_id = "sendChatMessage",
    summary = "Send a chat message",
    description = "Stores the visitor message and answers with a canned reply chosen by keyword. A session id is generated when none is given. `messageId` is null when the message could not be stored.",
    request_body = ChatMessageRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatMessageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 429, description = "Too many requests from this address", body = RateLimitBody),
        (status = 503, description = "Storage unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client, req))]
pub async fn post_message(
    State(state): State<AppState>,
    client: ClientInfo,
    AppJson(req): AppJson<ChatMessageRequest>,
) -> Result<Json<ChatMessageResponse>, AppError> {
    let exchange = state
        .chat
        .message(&req, context(client))
        .await
        .map_err(|e| chat_error(&state, e))?;

    Ok(Json(ChatMessageResponse {
        success: true,
        response: ChatReplyData {
            message: exchange.reply.message.to_string(),
            kind: exchange.reply.kind,
            quick_actions: exchange
                .reply
                .quick_actions
                .iter()
                .map(|a| a.to_string())
                .collect(),
            timestamp: exchange.timestamp,
            message_id: exchange.message_id,
            session_id: exchange.session_id,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/conversation/{session_id}",
    tag = "Chat",
    operation_id = "getConversation",
    summary = "Conversation history",
    description = "Returns the visitor and assistant turns of one session, oldest first, at most 100.",
    params(("session_id" = String, Path, description = "Chat session ID")),
    responses(
        (status = 200, description = "Conversation", body = ConversationResponse),
        (status = 400, description = "Malformed session ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 503, description = "Storage unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ConversationResponse>, AppError> {
    let turns = state
        .chat
        .conversation(&session_id)
        .await
        .map_err(|e| chat_error(&state, e))?;

    Ok(Json(ConversationResponse {
        success: true,
        session_id,
        conversations: turns.into_iter().map(ConversationEntry::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/ticket",
    tag = "Chat",
    operation_id = "createSupportTicket",
    summary = "Open a support ticket",
    description = "Stores a support ticket as a lead and alerts staff. Unlike chat messages a ticket is refused while storage is unavailable.",
    request_body = TicketRequest,
    responses(
        (status = 200, description = "Ticket created", body = TicketResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 429, description = "Too many submissions from this address", body = RateLimitBody),
        (status = 503, description = "Storage unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client, req))]
pub async fn create_ticket(
    State(state): State<AppState>,
    client: ClientInfo,
    AppJson(req): AppJson<TicketRequest>,
) -> Result<Json<TicketResponse>, AppError> {
    let receipt = state
        .chat
        .open_ticket(&req, context(client))
        .await
        .map_err(|e| chat_error(&state, e))?;

    Ok(Json(TicketResponse {
        success: true,
        ticket: TicketData {
            id: receipt.reference,
            contact_id: receipt.contact_id,
            status: "created",
            priority: receipt.priority,
            category: receipt.category,
            estimated_response: receipt.priority.estimated_response(),
            message: "Support ticket created successfully. You will receive updates via email."
                .into(),
        },
    }))
}
