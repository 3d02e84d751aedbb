//! Messaging API handlers.
//!
//! ```text
//! POST /api/messages            {"receiverId":3,"content":"Is it still available?"}
//! GET  /api/messages
//! PUT  /api/messages/{id}/read
//! GET  /api/messages/unread-count
//! GET  /api/messages/read-count
//! GET  /api/messages/stats
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, Capability, Error, Message, MessageId, MessageStats, MessageThreadEntry,
    NewMessage, UserId,
};
use crate::inbound::http::auth::Caller;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const MESSAGE_ID: FieldName = FieldName::new("id");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: UserId,
    pub content: String,
}

/// Acknowledgement wrapping the affected message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageEnvelope {
    pub message: String,
    pub data: Message,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadCount {
    pub read_count: u64,
}

async fn caller_stats(caller: &Caller, state: &HttpState) -> Result<MessageStats, Error> {
    caller.require(Capability::Participate)?;
    state.messaging.stats(caller.id()).await
}

#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Sender or receiver not found", body = Error)
    ),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("")]
pub async fn send_message(
    caller: Caller,
    state: web::Data<HttpState>,
    payload: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    caller.require(Capability::Participate)?;
    let SendMessageRequest {
        receiver_id,
        content,
    } = payload.into_inner();
    let message = NewMessage::try_new(caller.id(), receiver_id, &content)?;
    let data = state.messaging.send(message).await?;
    Ok(HttpResponse::Created().json(MessageEnvelope {
        message: "Message sent successfully".to_owned(),
        data,
    }))
}

/// Messages the caller sent or received, newest first.
#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "Conversation entries", body = [MessageThreadEntry]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["messages"],
    operation_id = "listMessages"
)]
#[get("")]
pub async fn list_messages(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<MessageThreadEntry>>> {
    caller.require(Capability::Participate)?;
    Ok(web::Json(state.messaging.list(caller.id()).await?))
}

/// Mark a received message as read. Only its receiver may do this.
#[utoipa::path(
    put,
    path = "/api/messages/{id}/read",
    params(("id" = i32, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message marked as read", body = MessageEnvelope),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller is not the receiver", body = Error),
        (status = 404, description = "Message not found", body = Error)
    ),
    tags = ["messages"],
    operation_id = "markMessageRead"
)]
#[put("/{id}/read")]
pub async fn mark_read(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageEnvelope>> {
    caller.require(Capability::Participate)?;
    let id: MessageId = parse_id(&path, MESSAGE_ID)?;
    let data = state.messaging.mark_read(caller.id(), id).await?;
    Ok(web::Json(MessageEnvelope {
        message: "Message marked as read".to_owned(),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/messages/unread-count",
    responses(
        (status = 200, description = "Unread received messages", body = UnreadCount),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["messages"],
    operation_id = "unreadCount"
)]
#[get("/unread-count")]
pub async fn unread_count(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<UnreadCount>> {
    let stats = caller_stats(&caller, &state).await?;
    Ok(web::Json(UnreadCount {
        unread_count: stats.unread_count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/messages/read-count",
    responses(
        (status = 200, description = "Read received messages", body = ReadCount),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["messages"],
    operation_id = "readCount"
)]
#[get("/read-count")]
pub async fn read_count(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ReadCount>> {
    let stats = caller_stats(&caller, &state).await?;
    Ok(web::Json(ReadCount {
        read_count: stats.read_count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/messages/stats",
    responses(
        (status = 200, description = "Read and unread received messages", body = MessageStats),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["messages"],
    operation_id = "messageStats"
)]
#[get("/stats")]
pub async fn message_stats(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<MessageStats>> {
    Ok(web::Json(caller_stats(&caller, &state).await?))
}
