use actix_web::{http::StatusCode as ActixStatusCode, web, HttpResponse, Responder};
use chrono::{Local, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::models::Comment;

const COMMENT_AUTHOR: &str = "Anonymous User";

#[derive(Deserialize, ToSchema)]
pub struct CommentRequest {
    pub content: String,
}

fn error_json(status: ActixStatusCode, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message.to_string() }))
}

/// Trims the submitted content; whitespace-only input is rejected before
/// anything reaches the backend.
fn sanitize_content(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn build_comment(content: String) -> Comment {
    Comment {
        id: Utc::now().timestamp_millis(),
        author: COMMENT_AUTHOR.to_string(),
        content,
        timestamp: Local::now().format("%d.%m.%Y, %H:%M:%S").to_string(),
        likes: 0,
    }
}

#[utoipa::path(
    post,
    path = "/api/videos/{video_id}/comments",
    params(
        ("video_id" = i64, Path, description = "Video the comment belongs to")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment accepted and echoed back", body = Comment),
        (status = 422, description = "Empty or whitespace-only content"),
        (status = 502, description = "Backend did not accept the comment")
    )
)]
pub async fn post_comment(
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
    data: web::Data<crate::AppState>,
) -> impl Responder {
    let video_id = path.into_inner();

    let content = match sanitize_content(&body.content) {
        Some(content) => content,
        None => {
            return error_json(
                ActixStatusCode::UNPROCESSABLE_ENTITY,
                "Comment must not be empty.",
            )
        }
    };

    // Fire-and-forget forward; the comment itself only ever lives in the
    // page that posted it.
    if !data.api.submit_comment(video_id, &content).await {
        return error_json(ActixStatusCode::BAD_GATEWAY, "Comment could not be posted.");
    }

    HttpResponse::Created().json(build_comment(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_content_is_rejected() {
        assert_eq!(sanitize_content(""), None);
        assert_eq!(sanitize_content("   \n\t "), None);
    }

    #[test]
    fn content_is_trimmed_before_use() {
        assert_eq!(sanitize_content("  hello  ").as_deref(), Some("hello"));
    }

    #[test]
    fn fresh_comments_start_unliked_and_anonymous() {
        let comment = build_comment("nice clip".to_string());
        assert_eq!(comment.author, COMMENT_AUTHOR);
        assert_eq!(comment.content, "nice clip");
        assert_eq!(comment.likes, 0);
        assert!(comment.id > 0);
        assert!(!comment.timestamp.is_empty());
    }
}
