//! Comment actions on the post detail view.
//!
//! The post id comes from the detail view model, and the reply form state is
//! the single `reply_open` field: opening one form closes any other.

use serde_json::json;
use std::sync::Arc;

use super::{reject, require_sign_in, set_busy};
use crate::context::{AppContext, RenderToken};
use crate::errors::{AlertLevel, AppError};
use crate::loaders::load_comments;
use crate::ports::ApiRequest;
use crate::views::{Control, RegionPatch};

/// Shown when the body is blank.
pub const EMPTY_COMMENT: &str = "Comment cannot be empty.";
/// Delete confirmation prompt.
pub const CONFIRM_DELETE_COMMENT: &str = "Are you sure you want to delete this comment?";
/// Shown after a delete.
pub const COMMENT_DELETED: &str = "Comment deleted.";

fn detail_post_id(ctx: &AppContext) -> Option<i64> {
    ctx.with_state(|state| state.detail.as_ref().and_then(|detail| detail.post_id))
}

/// Post a comment, or a reply to `parent`, then reload the section.
pub async fn submit_comment(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    parent: Option<i64>,
    content: String,
) -> Result<(), AppError> {
    if !require_sign_in(ctx) {
        return Ok(());
    }
    let Some(post_id) = detail_post_id(ctx) else {
        tracing::warn!(%token, "Comment submitted before the post loaded");
        return Err(AppError::precondition("Post not loaded"));
    };
    if content.trim().is_empty() {
        return Err(reject(ctx, Some(token), EMPTY_COMMENT));
    }

    let control = Control::CommentForm(parent);
    set_busy(ctx, token, control.clone(), true);
    let request = ApiRequest::post("/comments/").json(json!({
        "post": post_id,
        "parent": parent,
        "content": content,
    }));
    let result = ctx.send(Some(token), request).await;
    set_busy(ctx, token, control, false);
    result?;

    tracing::info!(post_id, parent = ?parent, "Comment posted");
    ctx.patch_if_current(token, RegionPatch::ClearCommentInput { parent });
    if parent.is_some() {
        close_reply(ctx, token);
    }
    load_comments(ctx, token, post_id).await;
    Ok(())
}

/// Toggle the reply form under `comment_id`.
pub fn open_reply(ctx: &Arc<AppContext>, token: RenderToken, comment_id: i64) {
    if !require_sign_in(ctx) {
        return;
    }
    let open = ctx.with_state(|state| {
        state.reply_open = if state.reply_open == Some(comment_id) {
            None
        } else {
            Some(comment_id)
        };
        state.reply_open
    });
    tracing::debug!(comment_id, open = ?open, "Reply form toggled");
    ctx.patch_if_current(token, RegionPatch::ReplyForm { open });
}

/// Close the open reply form.
pub fn close_reply(ctx: &Arc<AppContext>, token: RenderToken) {
    ctx.with_state(|state| state.reply_open = None);
    ctx.patch_if_current(token, RegionPatch::ReplyForm { open: None });
}

/// Delete a comment after confirmation, then reload the section.
pub async fn delete_comment(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    comment_id: i64,
) -> Result<(), AppError> {
    if !require_sign_in(ctx) {
        return Ok(());
    }
    if !ctx.surface().confirm(CONFIRM_DELETE_COMMENT) {
        return Ok(());
    }
    let control = Control::DeleteComment(comment_id);
    set_busy(ctx, token, control.clone(), true);
    if let Err(err) = ctx
        .send(Some(token), ApiRequest::delete(format!("/comments/{comment_id}/")))
        .await
    {
        set_busy(ctx, token, control, false);
        return Err(err);
    }

    tracing::info!(comment_id, "Comment deleted");
    ctx.show_alert(AlertLevel::Success, COMMENT_DELETED);
    if let Some(post_id) = detail_post_id(ctx) {
        load_comments(ctx, token, post_id).await;
    }
    Ok(())
}
