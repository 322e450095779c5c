//! Post actions: like, save, submit, delete.

use std::sync::Arc;

use quillpad_core::{LikeResponse, PostRecord, SaveResponse};

use super::{reject, require_sign_in, set_busy};
use crate::context::{AppContext, RenderToken};
use crate::errors::{AlertLevel, AppError, EditorError};
use crate::intent::PostDraft;
use crate::ports::{ApiRequest, FormValue, Method};
use crate::views::{Control, RegionPatch};

/// Shown when the title is blank.
pub const EMPTY_TITLE: &str = "Post title cannot be empty.";
/// Delete confirmation prompt.
pub const CONFIRM_DELETE_POST: &str =
    "Are you sure you want to delete this post? This cannot be undone.";
/// Shown after a delete.
pub const POST_DELETED: &str = "Post deleted successfully.";
/// List whose cards disappear when unsaved.
pub const SAVED_POSTS_HASH: &str = "#saved-posts";

/// Like or unlike `slug`.
pub async fn toggle_like(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    slug: String,
) -> Result<(), AppError> {
    if !require_sign_in(ctx) {
        return Ok(());
    }
    let control = Control::Like(slug.clone());
    set_busy(ctx, token, control.clone(), true);
    let result = ctx
        .fetch::<LikeResponse>(Some(token), ApiRequest::post(format!("/posts/{slug}/like/")))
        .await;
    if let Ok(response) = &result {
        tracing::debug!(slug = %slug, liked = response.liked, "Like toggled");
        ctx.patch_if_current(
            token,
            RegionPatch::Like {
                slug,
                liked: response.liked,
                like_count: response.like_count,
            },
        );
    }
    set_busy(ctx, token, control, false);
    result.map(|_| ())
}

/// Save or unsave `slug`. Unsaving from the saved-posts list removes the card.
pub async fn toggle_save(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    slug: String,
) -> Result<(), AppError> {
    if !require_sign_in(ctx) {
        return Ok(());
    }
    let control = Control::Save(slug.clone());
    set_busy(ctx, token, control.clone(), true);
    let result = ctx
        .fetch::<SaveResponse>(Some(token), ApiRequest::post(format!("/posts/{slug}/save/")))
        .await;
    if let Ok(response) = &result {
        ctx.patch_if_current(
            token,
            RegionPatch::Saved {
                slug: slug.clone(),
                saved: response.saved,
            },
        );
        if !response.saved && ctx.current_hash().starts_with(SAVED_POSTS_HASH) {
            ctx.with_state(|state| state.listed.retain(|listed| listed != &slug));
            ctx.patch_if_current(token, RegionPatch::RemovePost { slug });
        }
    }
    set_busy(ctx, token, control, false);
    result.map(|_| ())
}

/// Multipart fields of a post submission, in the order the API expects.
pub fn post_form_fields(draft: &PostDraft, content: String) -> Vec<(String, FormValue)> {
    let text = |name: &str, value: String| (name.to_string(), FormValue::Text(value));
    let mut fields = vec![text("title", draft.title.clone())];
    if !draft.category.is_empty() {
        fields.push(text("category", draft.category.clone()));
    }
    if !draft.tags.is_empty() {
        fields.push(text("tags", draft.tags.clone()));
    }
    fields.push(text("is_published", draft.is_published.to_string()));
    fields.push(text("featured", draft.featured.to_string()));
    fields.push(text("content", content));
    match &draft.featured_image {
        Some(file) => fields.push(("featured_image".to_string(), FormValue::File(file.clone()))),
        None if draft.remove_image && draft.slug.is_some() => {
            fields.push(text("featured_image", String::new()));
        }
        None => {}
    }
    fields
}

/// Create or update a post from the form and the live editor, then open it.
pub async fn submit_post(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    draft: PostDraft,
) -> Result<(), AppError> {
    if !require_sign_in(ctx) {
        return Ok(());
    }
    if draft.title.trim().is_empty() {
        return Err(reject(ctx, Some(token), EMPTY_TITLE));
    }
    let content = match ctx.editor.markdown() {
        Ok(content) => content,
        Err(err) => {
            tracing::error!(error = %err, "Post submitted without an editor");
            let err = AppError::from(EditorError::NotReady);
            ctx.report(Some(token), &err);
            return Err(err);
        }
    };

    let (method, path) = match &draft.slug {
        Some(slug) => (Method::Patch, format!("/posts/{slug}/")),
        None => (Method::Post, "/posts/".to_string()),
    };
    let request = ApiRequest::new(method, path).multipart(post_form_fields(&draft, content));
    set_busy(ctx, token, Control::PostForm, true);
    let result = ctx.fetch::<PostRecord>(Some(token), request).await;
    set_busy(ctx, token, Control::PostForm, false);
    let post = result?;

    let verb = if draft.slug.is_some() { "updated" } else { "created" };
    tracing::info!(slug = %post.slug, verb, "Post saved");
    ctx.show_alert(AlertLevel::Success, format!("Post {verb} successfully!"));
    ctx.navigate_to(&format!("#posts/{}", post.slug));
    Ok(())
}

/// Delete `slug` after confirmation. Leaves the post's own views for home,
/// otherwise reloads the current view.
pub async fn delete_post(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    slug: String,
) -> Result<(), AppError> {
    if !require_sign_in(ctx) {
        return Ok(());
    }
    if !ctx.surface().confirm(CONFIRM_DELETE_POST) {
        tracing::debug!(slug = %slug, "Post delete cancelled");
        return Ok(());
    }
    let control = Control::DeletePost(slug.clone());
    set_busy(ctx, token, control.clone(), true);
    if let Err(err) = ctx
        .send(Some(token), ApiRequest::delete(format!("/posts/{slug}/")))
        .await
    {
        set_busy(ctx, token, control, false);
        return Err(err);
    }

    tracing::info!(slug = %slug, "Post deleted");
    ctx.show_alert(AlertLevel::Success, POST_DELETED);
    let current = ctx.current_hash();
    if current == format!("#posts/{slug}") || current == format!("#edit-post/{slug}") {
        ctx.navigate_to(quillpad_core::HOME_HASH);
    } else {
        ctx.reload();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FilePart;

    fn names(fields: &[(String, FormValue)]) -> Vec<&str> {
        fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn test_optional_fields_skipped_when_blank() {
        let draft = PostDraft {
            title: "Hello".into(),
            ..PostDraft::default()
        };
        let fields = post_form_fields(&draft, "body".into());
        assert_eq!(
            names(&fields),
            ["title", "is_published", "featured", "content"]
        );
        assert_eq!(fields[1].1, FormValue::Text("false".into()));
    }

    #[test]
    fn test_image_removal_only_when_editing() {
        let mut draft = PostDraft {
            title: "Hello".into(),
            category: "3".into(),
            tags: "rust, async".into(),
            remove_image: true,
            ..PostDraft::default()
        };
        assert!(!names(&post_form_fields(&draft, String::new())).contains(&"featured_image"));

        draft.slug = Some("hello".into());
        let fields = post_form_fields(&draft, String::new());
        assert_eq!(
            fields.last(),
            Some(&("featured_image".to_string(), FormValue::Text(String::new())))
        );
    }

    #[test]
    fn test_new_image_wins_over_removal() {
        let image = FilePart {
            file_name: "cover.png".into(),
            content_type: Some("image/png".into()),
            bytes: vec![1, 2, 3],
        };
        let draft = PostDraft {
            slug: Some("hello".into()),
            title: "Hello".into(),
            featured_image: Some(image.clone()),
            remove_image: true,
            ..PostDraft::default()
        };
        let fields = post_form_fields(&draft, String::new());
        assert_eq!(fields.last().map(|(_, v)| v), Some(&FormValue::File(image)));
    }
}
