//! # View Loaders
//!
//! One loader per view. The router has already rendered a loading placeholder
//! and bound the view's handlers; a loader fetches what the view needs and
//! populates the region. Failures render an inline message in the region.
//!
//! Every loader runs under the [`RenderToken`] of the cycle that started it and
//! checks it after each await, so a late response never touches a newer view.

use std::collections::HashSet;
use std::sync::Arc;

use quillpad_core::pagination;
use quillpad_core::{
    build_comment_tree, CategoryRecord, CommentRecord, ListParams, ListSource, Listing,
    PostRecord, SiteStats, TagRecord, UserRecord,
};

use crate::context::{AppContext, DetailModel, RenderToken};
use crate::errors::{AlertLevel, AppError};
use crate::ports::ApiRequest;
use crate::views::{
    CategoryAdminView, CommentView, CommentsView, FooterView, FormStatus, PostDetailView, PostFormView,
    PostListView, PostSummary, ProfileView, RegionPatch, TagAdminView, UserAdminView,
    ViewContent,
};

// ============================================================================
// Inline Messages
// ============================================================================

/// Public post lists.
pub const ERROR_POSTS: &str = "Error loading posts.";
/// `#my-posts`
pub const ERROR_MY_POSTS: &str = "Error loading your posts.";
/// `#saved-posts`
pub const ERROR_SAVED_POSTS: &str = "Error loading saved posts.";
/// Post detail.
pub const ERROR_POST_DETAIL: &str = "Error loading post details.";
/// Comments section.
pub const ERROR_COMMENTS: &str = "Error loading comments.";
/// Profile page.
pub const ERROR_PROFILE: &str = "Error loading profile.";
/// Post form lookups.
pub const ERROR_FORM_LOOKUPS: &str = "Error loading categories or tags.";
/// Post form, edit mode.
pub const ERROR_EDIT_POST: &str = "Error loading post data for editing.";
/// Category admin.
pub const ERROR_CATEGORIES: &str = "Error loading categories.";
/// User admin.
pub const ERROR_USERS: &str = "Error loading users.";
/// Tag admin.
pub const ERROR_TAGS: &str = "Error loading tags.";
/// Shown when editing a post the user may not modify.
pub const DENIED_EDIT_POST: &str = "You do not have permission to edit this post.";

/// Pagination base of the user admin page.
pub const ADMIN_USERS_HASH: &str = "#admin/users";
/// Pagination base of the tag admin page.
pub const ADMIN_TAGS_HASH: &str = "#admin/tags";

fn list_error(source: &ListSource) -> &'static str {
    match source {
        ListSource::Mine => ERROR_MY_POSTS,
        ListSource::Saved => ERROR_SAVED_POSTS,
        _ => ERROR_POSTS,
    }
}

// ============================================================================
// Post Lists
// ============================================================================

/// Load one page of a post list.
pub async fn load_post_list(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    source: ListSource,
    params: ListParams,
) {
    let mut request = ApiRequest::get(source.endpoint(params));
    if !source.authenticated() {
        request = request.anonymous();
    }
    let listing: Listing<PostRecord> = match ctx.fetch(Some(token), request).await {
        Ok(listing) => listing,
        Err(_) => {
            ctx.render_if_current(token, ViewContent::Error(list_error(&source).to_string()));
            return;
        }
    };
    if !ctx.is_current(token) {
        tracing::warn!(%token, source = ?source, "Dropping stale post list");
        return;
    }

    let (records, count) = listing.into_parts();
    let session = ctx.session.current_user();
    let saved_list = source == ListSource::Saved;
    let posts: Vec<PostSummary> = records
        .iter()
        .map(|post| {
            let mut card = PostSummary::from_record(post, &session, ctx.config.excerpt_chars);
            card.saved = saved_list;
            card
        })
        .collect();
    let slugs: Vec<String> = posts.iter().map(|card| card.slug.clone()).collect();
    let view = PostListView {
        title: source.title(),
        pagination: pagination::compute(count, params.limit, params.offset, &source.base_url()),
        posts,
    };
    tracing::debug!(%token, source = ?source, shown = slugs.len(), count, "Post list loaded");

    ctx.with_state(|state| {
        state.list_source = Some(source.clone());
        state.listed = slugs.clone();
    });
    if !ctx.render_if_current(token, ViewContent::PostList(view)) {
        return;
    }
    if !saved_list {
        refresh_saved_status(ctx, token, &slugs).await;
    }
}

/// Mark which of `slugs` the signed-in user has saved. Does nothing when
/// signed out; failures leave the buttons as rendered.
pub async fn refresh_saved_status(ctx: &Arc<AppContext>, token: RenderToken, slugs: &[String]) {
    if slugs.is_empty() || !ctx.session.is_authenticated() {
        return;
    }
    let request = ApiRequest::get(format!("/posts/saved/?limit={}", ctx.config.lookup_limit));
    let saved: HashSet<String> = match ctx.fetch_quiet::<Listing<PostRecord>>(request).await {
        Ok(listing) => listing.into_items().into_iter().map(|post| post.slug).collect(),
        Err(err) => {
            tracing::warn!(%token, error = %err, "Saved status check failed");
            return;
        }
    };
    for slug in slugs {
        let patch = RegionPatch::Saved {
            slug: slug.clone(),
            saved: saved.contains(slug),
        };
        if !ctx.patch_if_current(token, patch) {
            return;
        }
    }
}

// ============================================================================
// Post Detail and Comments
// ============================================================================

/// Load a post, then its comments and saved state. The view counter is bumped
/// alongside and its outcome ignored.
pub async fn load_post_detail(ctx: &Arc<AppContext>, token: RenderToken, slug: String) {
    let record_view = async {
        let request = ApiRequest::post(format!("/posts/{slug}/view/")).anonymous();
        if let Err(err) = ctx.fetch_quiet::<serde_json::Value>(request).await {
            tracing::warn!(slug = %slug, error = %err, "Failed to increment view count");
        }
    };
    let load = async {
        let request = ApiRequest::get(format!("/posts/{slug}/")).anonymous();
        let post: PostRecord = match ctx.fetch(Some(token), request).await {
            Ok(post) => post,
            Err(_) => {
                ctx.render_if_current(token, ViewContent::Error(ERROR_POST_DETAIL.to_string()));
                return;
            }
        };
        if !ctx.is_current(token) {
            tracing::warn!(%token, slug = %slug, "Dropping stale post detail");
            return;
        }

        let session = ctx.session.current_user();
        let view = PostDetailView::from_record(&post, &session, ctx.config.excerpt_chars);
        ctx.with_state(|state| {
            state.detail = Some(DetailModel {
                slug: post.slug.clone(),
                post_id: post.id,
            });
            state.listed = vec![post.slug.clone()];
        });
        if !ctx.render_if_current(token, ViewContent::PostDetail(view)) {
            return;
        }

        let slugs = [post.slug.clone()];
        let comments = async {
            match post.id {
                Some(post_id) => load_comments(ctx, token, post_id).await,
                None => {
                    tracing::warn!(slug = %post.slug, "Post has no id, comments unavailable");
                    ctx.patch_if_current(
                        token,
                        RegionPatch::Comments(CommentsView::Failed(ERROR_COMMENTS.to_string())),
                    );
                }
            }
        };
        futures::join!(comments, refresh_saved_status(ctx, token, &slugs));
    };
    futures::join!(record_view, load);
}

/// Load and render the comments section of `post_id`. Closes any open reply
/// form.
pub async fn load_comments(ctx: &Arc<AppContext>, token: RenderToken, post_id: i64) {
    let request = ApiRequest::get(format!("/comments/by_post/?post_id={post_id}")).anonymous();
    let failed = || RegionPatch::Comments(CommentsView::Failed(ERROR_COMMENTS.to_string()));
    let listing: Listing<CommentRecord> = match ctx.fetch(Some(token), request).await {
        Ok(listing) => listing,
        Err(_) => {
            ctx.patch_if_current(token, failed());
            return;
        }
    };
    let (records, count) = listing.into_parts();
    let forest = match build_comment_tree(records) {
        Ok(forest) => forest,
        Err(err) => {
            let err = AppError::from(err);
            tracing::warn!(post_id, error = %err, "Rejected comment batch");
            ctx.report(Some(token), &err);
            ctx.patch_if_current(token, failed());
            return;
        }
    };

    let session = ctx.session.current_user();
    let comments = forest
        .iter()
        .map(|comment| CommentView::from_tree(comment, &session))
        .collect();
    if !ctx.is_current(token) {
        tracing::warn!(%token, post_id, "Dropping stale comments");
        return;
    }
    ctx.with_state(|state| state.reply_open = None);
    ctx.patch_if_current(
        token,
        RegionPatch::Comments(CommentsView::Loaded {
            post_id,
            comments,
            count,
            can_comment: session.is_authenticated(),
        }),
    );
}

// ============================================================================
// Profile
// ============================================================================

/// Load the signed-in user's profile.
pub async fn load_profile(ctx: &Arc<AppContext>, token: RenderToken) {
    match ctx.fetch::<UserRecord>(Some(token), ApiRequest::get("/profile/")).await {
        Ok(user) => {
            ctx.render_if_current(token, ViewContent::Profile(ProfileView { user }));
        }
        Err(_) => {
            ctx.render_if_current(token, ViewContent::Error(ERROR_PROFILE.to_string()));
        }
    }
}

// ============================================================================
// Post Form
// ============================================================================

/// Load the create (`slug = None`) or edit form and start the editor.
///
/// Categories and tags are fetched concurrently. When editing, the post is
/// fetched afterwards and the edit permission is re-checked against it.
pub async fn load_post_form(ctx: &Arc<AppContext>, token: RenderToken, slug: Option<String>) {
    let mut form = PostFormView::loading(slug.clone());
    ctx.render_if_current(token, ViewContent::PostForm(form.clone()));

    let limit = ctx.config.lookup_limit;
    let categories = ctx.fetch::<Listing<CategoryRecord>>(
        Some(token),
        ApiRequest::get(format!("/categories/?limit={limit}")).anonymous(),
    );
    let tags = ctx.fetch::<Listing<TagRecord>>(
        Some(token),
        ApiRequest::get(format!("/tags/?limit={limit}")).anonymous(),
    );
    let (categories, tags) = match futures::try_join!(categories, tags) {
        Ok(lookups) => lookups,
        Err(_) => {
            form.status = FormStatus::Failed(ERROR_FORM_LOOKUPS.to_string());
            ctx.patch_if_current(token, RegionPatch::PostForm(form));
            return;
        }
    };
    form.categories = categories.into_items();
    form.tags = tags.into_items();

    if let Some(slug) = &slug {
        let post: PostRecord = match ctx
            .fetch(Some(token), ApiRequest::get(format!("/posts/{slug}/")))
            .await
        {
            Ok(post) => post,
            Err(_) => {
                form.status = FormStatus::Failed(ERROR_EDIT_POST.to_string());
                ctx.patch_if_current(token, RegionPatch::PostForm(form));
                return;
            }
        };
        if !ctx.is_current(token) {
            tracing::warn!(%token, slug = %slug, "Dropping stale post form");
            return;
        }
        if !ctx.session.can_edit_or_delete(&post) {
            tracing::info!(slug = %slug, "Edit denied for post");
            ctx.show_alert(AlertLevel::Danger, DENIED_EDIT_POST);
            ctx.navigate_to(&format!("#posts/{slug}"));
            return;
        }
        form.post = Some(post);
    }

    if !ctx.is_current(token) {
        tracing::warn!(%token, "Dropping stale post form");
        return;
    }
    let initial = form
        .post
        .as_ref()
        .and_then(|post| post.content.clone())
        .unwrap_or_default();
    form.status = FormStatus::Ready;
    ctx.patch_if_current(token, RegionPatch::PostForm(form));
    if let Err(err) = ctx.editor.initialize(&initial) {
        ctx.patch_if_current(token, RegionPatch::EditorUnavailable(err.to_string()));
    }
}

// ============================================================================
// Administration
// ============================================================================

/// Load every category and render the admin page with the current form state.
pub async fn load_admin_categories(ctx: &Arc<AppContext>, token: RenderToken) {
    let request = ApiRequest::get(format!("/categories/?limit={}", ctx.config.lookup_limit));
    let categories = match ctx.fetch::<Listing<CategoryRecord>>(Some(token), request).await {
        Ok(listing) => listing.into_items(),
        Err(_) => {
            ctx.render_if_current(token, ViewContent::Error(ERROR_CATEGORIES.to_string()));
            return;
        }
    };
    if !ctx.is_current(token) {
        return;
    }
    let form = ctx.with_state(|state| {
        state.categories = categories.clone();
        state.category_form.clone()
    });
    ctx.render_if_current(
        token,
        ViewContent::CategoryAdmin(CategoryAdminView { categories, form }),
    );
}

/// Load one page of users.
pub async fn load_admin_users(ctx: &Arc<AppContext>, token: RenderToken, params: ListParams) {
    let request = ApiRequest::get(format!("/users/?{}", params.query()));
    match ctx.fetch::<Listing<UserRecord>>(Some(token), request).await {
        Ok(listing) => {
            let (users, count) = listing.into_parts();
            let view = UserAdminView {
                users,
                pagination: pagination::compute(count, params.limit, params.offset, ADMIN_USERS_HASH),
            };
            ctx.render_if_current(token, ViewContent::UserAdmin(view));
        }
        Err(_) => {
            ctx.render_if_current(token, ViewContent::Error(ERROR_USERS.to_string()));
        }
    }
}

/// Load one page of tags.
pub async fn load_admin_tags(ctx: &Arc<AppContext>, token: RenderToken, params: ListParams) {
    let request = ApiRequest::get(format!("/tags/?{}", params.query()));
    match ctx.fetch::<Listing<TagRecord>>(Some(token), request).await {
        Ok(listing) => {
            let (tags, count) = listing.into_parts();
            let view = TagAdminView {
                tags,
                pagination: pagination::compute(count, params.limit, params.offset, ADMIN_TAGS_HASH),
            };
            ctx.render_if_current(token, ViewContent::TagAdmin(view));
        }
        Err(_) => {
            ctx.render_if_current(token, ViewContent::Error(ERROR_TAGS.to_string()));
        }
    }
}

// ============================================================================
// Footer
// ============================================================================

/// Load the footer. The three requests run concurrently and each failure
/// leaves its part empty.
pub async fn load_footer(ctx: &Arc<AppContext>) {
    let recent = ctx.fetch_quiet::<Listing<PostRecord>>(
        ApiRequest::get(format!("/posts/recent/?count={}", ctx.config.recent_posts)).anonymous(),
    );
    let popular = ctx.fetch_quiet::<Listing<TagRecord>>(ApiRequest::get("/tags/popular/").anonymous());
    let stats = ctx.fetch_quiet::<SiteStats>(ApiRequest::get("/posts/stats/").anonymous());
    let (recent, popular, stats) = futures::join!(recent, popular, stats);

    let footer = FooterView {
        recent_posts: recent.map(Listing::into_items).unwrap_or_default(),
        popular_tags: popular.map(Listing::into_items).unwrap_or_default(),
        stats: stats.ok(),
    };
    tracing::debug!(
        recent = footer.recent_posts.len(),
        tags = footer.popular_tags.len(),
        stats = footer.stats.is_some(),
        "Footer loaded"
    );
    ctx.surface().render_footer(&footer);
}
