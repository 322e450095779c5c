//! Category administration.
//!
//! The category list and the form state live in the view state, so edits
//! prefill from the loaded records instead of the rendered rows.

use serde_json::json;
use std::sync::Arc;

use super::{reject, set_busy};
use crate::context::{AppContext, RenderToken};
use crate::errors::{AlertLevel, AppError};
use crate::loaders::load_admin_categories;
use crate::ports::ApiRequest;
use crate::views::{CategoryForm, Control, RegionPatch};

/// Shown when the name is blank.
pub const EMPTY_CATEGORY_NAME: &str = "Category name cannot be empty.";

fn set_form(ctx: &Arc<AppContext>, token: RenderToken, form: CategoryForm) {
    ctx.with_state(|state| state.category_form = form.clone());
    ctx.patch_if_current(token, RegionPatch::CategoryForm(form));
}

/// Open a blank form.
pub fn show_form(ctx: &Arc<AppContext>, token: RenderToken) {
    set_form(ctx, token, CategoryForm::Open { editing: None });
}

/// Hide the form.
pub fn cancel_form(ctx: &Arc<AppContext>, token: RenderToken) {
    set_form(ctx, token, CategoryForm::Hidden);
}

/// Open the form prefilled with category `id`. Unknown ids open a blank form.
pub fn edit_category(ctx: &Arc<AppContext>, token: RenderToken, id: i64) {
    let editing = ctx.with_state(|state| {
        state
            .categories
            .iter()
            .find(|category| category.id == id)
            .cloned()
    });
    if editing.is_none() {
        tracing::warn!(id, "Editing a category that is not listed");
    }
    set_form(ctx, token, CategoryForm::Open { editing });
}

/// Create (`id = None`) or rename a category, then reload the list.
pub async fn submit_category(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    id: Option<i64>,
    name: String,
) -> Result<(), AppError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(reject(ctx, Some(token), EMPTY_CATEGORY_NAME));
    }
    let request = match id {
        Some(id) => ApiRequest::put(format!("/categories/{id}/")),
        None => ApiRequest::post("/categories/"),
    }
    .json(json!({ "name": name }));

    set_busy(ctx, token, Control::CategoryForm, true);
    let result = ctx.send(Some(token), request).await;
    set_busy(ctx, token, Control::CategoryForm, false);
    result?;

    let verb = if id.is_some() { "updated" } else { "created" };
    tracing::info!(name = %name, verb, "Category saved");
    ctx.show_alert(AlertLevel::Success, format!("Category {verb}."));
    ctx.with_state(|state| state.category_form = CategoryForm::Hidden);
    load_admin_categories(ctx, token).await;
    Ok(())
}

/// Delete category `id` after confirmation, then reload the list.
pub async fn delete_category(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    id: i64,
) -> Result<(), AppError> {
    let name = ctx
        .with_state(|state| {
            state
                .categories
                .iter()
                .find(|category| category.id == id)
                .map(|category| category.name.clone())
        })
        .unwrap_or_else(|| id.to_string());
    let prompt = format!(
        "Are you sure you want to delete the category \"{name}\"? This might affect posts using it."
    );
    if !ctx.surface().confirm(&prompt) {
        return Ok(());
    }

    let control = Control::DeleteCategory(id);
    set_busy(ctx, token, control.clone(), true);
    if let Err(err) = ctx
        .send(Some(token), ApiRequest::delete(format!("/categories/{id}/")))
        .await
    {
        set_busy(ctx, token, control, false);
        return Err(err);
    }
    tracing::info!(id, name = %name, "Category deleted");
    ctx.show_alert(AlertLevel::Success, format!("Category \"{name}\" deleted."));
    load_admin_categories(ctx, token).await;
    Ok(())
}
