//! Profile page actions.

use serde_json::json;
use std::sync::Arc;

use quillpad_core::UserRecord;

use super::{auth, reject, set_busy};
use crate::context::{AppContext, RenderToken};
use crate::errors::{AlertLevel, AppError};
use crate::intent::PasswordChange;
use crate::ports::{ApiRequest, FilePart, FormValue};
use crate::views::{Control, ProfileView, RegionPatch};

/// Shown when no avatar file was chosen.
pub const NO_AVATAR_FILE: &str = "Please select an image file.";
/// Shown when the new password and confirmation differ.
pub const PASSWORD_MISMATCH: &str = "New passwords do not match.";
/// Shown when the new password is blank.
pub const EMPTY_PASSWORD: &str = "New password cannot be empty.";

async fn patch_profile(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    control: Control,
    request: ApiRequest,
    success: &str,
) -> Result<(), AppError> {
    set_busy(ctx, token, control.clone(), true);
    let result = ctx.fetch::<UserRecord>(Some(token), request).await;
    set_busy(ctx, token, control, false);
    let user = result?;
    ctx.show_alert(AlertLevel::Success, success);
    ctx.patch_if_current(token, RegionPatch::Profile(ProfileView { user }));
    Ok(())
}

/// Update the biography.
pub async fn update_profile(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    bio: String,
) -> Result<(), AppError> {
    if !ctx.session.is_authenticated() {
        return Ok(());
    }
    let request = ApiRequest::patch("/profile/").json(json!({ "bio": bio }));
    patch_profile(ctx, token, Control::ProfileForm, request, "Profile updated successfully.").await
}

/// Upload a new avatar.
pub async fn upload_avatar(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    file: Option<FilePart>,
) -> Result<(), AppError> {
    if !ctx.session.is_authenticated() {
        return Ok(());
    }
    let Some(file) = file else {
        return Err(reject(ctx, Some(token), NO_AVATAR_FILE));
    };
    let request =
        ApiRequest::patch("/profile/").multipart(vec![("avatar".to_string(), FormValue::File(file))]);
    patch_profile(ctx, token, Control::AvatarForm, request, "Avatar updated successfully.").await
}

/// Change the password, then sign out.
pub async fn change_password(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    change: PasswordChange,
) -> Result<(), AppError> {
    if !ctx.session.is_authenticated() {
        return Ok(());
    }
    if change.new != change.confirm {
        return Err(reject(ctx, Some(token), PASSWORD_MISMATCH));
    }
    if change.new.is_empty() {
        return Err(reject(ctx, Some(token), EMPTY_PASSWORD));
    }

    set_busy(ctx, token, Control::PasswordForm, true);
    let request = ApiRequest::post("/change-password/").json(json!({
        "current_password": change.current,
        "new_password": change.new,
    }));
    let result = ctx.send(Some(token), request).await;
    set_busy(ctx, token, Control::PasswordForm, false);
    result?;

    tracing::info!("Password changed");
    ctx.show_alert(AlertLevel::Success, "Password changed successfully. Logging out.");
    auth::logout(ctx, Some(token)).await;
    Ok(())
}
