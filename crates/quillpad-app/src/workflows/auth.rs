//! Sign-in, registration, sign-out, and the profile fetch that fills in the
//! session role.

use serde_json::json;
use std::sync::Arc;

use quillpad_core::{LoginResponse, UserRecord};

use super::{set_busy, LOGIN_HASH};
use crate::context::{AppContext, RenderToken};
use crate::errors::{AlertLevel, AppError};
use crate::intent::Registration;
use crate::ports::ApiRequest;
use crate::views::Control;

/// Shown after a full sign-in.
pub const LOGIN_SUCCESS: &str = "Login successful!";
/// Shown when the token was issued but the profile could not be read.
pub const LOGIN_PROFILE_FAILED: &str = "Login succeeded but failed to load profile data.";
/// Shown after registration.
pub const REGISTER_SUCCESS: &str = "Registration successful! Please log in.";
/// Shown after sign-out.
pub const LOGGED_OUT: &str = "Logged out.";

/// Fetch `/profile/` and store role, username and id in the session.
pub async fn fetch_profile(
    ctx: &Arc<AppContext>,
    token: Option<RenderToken>,
) -> Result<UserRecord, AppError> {
    let user: UserRecord = ctx.fetch(token, ApiRequest::get("/profile/")).await?;
    ctx.session.apply_profile(&user).map_err(|err| {
        let err = AppError::from(err);
        ctx.report(token, &err);
        err
    })?;
    tracing::info!(username = ?user.username, role = ?user.role, "Profile loaded");
    Ok(user)
}

/// Sign in, load the profile, and go home.
pub async fn login(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    username: String,
    password: String,
) -> Result<(), AppError> {
    set_busy(ctx, token, Control::LoginForm, true);
    let request = ApiRequest::post("/login/")
        .json(json!({ "username": username, "password": password }))
        .anonymous();
    let result = ctx.fetch::<LoginResponse>(Some(token), request).await;
    set_busy(ctx, token, Control::LoginForm, false);
    let response = result?;

    if let Err(err) = ctx.session.sign_in(
        &response.token,
        response.username.as_deref(),
        response.user_id,
    ) {
        let err = AppError::from(err);
        ctx.report(Some(token), &err);
        return Err(err);
    }
    tracing::info!(username = ?response.username, "Signed in");

    match fetch_profile(ctx, Some(token)).await {
        Ok(_) => ctx.show_alert(AlertLevel::Success, LOGIN_SUCCESS),
        Err(_) => ctx.show_alert(AlertLevel::Warning, LOGIN_PROFILE_FAILED),
    };
    ctx.render_nav();
    ctx.navigate_to(quillpad_core::HOME_HASH);
    Ok(())
}

/// Create an account and go to the login form.
pub async fn register(
    ctx: &Arc<AppContext>,
    token: RenderToken,
    registration: Registration,
) -> Result<(), AppError> {
    set_busy(ctx, token, Control::RegisterForm, true);
    let request = ApiRequest::post("/register/")
        .json(json!({
            "username": registration.username,
            "email": registration.email,
            "password": registration.password,
        }))
        .anonymous();
    let result = ctx.send(Some(token), request).await;
    set_busy(ctx, token, Control::RegisterForm, false);
    result?;

    tracing::info!(username = %registration.username, "Registered");
    ctx.show_alert(AlertLevel::Success, REGISTER_SUCCESS);
    ctx.navigate_to(LOGIN_HASH);
    Ok(())
}

/// Invalidate the token server-side and clear the session whatever the
/// outcome, then go to the login form.
pub async fn logout(ctx: &Arc<AppContext>, token: Option<RenderToken>) {
    if let Err(err) = ctx.send(token, ApiRequest::post("/auth/token/logout/")).await {
        tracing::warn!(error = %err, "Server-side logout failed, clearing local session anyway");
    }
    if let Err(err) = ctx.session.clear() {
        ctx.report(token, &AppError::from(err));
    }
    tracing::info!("Signed out");
    ctx.render_nav();
    ctx.show_alert(AlertLevel::Info, LOGGED_OUT);
    ctx.navigate_to(LOGIN_HASH);
}
