//! # Workflows - Intent Handling
//!
//! One async function per [`Intent`](crate::intent::Intent). The application
//! facade resolves the intent against the bound handler set and passes the
//! resulting render token in; workflows never run for intents the current view
//! did not bind.
//!
//! ## Patterns
//!
//! **1. Preconditions first**
//! - Sign-in, empty-field, and editor checks run before any request
//! - A failed check shows a warning and returns [`AppError::Precondition`]
//!
//! **2. Busy controls**
//! - The control is disabled while the request is in flight
//! - Failures always re-enable it; no view-model state is mutated
//!
//! **3. Error Handling**
//! - API failures are shown as danger alerts by [`AppContext::send`]
//! - Workflows return the error so hosts and tests can observe it

pub mod admin;
pub mod auth;
pub mod comments;
pub mod posts;
pub mod profile;

use std::sync::Arc;

use crate::context::{AppContext, RenderToken};
use crate::errors::AppError;
use crate::views::{Control, RegionPatch};

/// Hash the sign-in redirects go to.
pub const LOGIN_HASH: &str = "#login";

/// Navigate to the login view when signed out. Returns whether the user is
/// signed in.
pub(crate) fn require_sign_in(ctx: &Arc<AppContext>) -> bool {
    if ctx.session.is_authenticated() {
        return true;
    }
    tracing::info!("Action requires sign-in, redirecting");
    ctx.navigate_to(LOGIN_HASH);
    false
}

/// Show `message` as a precondition warning and return the error.
pub(crate) fn reject(
    ctx: &Arc<AppContext>,
    token: Option<RenderToken>,
    message: &str,
) -> AppError {
    let err = AppError::precondition(message);
    ctx.report(token, &err);
    err
}

/// Disable or re-enable `control`.
pub(crate) fn set_busy(ctx: &Arc<AppContext>, token: RenderToken, control: Control, busy: bool) {
    ctx.patch_if_current(token, RegionPatch::Busy { control, busy });
}
