//! Intent Workflow Test Suite
//!
//! User actions dispatched against bound views: preconditions, busy controls,
//! alert routing, and the navigation each action queues.

use assert_matches::assert_matches;
use serde_json::{json, Value};

use quillpad_app::ports::{KEY_ROLE, KEY_TOKEN};
use quillpad_app::views::{CategoryForm, Control};
use quillpad_app::workflows::admin::EMPTY_CATEGORY_NAME;
use quillpad_app::workflows::auth::{LOGGED_OUT, LOGIN_SUCCESS};
use quillpad_app::workflows::comments::EMPTY_COMMENT;
use quillpad_app::workflows::posts::{CONFIRM_DELETE_POST, EMPTY_TITLE, POST_DELETED};
use quillpad_app::workflows::profile::PASSWORD_MISMATCH;
use quillpad_app::{
    AlertLevel, AppError, FormValue, Intent, IntentError, IntentKind, PasswordChange, PostDraft,
    RegionPatch, RequestBody, ViewContent,
};
use quillpad_core::Role;
use quillpad_testkit::*;

const HOME_POSTS: &str = "/posts/?limit=10&offset=0";

async fn on_home(harness: &TestApp) {
    harness.client.respond_json(
        Method::Get,
        HOME_POSTS,
        paged(2, vec![post(1, "first", "bob"), post(2, "second", TEST_USERNAME)]),
    );
    harness.visit("#/").await;
}

async fn on_detail(harness: &TestApp) {
    harness
        .client
        .respond_json(Method::Get, "/posts/first/", post(1, "first", "bob"));
    harness.client.respond_json(
        Method::Get,
        "/comments/by_post/?post_id=1",
        json!([
            comment(10, 1, None, "bob", "2024-03-01T10:00:00Z"),
            comment(11, 1, None, "carol", "2024-03-01T11:00:00Z"),
        ]),
    );
    harness.visit("#posts/first").await;
}

fn busy_states(harness: &TestApp, control: &Control) -> Vec<bool> {
    harness
        .surface
        .patches()
        .into_iter()
        .filter_map(|patch| match patch {
            RegionPatch::Busy { control: c, busy } if &c == control => Some(busy),
            _ => None,
        })
        .collect()
}

fn json_body(harness: &TestApp, method: Method, path: &str) -> Value {
    let request = harness.client.requests_to(method, path).pop().unwrap();
    match request.body {
        Some(RequestBody::Json(body)) => body,
        other => panic!("expected a JSON body, got {other:?}"),
    }
}

/// Handler binding
mod binding_tests {
    use super::*;

    #[tokio::test]
    async fn test_intent_without_bound_handler_is_rejected() {
        let harness = TestApp::anonymous();
        on_home(&harness).await;

        let result = harness
            .dispatch(Intent::SubmitComment {
                parent: None,
                content: "hello".into(),
            })
            .await;

        assert_matches!(
            result,
            Err(AppError::Intent(IntentError::NotBound(IntentKind::SubmitComment)))
        );
        assert_eq!(harness.client.count_prefix("/comments/"), 0);
    }

    #[tokio::test]
    async fn test_dismiss_is_accepted_on_any_view() {
        let harness = TestApp::anonymous();
        harness.visit("#nowhere").await;
        let id = harness.ctx().show_alert(AlertLevel::Info, "hello");

        harness.dispatch(Intent::DismissAlert(id)).await.unwrap();

        assert!(harness.surface.visible_alerts().is_empty());
        assert!(harness.ctx().alerts().is_empty());
    }

    #[tokio::test]
    async fn test_handlers_from_previous_view_are_gone() {
        let harness = TestApp::signed_in(Role::Author);
        on_detail(&harness).await;
        on_home(&harness).await;

        let result = harness.dispatch(Intent::OpenReply { comment_id: 10 }).await;
        assert_matches!(result, Err(AppError::Intent(_)));
    }
}

/// Post actions
mod post_tests {
    use super::*;

    #[tokio::test]
    async fn test_like_updates_button_and_count() {
        let harness = TestApp::signed_in(Role::Reader);
        on_home(&harness).await;
        harness.client.respond_json(
            Method::Post,
            "/posts/first/like/",
            json!({ "liked": true, "like_count": 4 }),
        );

        harness
            .dispatch(Intent::ToggleLike {
                slug: "first".into(),
            })
            .await
            .unwrap();

        assert!(harness.surface.patches().contains(&RegionPatch::Like {
            slug: "first".into(),
            liked: true,
            like_count: 4,
        }));
        assert_eq!(
            busy_states(&harness, &Control::Like("first".into())),
            vec![true, false]
        );
    }

    #[tokio::test]
    async fn test_like_when_signed_out_goes_to_login() {
        let harness = TestApp::anonymous();
        on_home(&harness).await;

        harness
            .dispatch(Intent::ToggleLike {
                slug: "first".into(),
            })
            .await
            .unwrap();

        assert_eq!(harness.client.count(Method::Post, "/posts/first/like/"), 0);
        assert_eq!(harness.location.assigned(), vec!["#login".to_string()]);
        assert_eq!(harness.surface.last_render(), Some(ViewContent::LoginForm));
    }

    #[tokio::test]
    async fn test_unsave_on_saved_list_removes_card() {
        let harness = TestApp::signed_in(Role::Reader);
        harness.client.respond_json(
            Method::Get,
            "/posts/saved/?limit=10&offset=0",
            paged(1, vec![post(2, "second", "bob")]),
        );
        harness
            .client
            .respond_json(Method::Post, "/posts/second/save/", json!({ "saved": false }));
        harness.visit("#saved-posts").await;

        harness
            .dispatch(Intent::ToggleSave {
                slug: "second".into(),
            })
            .await
            .unwrap();

        let patches = harness.surface.patches();
        assert!(patches.contains(&RegionPatch::Saved {
            slug: "second".into(),
            saved: false,
        }));
        assert!(patches.contains(&RegionPatch::RemovePost {
            slug: "second".into()
        }));
        assert!(harness.ctx().with_state(|state| state.listed.is_empty()));
    }

    #[tokio::test]
    async fn test_unsave_elsewhere_keeps_card() {
        let harness = TestApp::signed_in(Role::Reader);
        on_home(&harness).await;
        harness
            .client
            .respond_json(Method::Post, "/posts/first/save/", json!({ "saved": false }));

        harness
            .dispatch(Intent::ToggleSave {
                slug: "first".into(),
            })
            .await
            .unwrap();

        assert!(!harness
            .surface
            .patches()
            .iter()
            .any(|p| matches!(p, RegionPatch::RemovePost { .. })));
    }

    #[tokio::test]
    async fn test_delete_cancelled_sends_nothing() {
        let harness = TestApp::signed_in(Role::Author);
        on_home(&harness).await;
        harness.surface.answer_confirm(false);

        harness
            .dispatch(Intent::DeletePost {
                slug: "second".into(),
            })
            .await
            .unwrap();

        assert_eq!(harness.surface.confirm_prompts(), vec![CONFIRM_DELETE_POST.to_string()]);
        assert_eq!(harness.client.count(Method::Delete, "/posts/second/"), 0);
    }

    #[tokio::test]
    async fn test_delete_failure_reenables_button() {
        let harness = TestApp::signed_in(Role::Author);
        on_home(&harness).await;
        harness
            .client
            .respond_error(Method::Delete, "/posts/second/", 500, "");

        let result = harness
            .dispatch(Intent::DeletePost {
                slug: "second".into(),
            })
            .await;

        assert_matches!(result, Err(AppError::Api(err)) if err.status == Some(500));
        assert_eq!(
            busy_states(&harness, &Control::DeletePost("second".into())),
            vec![true, false]
        );
        let alert = harness.surface.alert_history().pop().unwrap();
        assert_eq!(alert.level, AlertLevel::Danger);
        assert_eq!(alert.message, "Error 500: Internal Server Error");
        assert_eq!(harness.client.count(Method::Get, HOME_POSTS), 1);
    }

    #[tokio::test]
    async fn test_delete_from_list_reloads_list() {
        let harness = TestApp::signed_in(Role::Author);
        on_home(&harness).await;
        harness
            .client
            .respond_json(Method::Delete, "/posts/second/", Value::Null);

        harness
            .dispatch(Intent::DeletePost {
                slug: "second".into(),
            })
            .await
            .unwrap();

        assert!(harness
            .surface
            .alert_messages()
            .contains(&POST_DELETED.to_string()));
        assert_eq!(harness.client.count(Method::Get, HOME_POSTS), 2);
        assert!(harness.location.assigned().is_empty());
    }

    #[tokio::test]
    async fn test_delete_from_detail_goes_home() {
        let harness = TestApp::signed_in(Role::Admin);
        on_detail(&harness).await;
        on_home(&harness).await;
        harness.visit("#posts/first").await;
        harness
            .client
            .respond_json(Method::Delete, "/posts/first/", Value::Null);

        harness
            .dispatch(Intent::DeletePost {
                slug: "first".into(),
            })
            .await
            .unwrap();

        assert_eq!(harness.location.assigned(), vec!["#/".to_string()]);
        assert_eq!(harness.client.count(Method::Get, HOME_POSTS), 2);
    }
}

/// Post form submission
mod submit_post_tests {
    use super::*;

    async fn on_create_form(harness: &TestApp) {
        harness.client.respond_json(
            Method::Get,
            "/categories/?limit=1000",
            paged(1, vec![category(1, "General")]),
        );
        harness
            .client
            .respond_json(Method::Get, "/tags/?limit=1000", json!([]));
        harness.visit("#create-post").await;
    }

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.into(),
            category: "1".into(),
            is_published: true,
            ..PostDraft::default()
        }
    }

    #[tokio::test]
    async fn test_create_sends_editor_markdown_and_opens_post() {
        let harness = TestApp::signed_in(Role::Author);
        harness.editors.type_content("# Hello\n\nworld");
        on_create_form(&harness).await;
        harness
            .client
            .respond_json(Method::Post, "/posts/", post(5, "hello", TEST_USERNAME));
        harness
            .client
            .respond_json(Method::Get, "/posts/hello/", post(5, "hello", TEST_USERNAME));

        harness
            .dispatch(Intent::SubmitPost(draft("Hello")))
            .await
            .unwrap();

        let request = harness.client.requests_to(Method::Post, "/posts/").pop().unwrap();
        let Some(RequestBody::Multipart(fields)) = request.body else {
            panic!("expected multipart body");
        };
        assert!(fields.contains(&("content".to_string(), FormValue::Text("# Hello\n\nworld".into()))));
        assert!(fields.contains(&("title".to_string(), FormValue::Text("Hello".into()))));

        assert!(harness
            .surface
            .alert_messages()
            .contains(&"Post created successfully!".to_string()));
        assert_eq!(harness.location.assigned(), vec!["#posts/hello".to_string()]);
        assert_eq!(harness.editors.counts().live(), 0);
    }

    #[tokio::test]
    async fn test_blank_title_is_refused_locally() {
        let harness = TestApp::signed_in(Role::Author);
        on_create_form(&harness).await;

        let result = harness.dispatch(Intent::SubmitPost(draft("   "))).await;

        assert_matches!(result, Err(AppError::Precondition(msg)) if msg == EMPTY_TITLE);
        assert_eq!(harness.client.count(Method::Post, "/posts/"), 0);
        let alert = harness.surface.alert_history().pop().unwrap();
        assert_eq!(alert.level, AlertLevel::Warning);
    }

    #[tokio::test]
    async fn test_submit_without_editor_reports_not_ready() {
        let harness = TestApp::signed_in(Role::Author);
        harness.editors.fail_create(true);
        on_create_form(&harness).await;

        let result = harness.dispatch(Intent::SubmitPost(draft("Hello"))).await;

        assert_matches!(result, Err(AppError::Editor(_)));
        assert!(harness
            .surface
            .alert_messages()
            .contains(&"Error: Content editor not ready.".to_string()));
        assert_eq!(harness.client.count(Method::Post, "/posts/"), 0);
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_form() {
        let harness = TestApp::signed_in(Role::Author);
        on_create_form(&harness).await;
        harness.client.respond_error(
            Method::Post,
            "/posts/",
            400,
            r#"{"title":["This field may not be blank."]}"#,
        );

        let result = harness.dispatch(Intent::SubmitPost(draft("Hello"))).await;

        assert_matches!(result, Err(AppError::Api(_)));
        assert_eq!(busy_states(&harness, &Control::PostForm), vec![true, false]);
        assert!(harness.location.assigned().is_empty());
        assert_eq!(harness.editors.counts().live(), 1);
    }
}

/// Comments on the detail view
mod comment_tests {
    use super::*;

    fn reply_patches(harness: &TestApp) -> Vec<Option<i64>> {
        harness
            .surface
            .patches()
            .into_iter()
            .filter_map(|patch| match patch {
                RegionPatch::ReplyForm { open } => Some(open),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_only_one_reply_form_open() {
        let harness = TestApp::signed_in(Role::Reader);
        on_detail(&harness).await;

        harness.dispatch(Intent::OpenReply { comment_id: 10 }).await.unwrap();
        harness.dispatch(Intent::OpenReply { comment_id: 11 }).await.unwrap();
        harness.dispatch(Intent::CancelReply).await.unwrap();

        assert_eq!(reply_patches(&harness), vec![Some(10), Some(11), None]);
        assert!(harness.ctx().with_state(|state| state.reply_open.is_none()));
    }

    #[tokio::test]
    async fn test_reopening_same_reply_closes_it() {
        let harness = TestApp::signed_in(Role::Reader);
        on_detail(&harness).await;

        harness.dispatch(Intent::OpenReply { comment_id: 10 }).await.unwrap();
        harness.dispatch(Intent::OpenReply { comment_id: 10 }).await.unwrap();

        assert_eq!(reply_patches(&harness), vec![Some(10), None]);
    }

    #[tokio::test]
    async fn test_reply_posts_and_reloads_comments() {
        let harness = TestApp::signed_in(Role::Reader);
        on_detail(&harness).await;
        harness
            .client
            .respond_json(Method::Post, "/comments/", json!({ "id": 12 }));
        harness.dispatch(Intent::OpenReply { comment_id: 10 }).await.unwrap();

        harness
            .dispatch(Intent::SubmitComment {
                parent: Some(10),
                content: "agreed".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            json_body(&harness, Method::Post, "/comments/"),
            json!({ "post": 1, "parent": 10, "content": "agreed" })
        );
        let patches = harness.surface.patches();
        assert!(patches.contains(&RegionPatch::ClearCommentInput { parent: Some(10) }));
        assert_eq!(reply_patches(&harness), vec![Some(10), None]);
        assert_eq!(
            harness.client.count(Method::Get, "/comments/by_post/?post_id=1"),
            2
        );
    }

    #[tokio::test]
    async fn test_blank_comment_is_refused() {
        let harness = TestApp::signed_in(Role::Reader);
        on_detail(&harness).await;

        let result = harness
            .dispatch(Intent::SubmitComment {
                parent: None,
                content: " \n ".into(),
            })
            .await;

        assert_matches!(result, Err(AppError::Precondition(msg)) if msg == EMPTY_COMMENT);
        assert_eq!(harness.client.count(Method::Post, "/comments/"), 0);
    }

    #[tokio::test]
    async fn test_signed_out_comment_goes_to_login() {
        let harness = TestApp::anonymous();
        on_detail(&harness).await;

        harness
            .dispatch(Intent::SubmitComment {
                parent: None,
                content: "hi".into(),
            })
            .await
            .unwrap();

        assert_eq!(harness.location.assigned(), vec!["#login".to_string()]);
        assert_eq!(harness.client.count(Method::Post, "/comments/"), 0);
    }

    #[tokio::test]
    async fn test_delete_comment_reloads_section() {
        let harness = TestApp::signed_in(Role::Reader);
        on_detail(&harness).await;
        harness
            .client
            .respond_json(Method::Delete, "/comments/11/", Value::Null);

        harness
            .dispatch(Intent::DeleteComment { comment_id: 11 })
            .await
            .unwrap();

        assert_eq!(harness.client.count(Method::Delete, "/comments/11/"), 1);
        assert_eq!(
            harness.client.count(Method::Get, "/comments/by_post/?post_id=1"),
            2
        );
        assert!(harness.location.assigned().is_empty());
    }
}

/// Sign-in and sign-out
mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_stores_session_and_goes_home() {
        let harness = TestApp::anonymous();
        harness.visit("#login").await;
        harness.client.respond_json(
            Method::Post,
            "/login/",
            login_response(TEST_TOKEN, TEST_USERNAME, TEST_USER_ID),
        );
        harness
            .client
            .respond_json(Method::Get, "/profile/", user(TEST_USER_ID, TEST_USERNAME, "author"));
        harness
            .client
            .respond_json(Method::Get, HOME_POSTS, paged(0, vec![]));

        harness
            .dispatch(Intent::Login {
                username: TEST_USERNAME.into(),
                password: "s3cret".into(),
            })
            .await
            .unwrap();

        let login = harness.client.requests_to(Method::Post, "/login/").pop().unwrap();
        assert!(!login.authenticated);
        let stored = harness.store.snapshot();
        assert_eq!(stored.get(KEY_TOKEN).map(String::as_str), Some(TEST_TOKEN));
        assert_eq!(stored.get(KEY_ROLE).map(String::as_str), Some("author"));
        assert!(harness.surface.alert_messages().contains(&LOGIN_SUCCESS.to_string()));
        assert_eq!(harness.location.assigned(), vec!["#/".to_string()]);
        assert_eq!(harness.client.count(Method::Get, HOME_POSTS), 1);
    }

    #[tokio::test]
    async fn test_login_failure_shows_server_message() {
        let harness = TestApp::anonymous();
        harness.visit("#login").await;
        harness.client.respond_error(
            Method::Post,
            "/login/",
            400,
            r#"{"detail":"Invalid credentials."}"#,
        );

        let result = harness
            .dispatch(Intent::Login {
                username: TEST_USERNAME.into(),
                password: "wrong".into(),
            })
            .await;

        assert_matches!(result, Err(AppError::Api(_)));
        let alert = harness.surface.alert_history().pop().unwrap();
        assert_eq!(alert.level, AlertLevel::Danger);
        assert_eq!(alert.message, "Invalid credentials.");
        assert!(!harness.ctx().session.is_authenticated());
        assert_eq!(busy_states(&harness, &Control::LoginForm), vec![true, false]);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let harness = TestApp::signed_in(Role::Author);
        on_home(&harness).await;
        harness
            .client
            .respond_json(Method::Post, "/auth/token/logout/", Value::Null);

        harness.dispatch(Intent::Logout).await.unwrap();

        assert!(harness.store.snapshot().is_empty());
        assert!(harness.surface.alert_messages().contains(&LOGGED_OUT.to_string()));
        assert_eq!(harness.location.assigned(), vec!["#login".to_string()]);
        assert_eq!(harness.surface.last_render(), Some(ViewContent::LoginForm));
    }

    #[tokio::test]
    async fn test_logout_survives_server_failure() {
        let harness = TestApp::signed_in(Role::Reader);
        on_home(&harness).await;
        harness
            .client
            .respond_error(Method::Post, "/auth/token/logout/", 500, "");

        harness.dispatch(Intent::Logout).await.unwrap();

        assert!(!harness.ctx().session.is_authenticated());
        assert_eq!(harness.ctx().current_hash(), "#login");
    }
}

/// Profile page
mod profile_tests {
    use super::*;

    async fn on_profile(harness: &TestApp) {
        harness
            .client
            .respond_json(Method::Get, "/profile/", user(TEST_USER_ID, TEST_USERNAME, "reader"));
        harness.visit("#profile").await;
    }

    #[tokio::test]
    async fn test_mismatched_passwords_are_refused() {
        let harness = TestApp::signed_in(Role::Reader);
        on_profile(&harness).await;

        let result = harness
            .dispatch(Intent::ChangePassword(PasswordChange {
                current: "old".into(),
                new: "new-one".into(),
                confirm: "new-two".into(),
            }))
            .await;

        assert_matches!(result, Err(AppError::Precondition(msg)) if msg == PASSWORD_MISMATCH);
        assert_eq!(harness.client.count(Method::Post, "/change-password/"), 0);
    }

    #[tokio::test]
    async fn test_password_change_signs_out() {
        let harness = TestApp::signed_in(Role::Reader);
        on_profile(&harness).await;
        harness
            .client
            .respond_json(Method::Post, "/change-password/", Value::Null);
        harness
            .client
            .respond_json(Method::Post, "/auth/token/logout/", Value::Null);

        harness
            .dispatch(Intent::ChangePassword(PasswordChange {
                current: "old".into(),
                new: "new-one".into(),
                confirm: "new-one".into(),
            }))
            .await
            .unwrap();

        assert_eq!(
            json_body(&harness, Method::Post, "/change-password/"),
            json!({ "current_password": "old", "new_password": "new-one" })
        );
        assert!(!harness.ctx().session.is_authenticated());
        assert_eq!(harness.location.assigned(), vec!["#login".to_string()]);
    }

    #[tokio::test]
    async fn test_bio_update_replaces_card() {
        let harness = TestApp::signed_in(Role::Reader);
        on_profile(&harness).await;
        let mut updated = user(TEST_USER_ID, TEST_USERNAME, "reader");
        updated["bio"] = json!("Writes about compilers.");
        harness.client.respond_json(Method::Patch, "/profile/", updated);

        harness
            .dispatch(Intent::UpdateProfile {
                bio: "Writes about compilers.".into(),
            })
            .await
            .unwrap();

        let card = harness
            .surface
            .patches()
            .into_iter()
            .find_map(|patch| match patch {
                RegionPatch::Profile(profile) => Some(profile),
                _ => None,
            })
            .unwrap();
        assert_eq!(card.user.bio.as_deref(), Some("Writes about compilers."));
    }

    #[tokio::test]
    async fn test_avatar_without_file_is_refused() {
        let harness = TestApp::signed_in(Role::Reader);
        on_profile(&harness).await;

        let result = harness.dispatch(Intent::UploadAvatar { file: None }).await;

        assert_matches!(result, Err(AppError::Precondition(_)));
        assert_eq!(harness.client.count(Method::Patch, "/profile/"), 0);
    }
}

/// Category administration
mod category_tests {
    use super::*;

    const CATEGORIES: &str = "/categories/?limit=1000";

    async fn on_categories(harness: &TestApp) {
        harness.client.respond_json(
            Method::Get,
            CATEGORIES,
            paged(2, vec![category(1, "General"), category(2, "Rust")]),
        );
        harness.visit("#admin/categories").await;
    }

    #[tokio::test]
    async fn test_edit_prefills_from_loaded_records() {
        let harness = TestApp::signed_in(Role::Admin);
        on_categories(&harness).await;

        harness.dispatch(Intent::EditCategory { id: 2 }).await.unwrap();

        let form = harness
            .surface
            .patches()
            .into_iter()
            .find_map(|patch| match patch {
                RegionPatch::CategoryForm(form) => Some(form),
                _ => None,
            })
            .unwrap();
        assert_matches!(form, CategoryForm::Open { editing: Some(c) } if c.name == "Rust");
    }

    #[tokio::test]
    async fn test_rename_puts_and_reloads() {
        let harness = TestApp::signed_in(Role::Admin);
        on_categories(&harness).await;
        harness
            .client
            .respond_json(Method::Put, "/categories/2/", category(2, "Rustlang"));

        harness
            .dispatch(Intent::SubmitCategory {
                id: Some(2),
                name: "  Rustlang ".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            json_body(&harness, Method::Put, "/categories/2/"),
            json!({ "name": "Rustlang" })
        );
        assert!(harness
            .surface
            .alert_messages()
            .contains(&"Category updated.".to_string()));
        assert_eq!(harness.client.count(Method::Get, CATEGORIES), 2);
        assert_matches!(
            harness.surface.last_render(),
            Some(ViewContent::CategoryAdmin(admin)) if admin.form == CategoryForm::Hidden
        );
    }

    #[tokio::test]
    async fn test_blank_name_is_refused() {
        let harness = TestApp::signed_in(Role::Admin);
        on_categories(&harness).await;

        let result = harness
            .dispatch(Intent::SubmitCategory {
                id: None,
                name: "   ".into(),
            })
            .await;

        assert_matches!(result, Err(AppError::Precondition(msg)) if msg == EMPTY_CATEGORY_NAME);
        assert_eq!(harness.client.count(Method::Post, "/categories/"), 0);
    }

    #[tokio::test]
    async fn test_delete_names_category_in_prompt() {
        let harness = TestApp::signed_in(Role::Admin);
        on_categories(&harness).await;
        harness.surface.answer_confirm(false);

        harness.dispatch(Intent::DeleteCategory { id: 1 }).await.unwrap();

        let prompt = harness.surface.confirm_prompts().pop().unwrap();
        assert!(prompt.contains("\"General\""));
        assert_eq!(harness.client.count(Method::Delete, "/categories/1/"), 0);
    }
}
