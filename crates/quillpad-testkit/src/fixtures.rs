//! JSON record fixtures as the API would send them.

use serde_json::{json, Value};

/// Token of the fixture session.
pub const TEST_TOKEN: &str = "tok-7f3a";
/// Username of the fixture session.
pub const TEST_USERNAME: &str = "ada";
/// User id of the fixture session.
pub const TEST_USER_ID: i64 = 7;

/// A published post by `author`.
pub fn post(id: i64, slug: &str, author: &str) -> Value {
    json!({
        "id": id,
        "slug": slug,
        "title": format!("Post {id}"),
        "content": format!("Body of **{slug}**"),
        "author": author,
        "category": "general",
        "tags": ["rust"],
        "comment_count": 0,
        "view_count": 3,
        "likes": [],
        "is_published": true,
        "featured": false,
        "created_at": "2024-03-01T12:00:00Z"
    })
}

/// A comment on `post_id`, optionally replying to `parent`.
pub fn comment(id: i64, post_id: i64, parent: Option<i64>, author: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "post": post_id,
        "parent": parent,
        "author": author,
        "content": format!("comment {id}"),
        "created_at": created_at
    })
}

/// A profile record.
pub fn user(id: i64, username: &str, role: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "bio": "",
        "role": role,
        "is_staff": role == "admin"
    })
}

/// A category record.
pub fn category(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "slug": name.to_lowercase() })
}

/// A tag record.
pub fn tag(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "slug": name.to_lowercase(), "post_count": 1 })
}

/// A `{count, results}` page.
pub fn paged(count: u64, results: Vec<Value>) -> Value {
    json!({ "count": count, "next": null, "previous": null, "results": results })
}

/// A `POST /login/` response.
pub fn login_response(token: &str, username: &str, user_id: i64) -> Value {
    json!({ "token": token, "username": username, "user_id": user_id })
}
