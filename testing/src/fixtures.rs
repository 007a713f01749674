//! JSON bodies shaped like the server's responses.

use serde_json::{Value, json};

/// Session cookie issued on login/register.
pub const SESSION_COOKIE: &str = "session=test-session-token; HttpOnly; Path=/";

/// `Cookie` header value that [`SESSION_COOKIE`] produces.
pub const SESSION_COOKIE_HEADER: &str = "session=test-session-token";

/// Creation time used by [`project`].
pub const CREATED_AT: &str = "2025-01-01T09:00:00";

/// A serialized user.
#[must_use]
pub fn user(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "created_at": CREATED_AT,
    })
}

/// `{"message": ..., "user": ...}` as login and register return it.
#[must_use]
pub fn user_body(id: i64, username: &str) -> Value {
    json!({ "message": "Login successful", "user": user(id, username) })
}

/// A serialized project.
#[must_use]
pub fn project(id: i64, name: &str, status: &str) -> Value {
    project_created_at(id, name, status, CREATED_AT)
}

/// A serialized project with an explicit creation time.
#[must_use]
pub fn project_created_at(id: i64, name: &str, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "data_source": "",
        "status": status,
        "created_at": created_at,
        "model_config": null,
        "user_id": 1,
    })
}

/// `{"project": ...}`.
#[must_use]
pub fn project_body(project: Value) -> Value {
    json!({ "project": project })
}

/// `{"projects": [...]}`.
#[must_use]
pub fn projects_body(projects: Vec<Value>) -> Value {
    json!({ "projects": projects })
}

/// `{"error": message}`.
#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({ "error": message })
}

/// `{"message": message}`.
#[must_use]
pub fn message_body(message: &str) -> Value {
    json!({ "message": message })
}
