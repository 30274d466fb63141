use agent_tools::tool;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

/// Greet a user.
#[tool(default(greeting = "Hello"))]
pub fn greet_user(name: String, greeting: String) -> Value {
    debug!(%name, %greeting, "greeting user");
    json!({ "message": format!("{greeting}, {name}!"), "success": true })
}

/// Profile returned by [`get_user_info`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub name: String,
    pub email: Option<String>,
}

/// Look up a user's profile.
///
/// The email address is omitted unless requested.
#[tool(
    default(include_email = true),
    describe(user_id = "user identifier", include_email = "include the email address")
)]
pub fn get_user_info(user_id: i64, include_email: bool) -> UserInfo {
    debug!(user_id, include_email, "looking up user");
    UserInfo {
        user_id,
        name: "Zhang San".to_owned(),
        email: include_email.then(|| "zhangsan@example.com".to_owned()),
    }
}

/// Create a new user account.
#[tool(default(age = 18, is_active = true))]
pub fn create_user(username: String, email: String, age: u32, is_active: bool) -> Value {
    debug!(%username, %email, age, "creating user");
    json!({
        "user_id": 123,
        "username": username,
        "email": email,
        "age": age,
        "is_active": is_active,
        "status": "created",
    })
}
