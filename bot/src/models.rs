use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

pub const USERS_COLLECTION: &str = "users";
pub const SETTINGS_COLLECTION: &str = "settings";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    pub user_id: i64,
    pub joined_at: DateTime,
}

/// One row per group with auto-deletion switched on.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroupSettings {
    pub chat_id: i64,
    pub delete_time: String,
}
