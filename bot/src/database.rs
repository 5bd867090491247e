//! Settings store: per-group retention strings and registered users.
//!
//! The core only talks to [`SettingsStore`]; [`Database`] is the MongoDB
//! implementation used by the running bot.

use std::time::Duration;

use futures_util::future::BoxFuture;
use mongodb::bson::{doc, DateTime};
use mongodb::options::{ClientOptions, IndexOptions, UpdateOptions};
use mongodb::{Client, Collection, IndexModel};

use crate::error::Result;
use crate::models::{GroupSettings, UserRecord, SETTINGS_COLLECTION, USERS_COLLECTION};

pub trait SettingsStore: Send + Sync + 'static {
    /// Registers a user. Re-registering keeps a single row.
    fn upsert_user(&self, user_id: i64) -> BoxFuture<'_, Result<()>>;

    /// Last write wins.
    fn set_retention(&self, chat_id: i64, spec: String) -> BoxFuture<'_, Result<()>>;

    /// Removing a missing row is not an error.
    fn clear_retention(&self, chat_id: i64) -> BoxFuture<'_, Result<()>>;

    /// `None` when the group has no (or an empty) retention string.
    fn retention(&self, chat_id: i64) -> BoxFuture<'_, Result<Option<String>>>;

    fn count_users(&self) -> BoxFuture<'_, Result<u64>>;

    fn count_groups(&self) -> BoxFuture<'_, Result<u64>>;
}

#[derive(Clone)]
pub struct Database {
    users: Collection<UserRecord>,
    settings: Collection<GroupSettings>,
}

impl Database {
    /// Connects, pings the server and makes sure the key indexes exist.
    /// The driver connects lazily, so the ping is what surfaces an
    /// unreachable server at startup.
    pub async fn init(uri: &str, db_name: &str) -> Result<Self> {
        let mut client_options = ClientOptions::parse(uri).await?;
        client_options.app_name = Some("autodelete-bot".to_string());
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }, None).await?;

        let database = Self {
            users: db.collection(USERS_COLLECTION),
            settings: db.collection(SETTINGS_COLLECTION),
        };
        database.ensure_indexes().await?;

        log::info!("Connected to MongoDB database {}", db_name);
        Ok(database)
    }

    async fn ensure_indexes(&self) -> Result<()> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "user_id": 1 })
                    .options(unique())
                    .build(),
                None,
            )
            .await?;
        self.settings
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "chat_id": 1 })
                    .options(unique())
                    .build(),
                None,
            )
            .await?;
        Ok(())
    }

    fn upsert() -> UpdateOptions {
        UpdateOptions::builder().upsert(true).build()
    }
}

impl SettingsStore for Database {
    fn upsert_user(&self, user_id: i64) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            // First-seen time is kept; the filter supplies `user_id` on insert.
            self.users
                .update_one(
                    doc! { "user_id": user_id },
                    doc! { "$setOnInsert": { "joined_at": DateTime::now() } },
                    Self::upsert(),
                )
                .await?;
            Ok(())
        })
    }

    fn set_retention(&self, chat_id: i64, spec: String) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.settings
                .update_one(
                    doc! { "chat_id": chat_id },
                    doc! { "$set": { "chat_id": chat_id, "delete_time": spec } },
                    Self::upsert(),
                )
                .await?;
            Ok(())
        })
    }

    fn clear_retention(&self, chat_id: i64) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.settings
                .delete_one(doc! { "chat_id": chat_id }, None)
                .await?;
            Ok(())
        })
    }

    fn retention(&self, chat_id: i64) -> BoxFuture<'_, Result<Option<String>>> {
        Box::pin(async move {
            let found = self
                .settings
                .find_one(doc! { "chat_id": chat_id }, None)
                .await?;
            Ok(found
                .map(|settings| settings.delete_time)
                .filter(|spec| !spec.is_empty()))
        })
    }

    fn count_users(&self) -> BoxFuture<'_, Result<u64>> {
        Box::pin(async move { Ok(self.users.count_documents(None, None).await?) })
    }

    fn count_groups(&self) -> BoxFuture<'_, Result<u64>> {
        Box::pin(async move { Ok(self.settings.count_documents(None, None).await?) })
    }
}
