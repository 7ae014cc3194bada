//! MongoDB connector and the process-wide `Store`.

use std::sync::Arc;

use async_trait::async_trait;
use model::{EventDirectory, LookupUnavailable};
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use tracing::info;

use crate::config::StoreConfig;
use crate::manager::{ConnectionManager, Connector};
use crate::models::{BookingRow, EventRow};
use crate::DbError;

/// Name of the events collection.
pub const EVENTS: &str = "events";
/// Name of the bookings collection.
pub const BOOKINGS: &str = "bookings";

/// Connects to the configured MongoDB deployment.
pub struct MongoConnector {
    config: StoreConfig,
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = Database;

    /// Parse the connection string, cap the fail-fast timeouts, verify
    /// the deployment with a ping, and ensure the index layout before
    /// handing the database out.
    async fn connect(&self) -> Result<Database, DbError> {
        let mut options = ClientOptions::parse(&self.config.uri).await?;
        // Operations error promptly instead of buffering against a
        // server that may never come up.
        options.server_selection_timeout = Some(self.config.connect_timeout);
        options.connect_timeout = Some(self.config.connect_timeout);

        let client = Client::with_options(options)?;
        let database = client.database(&self.config.database);

        database.run_command(doc! { "ping": 1 }).await?;
        ensure_indexes(&database).await?;

        Ok(database)
    }
}

/// Create the index layout: unique `slug` on events, secondary
/// `eventId` on bookings. Idempotent; runs on every established
/// connection. The unique index is the source of truth for slug
/// collisions.
async fn ensure_indexes(database: &Database) -> Result<(), DbError> {
    let unique_slug = IndexModel::builder()
        .keys(doc! { "slug": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    database
        .collection::<EventRow>(EVENTS)
        .create_index(unique_slug)
        .await?;

    let booking_event = IndexModel::builder().keys(doc! { "eventId": 1 }).build();
    database
        .collection::<BookingRow>(BOOKINGS)
        .create_index(booking_event)
        .await?;

    info!("index layout ensured");
    Ok(())
}

/// The process-wide store: one shared, lazily connected database handle
/// behind the [`ConnectionManager`]. Cloning is cheap; clones share the
/// same connection state.
#[derive(Clone)]
pub struct Store {
    manager: Arc<ConnectionManager<MongoConnector>>,
}

impl Store {
    /// Build a store from explicit configuration. No I/O happens here;
    /// the first operation establishes the connection.
    pub fn new(config: StoreConfig) -> Self {
        // One attempt spans options parsing, the ping, and the index
        // bootstrap, so its bound is wider than the per-step timeout.
        let attempt_timeout = config.connect_timeout.saturating_mul(3);
        Self {
            manager: Arc::new(ConnectionManager::new(
                MongoConnector { config },
                attempt_timeout,
            )),
        }
    }

    /// Build a store from the environment (`MONGODB_URI`, `MONGODB_DB`).
    ///
    /// # Errors
    /// [`DbError::MissingConnectionString`] — fatal at process start.
    pub fn from_env() -> Result<Self, DbError> {
        Ok(Self::new(StoreConfig::from_env()?))
    }

    /// The shared database handle, connecting lazily.
    pub(crate) async fn database(&self) -> Result<Database, DbError> {
        self.manager.handle().await
    }
}

#[async_trait]
impl EventDirectory for Store {
    /// Storage failures surface as "could not check", never as
    /// "confirmed missing".
    async fn event_exists(&self, event_id: &str) -> Result<bool, LookupUnavailable> {
        crate::repository::events::event_exists(self, event_id)
            .await
            .map_err(|err| LookupUnavailable(err.to_string()))
    }
}
