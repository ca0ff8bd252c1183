use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db;
use crate::db::repository::{CustomerRepository, MenuItemRepository, NotificationRepository};
use crate::notify::NotificationEmitter;
use crate::orders::OrderService;
use crate::sequence::SequenceAllocator;

/// Shared application state, one instance cloned into every handler.
///
/// All fields are cheap to clone: repositories wrap the same database
/// handle and the services are `Arc`-backed or channel-backed.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub orders: OrderService,
    pub menu: MenuItemRepository,
    pub customers: CustomerRepository,
    pub notifications: NotificationRepository,
    pub allocator: SequenceAllocator,
    pub emitter: NotificationEmitter,
    jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Initialize against the on-disk database under `config.work_dir`.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(config.database_path())?;
        let database = db::connect(&config.database_path().to_string_lossy()).await?;
        Ok(Self::from_parts(config.clone(), database))
    }

    /// Initialize against an in-memory database, for tests.
    pub async fn initialize_in_memory(config: &Config) -> anyhow::Result<Self> {
        let database = db::connect_memory().await?;
        Ok(Self::from_parts(config.clone(), database))
    }

    fn from_parts(config: Config, database: Surreal<Db>) -> Self {
        let notifications = NotificationRepository::new(database.clone());
        let emitter = NotificationEmitter::start(notifications.clone());
        let orders = OrderService::new(database.clone(), emitter.clone());
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            orders,
            menu: MenuItemRepository::new(database.clone()),
            customers: CustomerRepository::new(database.clone()),
            notifications,
            allocator: SequenceAllocator::new(database.clone()),
            emitter,
            jwt_service,
            config,
            db: database,
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
