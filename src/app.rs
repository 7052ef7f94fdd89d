use std::time::Duration;

use thiserror::Error;

use crate::auth::{AuthService, RecoveryFlow};
use crate::chat::{ChatService, Responder};
use crate::config::AppConfig;
use crate::feed::FeedService;
use crate::profile::ProfileService;
use crate::storage::{self, SharedSlots, SlotStore};

#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to prepare data directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to open slot store: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Everything a front end needs, wired together explicitly. There is
/// no ambient context and no lazy lookup that could fail at use time:
/// callers hold this struct and pass the services down.
pub struct App {
    pub auth: AuthService,
    pub chat: ChatService,
    pub feed: FeedService,
    pub profile: ProfileService,
    store: SharedSlots,
    latency: Duration,
}

impl App {
    /// Open the durable store named in the config and build the
    /// services on top of it.
    pub fn init(config: &AppConfig) -> Result<Self, InitError> {
        storage::ensure_parent_dir(&config.database_path)?;
        let store = storage::shared(SlotStore::open(&config.database_path)?);
        log::info!("Slot store open at {}", config.database_path);
        Ok(Self::with_store(store, config))
    }

    /// Same wiring over a throwaway in-memory store.
    pub fn init_in_memory(config: &AppConfig) -> Result<Self, InitError> {
        let store = storage::shared(SlotStore::in_memory()?);
        Ok(Self::with_store(store, config))
    }

    fn with_store(store: SharedSlots, config: &AppConfig) -> Self {
        let latency = Duration::from_millis(config.simulated_latency_ms);
        let responder = Responder::new(
            &config.peer_name,
            config.reply_delay_min_ms,
            config.reply_delay_max_ms,
        );
        Self {
            auth: AuthService::new(store.clone(), latency),
            chat: ChatService::new(store.clone(), responder),
            feed: FeedService::new(),
            profile: ProfileService::new(),
            store,
            latency,
        }
    }

    /// Start a password-recovery wizard over the same account store.
    pub fn recovery(&self) -> RecoveryFlow {
        RecoveryFlow::new(self.store.clone(), self.latency)
    }
}
