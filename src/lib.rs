//! Application core for EsporteON: simulated chat, simulated
//! authentication, password recovery, social feed and profile
//! settings. Headless: a UI layer sits on top of the services
//! exposed here.

pub mod app;
pub mod auth;
pub mod chat;
pub mod common;
pub mod config;
pub mod feed;
pub mod profile;
pub mod storage;

pub use app::App;
pub use chat::ChatService;
pub use common::Message;
pub use config::AppConfig;
