pub mod certificate;
pub mod config;
pub mod error;
pub mod export;
pub mod handlers;
pub mod lifecycle;
pub mod notify;
pub mod schema;
pub mod state;
pub mod stats;
pub mod storage;
