mod db;

pub use db::DbContext;

use crate::lifecycle::LifecycleManager;
use crate::storage::FileStore;

/// Shared application state handed to every handler via `web::Data`.
pub struct AppState {
    pub db: DbContext,
    pub files: FileStore,
    pub lifecycle: LifecycleManager,
}
