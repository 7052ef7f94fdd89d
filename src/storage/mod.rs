pub mod slots;

pub use slots::SlotStore;

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Slot store handle shared between services. `rusqlite::Connection`
/// is not `Sync`, so access is serialized behind a mutex.
pub type SharedSlots = Arc<Mutex<SlotStore>>;

/// Wrap a store for shared use.
pub fn shared(store: SlotStore) -> SharedSlots {
    Arc::new(Mutex::new(store))
}

/// Ensure the directory holding `path` exists.
pub fn ensure_parent_dir(path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
