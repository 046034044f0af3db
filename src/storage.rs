use folio_core::KeyValueStore;
use web_sys as web;

/// `window.localStorage`; when storage is unavailable reads miss and writes are dropped.
pub struct LocalStore {
    storage: Option<web::Storage>,
}

impl LocalStore {
    pub fn open() -> Self {
        let storage = web::window().and_then(|w| match w.local_storage() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("[storage] localStorage unavailable: {:?}", e);
                None
            }
        });
        Self { storage }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(key, value) {
                log::warn!("[storage] failed to write {}: {:?}", key, e);
            }
        }
    }
}
