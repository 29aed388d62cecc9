//! Key-value backends for the save slot
//!
//! Browser builds keep everything in `localStorage`; native builds keep
//! one JSON file per key in a directory.

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsValue;

    use crate::error::{Result, StorageError};
    use crate::persistence::KvStore;

    /// `window.localStorage`
    pub struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        /// Fails when storage is disabled (private mode, sandboxed iframe)
        pub fn open() -> Result<Self> {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StorageError::Unavailable)?;
            Ok(Self { storage })
        }
    }

    fn backend(err: JsValue) -> StorageError {
        StorageError::Backend(format!("{:?}", err))
    }

    impl KvStore for LocalStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.storage.get_item(key).map_err(backend)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.storage.set_item(key, value).map_err(backend)
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.storage.remove_item(key).map_err(backend)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use crate::error::Result;
    use crate::persistence::KvStore;

    /// A directory holding `<key>.json` files
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        /// Open (creating if needed) the directory at `dir`
        pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
            let dir = dir.as_ref().to_path_buf();
            fs::create_dir_all(&dir)?;
            Ok(Self { dir })
        }

        fn path(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{}.json", key))
        }
    }

    impl KvStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            match fs::read_to_string(self.path(key)) {
                Ok(raw) => Ok(Some(raw)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            // Write aside then rename so a crash never leaves half a record
            let tmp = self.dir.join(format!("{}.json.tmp", key));
            fs::write(&tmp, value)?;
            fs::rename(&tmp, self.path(key))?;
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            match fs::remove_file(self.path(key)) {
                Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
                _ => Ok(()),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::persistence::{Persistence, SAVE_KEY, SaveRecord};

        fn scratch(name: &str) -> PathBuf {
            let dir = std::env::temp_dir().join(format!("claw-doll-{}-{}", name, std::process::id()));
            let _ = fs::remove_dir_all(&dir);
            dir
        }

        #[test]
        fn test_file_store_round_trip() {
            let dir = scratch("kv");
            let mut store = FileStore::open(&dir).unwrap();
            assert_eq!(store.get("a").unwrap(), None);
            store.set("a", "{\"x\":1}").unwrap();
            assert_eq!(store.get("a").unwrap().as_deref(), Some("{\"x\":1}"));
            store.remove("a").unwrap();
            store.remove("a").unwrap();
            assert_eq!(store.get("a").unwrap(), None);
            let _ = fs::remove_dir_all(&dir);
        }

        #[test]
        fn test_save_survives_reopen() {
            let dir = scratch("reopen");
            let mut record = SaveRecord::fresh();
            record.coins = 42;
            record.best_streak = 3;

            let mut first = Persistence::new(FileStore::open(&dir).unwrap());
            first.save(&record).unwrap();
            assert!(dir.join(format!("{}.json", SAVE_KEY)).exists());

            let mut second = Persistence::new(FileStore::open(&dir).unwrap());
            assert_eq!(second.load(), record);
            let _ = fs::remove_dir_all(&dir);
        }
    }
}
