//! This module provides a small local key/value store, which survives between runs

use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A local key/value store of strings
pub trait Storage {
    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>>;
    fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>>;
    /// Removes `key`. Removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), Box<dyn Error>>;
}


/// A store that keeps every key in its own file, inside a folder
#[derive(Clone, Debug, PartialEq)]
pub struct FileStorage {
    backing_folder: PathBuf,
}

impl FileStorage {
    /// Use a folder as a store. It will be created on the first write
    pub fn new(folder: &Path) -> Self {
        Self { backing_folder: PathBuf::from(folder) }
    }

    pub fn folder(&self) -> &Path {
        &self.backing_folder
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let filename = format!("{}.json", sanitize_filename::sanitize(key));
        self.backing_folder.join(filename)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Unable to read {:?}: {}", path, err).into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        std::fs::create_dir_all(&self.backing_folder)?;
        let path = self.path_for(key);
        if let Err(err) = std::fs::write(&path, value) {
            return Err(format!("Unable to save file {:?}: {}", path, err).into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Box<dyn Error>> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}


/// A store that only lives in memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let data = self.data.lock().map_err(|_| "poisoned storage")?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let mut data = self.data.lock().map_err(|_| "poisoned storage")?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Box<dyn Error>> {
        let mut data = self.data.lock().map_err(|_| "poisoned storage")?;
        data.remove(key);
        Ok(())
    }
}
