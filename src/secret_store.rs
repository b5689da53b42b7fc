use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// A secure storage for API tokens and other sensitive information
///
/// Provides functionality to store, retrieve, and manage secrets
/// in a JSON file located in the user's home directory.
#[derive(Debug)]
pub struct SecretStore {
    /// Map of secret keys to their values
    secrets: HashMap<String, SecretString>,
    /// Path to the secrets file
    file_path: PathBuf,
}

impl SecretStore {
    /// Creates a new SecretStore instance
    ///
    /// Initializes the store with the default path (~/.bloggen/secrets.json)
    /// and loads any existing secrets from the file.
    ///
    /// # Returns
    ///
    /// * `io::Result<Self>` - A new SecretStore instance or an IO error
    pub fn new() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not find home directory")
        })?;
        let file_path = home_dir.join(".bloggen").join("secrets.json");
        Self::with_path(file_path)
    }

    /// Creates a SecretStore backed by an explicit file path.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Location of the secrets JSON file
    ///
    /// # Returns
    ///
    /// * `io::Result<Self>` - A new SecretStore instance or an IO error
    pub fn with_path(file_path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut store = SecretStore {
            secrets: HashMap::new(),
            file_path,
        };

        store.load()?;
        Ok(store)
    }

    /// Loads secrets from the file system
    ///
    /// # Returns
    ///
    /// * `io::Result<()>` - Success or an IO error
    fn load(&mut self) -> io::Result<()> {
        match File::open(&self.file_path) {
            Ok(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                let secrets: HashMap<String, String> = serde_json::from_str(&contents)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
                self.secrets = secrets
                    .into_iter()
                    .map(|(key, value)| (key, SecretString::new(value)))
                    .collect();
                Ok(())
            }
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Saves the current secrets to the file system
    ///
    /// # Returns
    ///
    /// * `io::Result<()>` - Success or an IO error
    fn save(&self) -> io::Result<()> {
        let secrets: HashMap<String, String> = self
            .secrets
            .iter()
            .map(|(key, value)| (key.clone(), value.expose_secret().clone()))
            .collect();
        let contents = serde_json::to_string_pretty(&secrets)?;
        let mut file = File::create(&self.file_path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    /// Sets a secret value for the given key
    ///
    /// # Arguments
    ///
    /// * `key` - The key to store the secret under
    /// * `value` - The secret value to store
    ///
    /// # Returns
    ///
    /// * `io::Result<()>` - Success or an IO error
    pub fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.secrets
            .insert(key.to_string(), SecretString::new(value.to_string()));
        self.save()
    }

    /// Retrieves a secret value for the given key
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Returns
    ///
    /// * `Option<&String>` - The secret value if found, or None
    pub fn get(&self, key: &str) -> Option<&String> {
        self.secrets.get(key).map(|secret| secret.expose_secret())
    }

    /// Retrieves a secret value without exposing it as a String
    pub fn get_secret(&self, key: &str) -> Option<&SecretString> {
        self.secrets.get(key)
    }

    /// Deletes a secret with the given key
    ///
    /// # Arguments
    ///
    /// * `key` - The key to delete
    ///
    /// # Returns
    ///
    /// * `io::Result<()>` - Success or an IO error
    pub fn delete(&mut self, key: &str) -> io::Result<()> {
        self.secrets.remove(key);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn set_then_get_round_trips_a_secret() {
        let dir = tempdir().unwrap();
        let mut store = SecretStore::with_path(dir.path().join("secrets.json")).unwrap();
        store.set("replicate", "r8_value").unwrap();
        assert_eq!(store.get("replicate").map(String::as_str), Some("r8_value"));
    }

    #[test]
    fn secrets_survive_reopening_the_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        {
            let mut store = SecretStore::with_path(path.clone()).unwrap();
            store.set("replicate", "r8_persisted").unwrap();
        }
        let store = SecretStore::with_path(path).unwrap();
        assert_eq!(
            store.get("replicate").map(String::as_str),
            Some("r8_persisted")
        );
    }

    #[test]
    fn delete_removes_the_secret_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        let mut store = SecretStore::with_path(path.clone()).unwrap();
        store.set("replicate", "r8_gone").unwrap();
        store.delete("replicate").unwrap();
        assert_eq!(store.get("replicate"), None);

        let reopened = SecretStore::with_path(path).unwrap();
        assert_eq!(reopened.get("replicate"), None);
    }

    #[test]
    fn get_returns_none_for_unknown_keys() {
        let dir = tempdir().unwrap();
        let store = SecretStore::with_path(dir.path().join("secrets.json")).unwrap();
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("secrets.json");
        let mut store = SecretStore::with_path(path.clone()).unwrap();
        store.set("replicate", "r8_nested").unwrap();
        assert!(path.exists());
    }
}
