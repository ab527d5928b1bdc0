use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{AccountError, AccountRecord, AccountStore, Identity, MemoryStore};

/// On-disk layout of the accounts file
#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountsFile {
    users: Vec<AccountRecord>,
}

/// Accounts kept in a pretty-printed JSON file
///
/// The whole file is loaded at open and rewritten after every change. A
/// change whose write fails is rolled back in memory, so the store never
/// reports something it has not persisted.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    accounts: MemoryStore,
}

impl FileStore {
    /// Open the accounts file, or start empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AccountError> {
        let path = path.into();

        let records = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            let file: AccountsFile = serde_json::from_str(&json)?;
            file.users
        } else {
            Vec::new()
        };

        log::info!("loaded {} accounts from {:?}", records.len(), path);

        Ok(Self {
            path,
            accounts: MemoryStore::from_records(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), AccountError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = AccountsFile {
            users: self.accounts.records().to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl AccountStore for FileStore {
    fn register(&mut self, username: &str, password: &str) -> Result<(), AccountError> {
        self.accounts.register(username, password)?;

        if let Err(err) = self.save() {
            self.accounts.remove(username);
            return Err(err);
        }
        log::info!("registered account '{}'", username);
        Ok(())
    }

    fn login(&mut self, username: &str, password: &str) -> Result<Identity, AccountError> {
        self.accounts.login(username, password)
    }

    fn update_high_score(&mut self, username: &str, score: u32) -> Result<bool, AccountError> {
        let previous = self.accounts.high_score(username)?;
        if !self.accounts.update_high_score(username, score)? {
            return Ok(false);
        }

        if let Err(err) = self.save() {
            self.accounts.set_high_score(username, previous);
            return Err(err);
        }
        Ok(true)
    }

    fn high_score(&self, username: &str) -> Result<u32, AccountError> {
        self.accounts.high_score(username)
    }

    fn load_all(&self) -> Result<Vec<AccountRecord>, AccountError> {
        self.accounts.load_all()
    }
}
