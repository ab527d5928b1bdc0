use super::{
    hash_password, validate_credentials, verify_password, AccountError, AccountRecord,
    AccountStore, Identity,
};

/// Accounts held in memory, in registration order
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<AccountRecord>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_records(records: Vec<AccountRecord>) -> Self {
        Self {
            records,
            unavailable: false,
        }
    }

    pub(crate) fn records(&self) -> &[AccountRecord] {
        &self.records
    }

    /// Make every call fail with a persistence error, simulating an outage
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    fn check_available(&self) -> Result<(), AccountError> {
        if self.unavailable {
            return Err(AccountError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }

    fn find(&self, username: &str) -> Option<&AccountRecord> {
        self.records.iter().find(|r| r.username == username)
    }

    /// Undo a registration whose write failed
    pub(crate) fn remove(&mut self, username: &str) {
        self.records.retain(|r| r.username != username);
    }

    /// Restore a score whose write failed
    pub(crate) fn set_high_score(&mut self, username: &str, score: u32) {
        if let Some(record) = self.records.iter_mut().find(|r| r.username == username) {
            record.high_score = score;
        }
    }
}

impl AccountStore for MemoryStore {
    fn register(&mut self, username: &str, password: &str) -> Result<(), AccountError> {
        validate_credentials(username, password)?;
        self.check_available()?;

        if self.find(username).is_some() {
            return Err(AccountError::UsernameTaken(username.to_string()));
        }

        self.records.push(AccountRecord {
            username: username.to_string(),
            password_hash: hash_password(password),
            high_score: 0,
        });
        Ok(())
    }

    fn login(&mut self, username: &str, password: &str) -> Result<Identity, AccountError> {
        if username.is_empty() || password.is_empty() {
            return Err(AccountError::EmptyCredentials);
        }
        self.check_available()?;

        let record = self
            .find(username)
            .ok_or_else(|| AccountError::UnknownUser(username.to_string()))?;
        if !verify_password(password, &record.password_hash) {
            return Err(AccountError::WrongPassword);
        }

        Ok(Identity {
            username: record.username.clone(),
            high_score: record.high_score,
        })
    }

    fn update_high_score(&mut self, username: &str, score: u32) -> Result<bool, AccountError> {
        self.check_available()?;

        match self.records.iter_mut().find(|r| r.username == username) {
            Some(record) if score > record.high_score => {
                record.high_score = score;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn high_score(&self, username: &str) -> Result<u32, AccountError> {
        self.check_available()?;
        Ok(self.find(username).map_or(0, |r| r.high_score))
    }

    fn load_all(&self) -> Result<Vec<AccountRecord>, AccountError> {
        self.check_available()?;
        Ok(self.records.clone())
    }
}
