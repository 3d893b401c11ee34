//! Local email/password auth emulator.
//!
//! Accounts are keyed by lowercased email and store a salted SHA-256 digest
//! of the password. Failures carry the raw text a managed auth backend
//! would return, so the workflow-side message mapping sees realistic input.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{AuthService, AuthServiceError};
use crate::domain::{LoginCredentials, ProfileChange, Session, UserId};

use super::LocalDataDir;

const AUTH_FILE: &str = "auth.json";
const MIN_PASSWORD_LEN: usize = 6;

const BADLY_FORMATTED_EMAIL: &str = "The email address is badly formatted.";
const WEAK_PASSWORD: &str = "Password should be at least 6 characters";
const NO_USER_RECORD: &str =
    "There is no user record corresponding to this identifier. The user may have been deleted.";
const INVALID_PASSWORD: &str =
    "The password is invalid or the user does not have a password.";
const EMAIL_IN_USE: &str = "The email address is already in use by another account.";
const CONFIGURATION_NOT_FOUND: &str =
    "An internal error has occurred. [ CONFIGURATION_NOT_FOUND ]";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Compiled email shape check.
///
/// # Panics
///
/// Panics on first use if the constant pattern fails to compile; the
/// sign-in and registration tests exercise it.
fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    user_id: String,
    email: String,
    salt: String,
    password_digest: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

impl Account {
    fn session(&self) -> Result<Session, AuthServiceError> {
        let user_id = UserId::new(&self.user_id).map_err(|err| {
            AuthServiceError::unavailable(format!("corrupt account record: {err}"))
        })?;
        Ok(Session {
            user_id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
        })
    }

    fn password_matches(&self, password: &str) -> bool {
        digest(&self.salt, password) == self.password_digest
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthRecords {
    #[serde(default)]
    accounts: BTreeMap<String, Account>,
    #[serde(default)]
    signed_in: Option<String>,
}

impl AuthRecords {
    fn current(&self) -> Option<&Account> {
        let key = self.signed_in.as_ref()?;
        self.accounts.get(key)
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Auth capability backed by memory and, optionally, `auth.json`.
#[derive(Debug)]
pub struct LocalAuthService {
    records: Mutex<AuthRecords>,
    data_dir: Option<LocalDataDir>,
    configured: bool,
}

impl LocalAuthService {
    /// Empty account table with no persistence.
    pub fn in_memory() -> Self {
        Self {
            records: Mutex::new(AuthRecords::default()),
            data_dir: None,
            configured: true,
        }
    }

    /// Accounts persisted under `data_dir`, seeded from `auth.json`.
    pub fn open(data_dir: LocalDataDir) -> Result<Self, AuthServiceError> {
        let records = data_dir
            .read_json::<AuthRecords>(AUTH_FILE)
            .map_err(|err| AuthServiceError::unavailable(err.to_string()))?
            .unwrap_or_default();
        Ok(Self {
            records: Mutex::new(records),
            data_dir: Some(data_dir),
            configured: true,
        })
    }

    /// Emulates an app that was never registered with the provider; every
    /// call fails with `CONFIGURATION_NOT_FOUND`.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::in_memory()
        }
    }

    fn lock(&self) -> MutexGuard<'_, AuthRecords> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_configured(&self) -> Result<(), AuthServiceError> {
        if self.configured {
            Ok(())
        } else {
            Err(AuthServiceError::rejected(CONFIGURATION_NOT_FOUND))
        }
    }

    fn persist(&self, records: &AuthRecords) -> Result<(), AuthServiceError> {
        let Some(data_dir) = &self.data_dir else {
            return Ok(());
        };
        data_dir
            .write_json(AUTH_FILE, records)
            .map_err(|err| AuthServiceError::unavailable(err.to_string()))
    }

    /// Persist `candidate`, then make it the live table. A failed write
    /// leaves `records` as it was.
    fn commit(
        &self,
        records: &mut AuthRecords,
        candidate: AuthRecords,
    ) -> Result<(), AuthServiceError> {
        self.persist(&candidate)?;
        *records = candidate;
        Ok(())
    }
}

#[async_trait]
impl AuthService for LocalAuthService {
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<Session, AuthServiceError> {
        self.ensure_configured()?;
        if !email_regex().is_match(credentials.email().trim()) {
            return Err(AuthServiceError::rejected(BADLY_FORMATTED_EMAIL));
        }
        let key = account_key(credentials.email());
        let mut records = self.lock();
        let account = records
            .accounts
            .get(&key)
            .ok_or_else(|| AuthServiceError::rejected(NO_USER_RECORD))?;
        if !account.password_matches(credentials.password()) {
            return Err(AuthServiceError::rejected(INVALID_PASSWORD));
        }
        let session = account.session()?;
        let mut candidate = records.clone();
        candidate.signed_in = Some(key);
        self.commit(&mut records, candidate)?;
        debug!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    async fn create_account(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Session, AuthServiceError> {
        self.ensure_configured()?;
        if !email_regex().is_match(credentials.email().trim()) {
            return Err(AuthServiceError::rejected(BADLY_FORMATTED_EMAIL));
        }
        if credentials.password().chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthServiceError::rejected(WEAK_PASSWORD));
        }
        let key = account_key(credentials.email());
        let mut records = self.lock();
        if records.accounts.contains_key(&key) {
            return Err(AuthServiceError::rejected(EMAIL_IN_USE));
        }
        let salt = Uuid::new_v4().simple().to_string();
        let account = Account {
            user_id: Uuid::new_v4().simple().to_string(),
            email: credentials.email().trim().to_owned(),
            password_digest: digest(&salt, credentials.password()),
            salt,
            display_name: None,
            photo_url: None,
        };
        let session = account.session()?;
        let mut candidate = records.clone();
        candidate.accounts.insert(key.clone(), account);
        candidate.signed_in = Some(key);
        self.commit(&mut records, candidate)?;
        debug!(user_id = %session.user_id, "account created");
        Ok(session)
    }

    async fn update_profile(&self, change: &ProfileChange) -> Result<Session, AuthServiceError> {
        self.ensure_configured()?;
        let mut records = self.lock();
        let key = records.signed_in.clone().ok_or(AuthServiceError::NoSession)?;
        let mut candidate = records.clone();
        let account = candidate
            .accounts
            .get_mut(&key)
            .ok_or(AuthServiceError::NoSession)?;
        account.display_name = Some(change.display_name.clone());
        account.photo_url.clone_from(&change.photo_url);
        let session = account.session()?;
        self.commit(&mut records, candidate)?;
        Ok(session)
    }

    async fn sign_out(&self) {
        let mut records = self.lock();
        if records.signed_in.take().is_none() {
            return;
        }
        if let Err(err) = self.persist(&records) {
            warn!(error = %err, "failed to persist sign-out");
        }
        debug!("signed out");
    }

    fn current_session(&self) -> Option<Session> {
        let records = self.lock();
        let account = records.current()?;
        match account.session() {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable session");
                None
            }
        }
    }
}
