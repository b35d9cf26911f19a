//! Sessions for vendors and staff.
//!
//! There is no real identity check. Signing in stores a flag and an email per
//! role in a small key-value store; a role is authenticated while both are
//! present. [`SessionContext`] reads the store once at start-up and keeps it
//! in step on login, registration and logout.

use crate::routes::Route;
use crate::types::VendorProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Value stored under the flag key of a signed-in role
const SIGNED_IN: &str = "true";

// ============================================================================
// Errors
// ============================================================================

/// Key-value store failures
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings
    #[error("session storage is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    /// A writer panicked while holding the lock
    #[error("session storage lock poisoned")]
    Poisoned,
}

/// Rejected login or registration input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    /// A required field is blank
    #[error("Please fill in all fields")]
    MissingFields,

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Terms and conditions not ticked
    #[error("Please accept the terms and conditions")]
    TermsNotAccepted,
}

/// A guarded page was visited without a session
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No session for the role; the visitor is sent to `redirect`
    #[error("{role} sign-in required, redirecting to {redirect}")]
    Unauthenticated {
        /// Role the page requires
        role: Role,
        /// Login page for that role
        redirect: Route,
    },
}

/// Failure of a session operation
#[derive(Error, Debug)]
pub enum SessionError {
    /// The form was rejected; nothing was stored
    #[error(transparent)]
    Form(#[from] FormError),

    /// The store could not be updated
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// ============================================================================
// Key-value stores
// ============================================================================

/// String key-value storage backing the session flags
pub trait KeyValueStore: Send + Sync {
    /// Reads a value
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes a value; deleting a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, forgotten when the process exits
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Store persisted as a JSON object in a file
///
/// The file is read once on open and rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read or
    /// parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => HashMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened session file");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(
        &self,
        change: impl FnOnce(&mut HashMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        change(&mut entries);
        let text = serde_json::to_string_pretty(&*entries)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// Who is signed in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Publisher or bookseller reserving stalls
    Vendor,
    /// Fair employee
    Staff,
}

impl Role {
    /// Key holding the signed-in flag
    #[must_use]
    pub const fn flag_key(self) -> &'static str {
        match self {
            Self::Vendor => "publicUser",
            Self::Staff => "employeeUser",
        }
    }

    /// Key holding the signed-in email
    #[must_use]
    pub const fn email_key(self) -> &'static str {
        match self {
            Self::Vendor => "publicEmail",
            Self::Staff => "employeeEmail",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vendor => f.write_str("vendor"),
            Self::Staff => f.write_str("staff"),
        }
    }
}

/// A signed-in role
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Signed-in role
    pub role: Role,
    /// Email given at sign-in
    pub email: String,
}

/// Login form input
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email
    pub email: String,
    /// Password (never checked)
    pub password: String,
}

impl LoginForm {
    /// Checks that both fields are filled in
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingFields`] if either field is blank.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(())
    }
}

/// Vendor registration form input
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Business or publishing house name
    pub business_name: String,
    /// Contact person
    pub contact_person: String,
    /// Email
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Password (never checked)
    pub password: String,
    /// Password, typed again
    pub confirm_password: String,
    /// Terms and conditions ticked
    pub accept_terms: bool,
}

impl RegistrationForm {
    /// Validates the form
    ///
    /// # Errors
    ///
    /// Blank fields are reported first, then a password mismatch, then
    /// unaccepted terms.
    pub fn validate(&self) -> Result<(), FormError> {
        let required = [
            self.business_name.trim(),
            self.contact_person.trim(),
            self.email.trim(),
            self.phone.trim(),
            self.password.as_str(),
            self.confirm_password.as_str(),
        ];
        if required.iter().any(|field| field.is_empty()) {
            return Err(FormError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if !self.accept_terms {
            return Err(FormError::TermsNotAccepted);
        }
        Ok(())
    }
}

/// Per-role sessions over a key-value store
pub struct SessionContext<S> {
    store: S,
    vendor: Option<Session>,
    staff: Option<Session>,
}

impl<S: KeyValueStore> SessionContext<S> {
    /// Reads both roles' sessions from the store
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be read.
    pub fn load(store: S) -> Result<Self, StorageError> {
        let vendor = Self::read(&store, Role::Vendor)?;
        let staff = Self::read(&store, Role::Staff)?;
        tracing::debug!(vendor = vendor.is_some(), staff = staff.is_some(), "Loaded sessions");
        Ok(Self {
            store,
            vendor,
            staff,
        })
    }

    fn read(store: &S, role: Role) -> Result<Option<Session>, StorageError> {
        let flag = store.get(role.flag_key())?;
        let email = store.get(role.email_key())?;
        Ok(match (flag.as_deref(), email) {
            (Some(SIGNED_IN), Some(email)) if !email.is_empty() => Some(Session { role, email }),
            _ => None,
        })
    }

    fn slot(&mut self, role: Role) -> &mut Option<Session> {
        match role {
            Role::Vendor => &mut self.vendor,
            Role::Staff => &mut self.staff,
        }
    }

    fn sign_in(&mut self, role: Role, email: &str) -> Result<Session, StorageError> {
        let email = email.trim();
        self.store.set(role.flag_key(), SIGNED_IN)?;
        self.store.set(role.email_key(), email)?;

        let session = Session {
            role,
            email: email.to_string(),
        };
        *self.slot(role) = Some(session.clone());
        tracing::info!(%role, email = %session.email, "Signed in");
        Ok(session)
    }

    /// Signs a role in
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Form`] for blank fields (nothing is stored) or
    /// [`SessionError::Storage`] if the store cannot be written.
    pub fn login(&mut self, role: Role, form: &LoginForm) -> Result<Session, SessionError> {
        form.validate()?;
        Ok(self.sign_in(role, &form.email)?)
    }

    /// Registers a vendor and signs them in
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Form`] for invalid input (nothing is stored) or
    /// [`SessionError::Storage`] if the store cannot be written.
    pub fn register(&mut self, form: &RegistrationForm) -> Result<VendorProfile, SessionError> {
        form.validate()?;
        self.sign_in(Role::Vendor, &form.email)?;
        Ok(VendorProfile {
            business_name: form.business_name.trim().to_string(),
            contact_person: form.contact_person.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            genres: Vec::new(),
        })
    }

    /// The session for `role`, if signed in
    #[must_use]
    pub fn current(&self, role: Role) -> Option<&Session> {
        match role {
            Role::Vendor => self.vendor.as_ref(),
            Role::Staff => self.staff.as_ref(),
        }
    }

    /// The session for `role`, or where to send the visitor
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] with the role's login page.
    pub fn require(&self, role: Role) -> Result<&Session, AuthError> {
        self.current(role).ok_or(AuthError::Unauthenticated {
            role,
            redirect: Route::login_for(role),
        })
    }

    /// Checks that the visitor may open `route`
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] for a guarded page without the
    /// matching session.
    pub fn authorize(&self, route: Route) -> Result<(), AuthError> {
        match route.required_role() {
            Some(role) => self.require(role).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Signs a role out and returns where to go next
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the keys cannot be removed.
    pub fn logout(&mut self, role: Role) -> Result<Route, StorageError> {
        self.store.remove(role.flag_key())?;
        self.store.remove(role.email_key())?;
        if self.slot(role).take().is_some() {
            tracing::info!(%role, "Signed out");
        }
        Ok(Route::after_logout(role))
    }

    /// The underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)] // Test code can use expect
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn registration() -> RegistrationForm {
        RegistrationForm {
            business_name: "Sarasavi Books".to_string(),
            contact_person: "Nimal Perera".to_string(),
            email: "nimal@sarasavi.lk".to_string(),
            phone: "0771234567".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
            accept_terms: true,
        }
    }

    #[test]
    fn empty_password_writes_nothing() {
        let store = MemoryStore::new();
        let mut ctx = SessionContext::load(store.clone()).expect("memory store loads");

        let result = ctx.login(Role::Vendor, &login("nimal@sarasavi.lk", ""));

        assert!(matches!(result, Err(SessionError::Form(FormError::MissingFields))));
        assert_eq!(store.get("publicUser").ok().flatten(), None);
        assert!(ctx.current(Role::Vendor).is_none());
    }

    #[test]
    fn login_sets_flag_and_email() {
        let store = MemoryStore::new();
        let mut ctx = SessionContext::load(store.clone()).expect("memory store loads");

        let session = ctx.login(Role::Staff, &login(" admin@cibf.lk ", "pw")).ok();

        assert_eq!(session.map(|s| s.email), Some("admin@cibf.lk".to_string()));
        assert_eq!(store.get("employeeUser").ok().flatten().as_deref(), Some("true"));
        assert_eq!(store.get("employeeEmail").ok().flatten().as_deref(), Some("admin@cibf.lk"));
        assert!(ctx.require(Role::Vendor).is_err());
    }

    #[test]
    fn load_picks_up_existing_flags() {
        let store = MemoryStore::new();
        let _ = store.set("publicUser", "true");
        let _ = store.set("publicEmail", "a@b.lk");
        let _ = store.set("employeeUser", "true");

        let ctx = SessionContext::load(store).expect("memory store loads");
        assert_eq!(ctx.current(Role::Vendor).map(|s| s.email.as_str()), Some("a@b.lk"));
        // flag without email is not a session
        assert!(ctx.current(Role::Staff).is_none());
    }

    #[test]
    fn registration_checks_in_order() {
        let mut form = registration();
        form.phone.clear();
        form.accept_terms = false;
        assert_eq!(form.validate(), Err(FormError::MissingFields));

        let mut form = registration();
        form.confirm_password = "other".to_string();
        form.accept_terms = false;
        assert_eq!(form.validate(), Err(FormError::PasswordMismatch));

        let mut form = registration();
        form.accept_terms = false;
        assert_eq!(form.validate(), Err(FormError::TermsNotAccepted));
    }

    #[test]
    fn registering_signs_vendor_in() {
        let mut ctx = SessionContext::load(MemoryStore::new()).expect("memory store loads");
        let profile = ctx.register(&registration()).ok();

        assert_eq!(profile.map(|p| p.business_name), Some("Sarasavi Books".to_string()));
        assert!(ctx.require(Role::Vendor).is_ok());
    }

    #[test]
    fn guarded_route_redirects_to_role_login() {
        let ctx = SessionContext::load(MemoryStore::new()).expect("memory store loads");

        assert_eq!(
            ctx.authorize(Route::StaffStalls),
            Err(AuthError::Unauthenticated {
                role: Role::Staff,
                redirect: Route::StaffLogin,
            })
        );
        assert_eq!(ctx.authorize(Route::Home), Ok(()));
    }

    #[test]
    fn logout_clears_keys_and_redirects() {
        let store = MemoryStore::new();
        let mut ctx = SessionContext::load(store.clone()).expect("memory store loads");
        let _ = ctx.login(Role::Vendor, &login("a@b.lk", "pw"));

        let next = ctx.logout(Role::Vendor).ok();

        assert_eq!(next, Some(Route::Home));
        assert_eq!(store.get("publicEmail").ok().flatten(), None);
        assert!(ctx.current(Role::Vendor).is_none());
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonFileStore::open(dir.path().join("session.json"));
        assert!(store.is_ok_and(|s| s.get("publicUser").ok().flatten().is_none()));
    }
}
