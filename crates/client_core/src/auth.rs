use std::fmt;

use serde::{Deserialize, Serialize};
use shared::domain::Role;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("incorrect login or password")]
pub struct AuthFailure;

/// Verifies a login/password pair and yields the role it grants.
pub trait Authenticator {
    fn authenticate(&self, login: &str, password: &str) -> Result<Role, AuthFailure>;
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub login: String,
    pub password: String,
    pub role: Role,
}

impl Credential {
    pub fn new(login: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            role,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialTableError {
    #[error("credential '{0}' grants the guest role")]
    GuestCredential(String),
    #[error("credential '{0}' is listed more than once")]
    DuplicateLogin(String),
    #[error("credential with an empty login")]
    EmptyLogin,
}

/// Static login table loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CredentialTable {
    entries: Vec<Credential>,
}

impl CredentialTable {
    pub fn new(entries: Vec<Credential>) -> Result<Self, CredentialTableError> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.login.trim().is_empty() {
                return Err(CredentialTableError::EmptyLogin);
            }
            if entry.role == Role::Guest {
                return Err(CredentialTableError::GuestCredential(entry.login.clone()));
            }
            if entries[..index].iter().any(|prior| prior.login == entry.login) {
                return Err(CredentialTableError::DuplicateLogin(entry.login.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The two development accounts used when configuration supplies none.
    pub fn development_defaults() -> Self {
        Self {
            entries: vec![
                Credential::new("user1", "userpass", Role::User),
                Credential::new("admin1", "adminpass", Role::Admin),
            ],
        }
    }

    pub fn entries(&self) -> &[Credential] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for CredentialTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<Credential>::deserialize(deserializer)?;
        CredentialTable::new(entries).map_err(serde::de::Error::custom)
    }
}

impl Authenticator for CredentialTable {
    fn authenticate(&self, login: &str, password: &str) -> Result<Role, AuthFailure> {
        self.entries
            .iter()
            .find(|entry| entry.login == login && entry.password == password)
            .map(|entry| entry.role)
            .ok_or(AuthFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_accounts_map_to_roles() {
        let table = CredentialTable::development_defaults();
        assert_eq!(table.authenticate("user1", "userpass"), Ok(Role::User));
        assert_eq!(table.authenticate("admin1", "adminpass"), Ok(Role::Admin));
    }

    #[test]
    fn wrong_password_or_unknown_login_fails() {
        let table = CredentialTable::development_defaults();
        assert_eq!(table.authenticate("user1", "adminpass"), Err(AuthFailure));
        assert_eq!(table.authenticate("wrong", "wrong"), Err(AuthFailure));
        assert_eq!(table.authenticate("", ""), Err(AuthFailure));
        assert_eq!(AuthFailure.to_string(), "incorrect login or password");
    }

    #[test]
    fn rejects_guest_and_duplicate_entries() {
        let err = CredentialTable::new(vec![Credential::new("visitor", "x", Role::Guest)])
            .expect_err("guest");
        assert_eq!(err, CredentialTableError::GuestCredential("visitor".into()));

        let err = CredentialTable::new(vec![
            Credential::new("ops", "a", Role::User),
            Credential::new("ops", "b", Role::Admin),
        ])
        .expect_err("duplicate");
        assert_eq!(err, CredentialTableError::DuplicateLogin("ops".into()));
    }

    #[test]
    fn debug_output_hides_passwords() {
        let rendered = format!("{:?}", CredentialTable::development_defaults());
        assert!(rendered.contains("admin1"));
        assert!(!rendered.contains("adminpass"));
    }

    #[test]
    fn deserialization_applies_table_checks() {
        let table: CredentialTable = serde_json::from_str(
            r#"[{"login":"boss","password":"secret","role":"admin"}]"#,
        )
        .expect("table");
        assert_eq!(table.authenticate("boss", "secret"), Ok(Role::Admin));

        let err = serde_json::from_str::<CredentialTable>(
            r#"[{"login":"anon","password":"","role":"guest"}]"#,
        )
        .expect_err("guest entry");
        assert!(err.to_string().contains("guest role"));
    }
}
