use shared::{
    domain::{Client, Permissions, Role},
    protocol::{Intent, StoreEvent, ViewSnapshot},
};
use tracing::{debug, info, warn};

pub mod auth;
pub mod error;
pub mod registry;
pub mod session;
pub mod validation;

pub use auth::{AuthFailure, Authenticator, Credential, CredentialTable, CredentialTableError};
pub use error::CrmError;
pub use registry::{ClientRegistry, RegistryError};
pub use session::{permissions_for, SessionState};

/// Owned state of one session: the role, the client records and the
/// authenticator used for `Login` intents. [`CrmStore::dispatch`] is the only
/// write path.
#[derive(Debug, Clone)]
pub struct CrmStore<A = CredentialTable> {
    session: SessionState,
    registry: ClientRegistry,
    authenticator: A,
}

impl CrmStore<CredentialTable> {
    /// Store backed by a configured credential table, starting from the demo
    /// records when `seed_demo_clients` is set and from an empty registry
    /// otherwise.
    pub fn from_settings(credentials: CredentialTable, seed_demo_clients: bool) -> Self {
        let registry = if seed_demo_clients {
            ClientRegistry::with_demo_clients()
        } else {
            ClientRegistry::new()
        };
        Self::new(credentials, registry)
    }
}

impl<A: Authenticator> CrmStore<A> {
    pub fn new(authenticator: A, registry: ClientRegistry) -> Self {
        Self {
            session: SessionState::new(),
            registry,
            authenticator,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn current_role(&self) -> Role {
        self.session.current_role()
    }

    pub fn permissions(&self) -> Permissions {
        self.session.permissions()
    }

    /// Records visible to the current role; empty for guests.
    pub fn visible_clients(&self) -> &[Client] {
        if self.session.can_view() {
            self.registry.list()
        } else {
            &[]
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            role: self.current_role(),
            permissions: self.permissions(),
            clients: self.visible_clients().to_vec(),
        }
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<StoreEvent, CrmError> {
        let name = intent.name();
        let role = self.current_role();
        let result = self.apply_intent(intent);
        match &result {
            Ok(event) => {
                info!(
                    intent = name,
                    role = %role,
                    client_id = ?event_client_id(event),
                    "intent applied"
                );
                debug!(?event, "applied intent event");
            }
            Err(err) => warn!(intent = name, role = %role, error = %err, "intent rejected"),
        }
        result
    }

    /// Like [`CrmStore::dispatch`] but folds failures into
    /// [`StoreEvent::Rejected`] for renderers that consume a single stream.
    pub fn apply(&mut self, intent: Intent) -> StoreEvent {
        self.dispatch(intent)
            .unwrap_or_else(|err| StoreEvent::Rejected {
                error: err.to_payload(),
            })
    }

    fn apply_intent(&mut self, intent: Intent) -> Result<StoreEvent, CrmError> {
        match intent {
            Intent::Login { login, password } => {
                let role = self.authenticator.authenticate(&login, &password)?;
                self.session.set_role(role);
                Ok(StoreEvent::LoggedIn { role })
            }
            Intent::Logout => {
                self.session.logout();
                Ok(StoreEvent::LoggedOut)
            }
            Intent::CreateClient { fields } => {
                self.require(self.session.can_create_or_edit(), "create_client")?;
                let client = self.registry.create(fields)?;
                Ok(StoreEvent::ClientCreated { client })
            }
            Intent::UpdateClient { id, fields } => {
                self.require(self.session.can_create_or_edit(), "update_client")?;
                let client = self.registry.update(id, fields)?;
                Ok(StoreEvent::ClientUpdated { client })
            }
            Intent::DeleteClient { id } => {
                self.require(self.session.can_delete(), "delete_client")?;
                let existed = self.registry.delete(id).is_some();
                Ok(StoreEvent::ClientDeleted { id, existed })
            }
        }
    }

    fn require(&self, allowed: bool, action: &'static str) -> Result<(), CrmError> {
        if allowed {
            Ok(())
        } else {
            Err(CrmError::Forbidden {
                action,
                role: self.current_role(),
            })
        }
    }
}

fn event_client_id(event: &StoreEvent) -> Option<i64> {
    match event {
        StoreEvent::ClientCreated { client } | StoreEvent::ClientUpdated { client } => {
            Some(client.id.0)
        }
        StoreEvent::ClientDeleted { id, .. } => Some(id.0),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
