use serde::{Deserialize, Serialize};

use crate::{
    domain::{Client, ClientFields, ClientId, Permissions, Role},
    error::ErrorPayload,
};

/// Requests a rendering collaborator dispatches into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    Login { login: String, password: String },
    Logout,
    CreateClient { fields: ClientFields },
    UpdateClient { id: ClientId, fields: ClientFields },
    DeleteClient { id: ClientId },
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Login { .. } => "login",
            Intent::Logout => "logout",
            Intent::CreateClient { .. } => "create_client",
            Intent::UpdateClient { .. } => "update_client",
            Intent::DeleteClient { .. } => "delete_client",
        }
    }
}

/// Outcome of an applied intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum StoreEvent {
    LoggedIn { role: Role },
    LoggedOut,
    ClientCreated { client: Client },
    ClientUpdated { client: Client },
    ClientDeleted { id: ClientId, existed: bool },
    Rejected { error: ErrorPayload },
}

/// Derived state a renderer re-reads after every intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub role: Role,
    pub permissions: Permissions,
    pub clients: Vec<Client>,
}
