use shared::domain::{Permissions, Role};
use tracing::debug;

/// Permission matrix. Guests see neither the record list nor any action.
pub fn permissions_for(role: Role) -> Permissions {
    match role {
        Role::Guest => Permissions {
            can_view: false,
            can_create_or_edit: false,
            can_delete: false,
        },
        Role::User => Permissions {
            can_view: true,
            can_create_or_edit: true,
            can_delete: false,
        },
        Role::Admin => Permissions {
            can_view: true,
            can_create_or_edit: true,
            can_delete: true,
        },
    }
}

/// Role held by the current session. Starts as [`Role::Guest`]; any role can
/// replace any other since credential checks happen before `set_role`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    role: Role,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(role: Role) -> Self {
        Self { role }
    }

    pub fn set_role(&mut self, role: Role) {
        if self.role != role {
            debug!(from = %self.role, to = %role, "session role changed");
        }
        self.role = role;
    }

    pub fn logout(&mut self) {
        self.set_role(Role::Guest);
    }

    pub fn current_role(&self) -> Role {
        self.role
    }

    pub fn permissions(&self) -> Permissions {
        permissions_for(self.role)
    }

    pub fn can_view(&self) -> bool {
        self.permissions().can_view
    }

    pub fn can_create_or_edit(&self) -> bool {
        self.permissions().can_create_or_edit
    }

    pub fn can_delete(&self) -> bool {
        self.permissions().can_delete
    }
}
