use shared::{
    domain::{Client, ClientFields, ClientId},
    error::ValidationErrors,
};
use thiserror::Error;
use tracing::debug;

use crate::validation::validate_client;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("client {0} not found")]
    NotFound(ClientId),
    #[error("invalid client record: {0}")]
    InvalidRecord(#[from] ValidationErrors),
}

/// Ordered in-memory collection of client records.
///
/// Ids are assigned as `max(existing) + 1`, so removing the record with the
/// highest id makes that id available again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientRegistry {
    clients: Vec<Client>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the three demo records.
    pub fn with_demo_clients() -> Self {
        let demo = [
            ("Иван Иванов", "ivanov@mail.ru", "+7 999 123-45-67"),
            ("Мария Петрова", "petrova@mail.ru", "+7 912 222-33-44"),
            ("John Doe", "john.doe@example.com", "+7 900 555-66-77"),
        ];
        let clients = demo
            .into_iter()
            .zip(1..)
            .map(|((name, email, phone), id)| {
                Client::from_fields(ClientId(id), ClientFields::new(name, email, phone))
            })
            .collect();
        Self { clients }
    }

    pub fn list(&self) -> &[Client] {
        &self.clients
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn next_id(&self) -> ClientId {
        let max = self
            .clients
            .iter()
            .map(|client| client.id.0)
            .max()
            .unwrap_or(0)
            .max(0);
        ClientId(max + 1)
    }

    pub fn create(&mut self, fields: ClientFields) -> Result<Client, RegistryError> {
        validate_client(&fields)?;
        let client = Client::from_fields(self.next_id(), fields);
        self.clients.push(client.clone());
        debug!(client_id = %client.id, total = self.clients.len(), "client created");
        Ok(client)
    }

    /// Replaces every non-id field of the record in place. Neither a missing
    /// id nor invalid fields touch the list; a missing id is reported first.
    pub fn update(&mut self, id: ClientId, fields: ClientFields) -> Result<Client, RegistryError> {
        let slot = self
            .clients
            .iter_mut()
            .find(|client| client.id == id)
            .ok_or(RegistryError::NotFound(id))?;
        validate_client(&fields)?;
        *slot = Client::from_fields(id, fields);
        debug!(client_id = %id, "client updated");
        Ok(slot.clone())
    }

    /// Removes the record with `id`, returning it. Absent ids are a no-op.
    pub fn delete(&mut self, id: ClientId) -> Option<Client> {
        let index = self.clients.iter().position(|client| client.id == id)?;
        let removed = self.clients.remove(index);
        debug!(client_id = %id, total = self.clients.len(), "client deleted");
        Some(removed)
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
