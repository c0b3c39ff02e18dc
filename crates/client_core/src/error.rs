use shared::{
    domain::{ClientId, Role},
    error::{ErrorCode, ErrorPayload, ValidationErrors},
};
use thiserror::Error;

use crate::{auth::AuthFailure, registry::RegistryError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CrmError {
    #[error(transparent)]
    AuthFailure(#[from] AuthFailure),
    #[error("{action} is not permitted for role {role}")]
    Forbidden { action: &'static str, role: Role },
    #[error("client {0} not found")]
    NotFound(ClientId),
    #[error("invalid client record: {0}")]
    Validation(ValidationErrors),
}

impl CrmError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CrmError::AuthFailure(_) => ErrorCode::AuthFailure,
            CrmError::Forbidden { .. } => ErrorCode::Forbidden,
            CrmError::NotFound(_) => ErrorCode::NotFound,
            CrmError::Validation(_) => ErrorCode::Validation,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            CrmError::Validation(errors) => ErrorPayload::from(errors.clone()),
            other => ErrorPayload::new(other.code(), other.to_string()),
        }
    }
}

impl From<RegistryError> for CrmError {
    fn from(value: RegistryError) -> Self {
        match value {
            RegistryError::NotFound(id) => CrmError::NotFound(id),
            RegistryError::InvalidRecord(errors) => CrmError::Validation(errors),
        }
    }
}
