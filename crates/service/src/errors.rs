use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn product_not_found(id: i32) -> Self { Self::NotFound(format!("Product with ID {id} not found")) }

    /// Caller-side faults (bad input) as opposed to infrastructure failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_) | Self::Model(models::errors::ModelError::Validation(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn client_and_server_faults() {
        let e = ServiceError::product_not_found(7);
        assert_eq!(e.to_string(), "not found: Product with ID 7 not found");
        assert!(e.is_client_error());
        assert!(ServiceError::Model(ModelError::Validation("name is required".into())).is_client_error());
        assert!(!ServiceError::Db("pool timed out".into()).is_client_error());
        assert!(!ServiceError::Storage("disk full".into()).is_client_error());
    }
}
