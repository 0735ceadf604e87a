//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::response::ApiError;

/// Path extractor whose rejection is an `ApiError`
#[derive(Debug, Clone)]
pub struct ValidPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(ValidPath(inner))
    }
}

/// Path parameters naming a viewed entity
///
/// The values are passed through unchecked; the service validates them so
/// that each operation can apply its own failure policy.
#[derive(Debug, serde::Deserialize)]
pub struct EntityPath {
    pub entity_type: String,
    pub entity_id: String,
}
