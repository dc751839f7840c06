use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body. Anything that does not parse, including an empty
/// body, is rejected with the shared malformed-payload error.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::malformed_payload())?;
        serde_json::from_slice(&bytes).map(Payload).map_err(|e| {
            tracing::debug!("Rejected request payload: {}", e);
            ApiError::malformed_payload()
        })
    }
}
