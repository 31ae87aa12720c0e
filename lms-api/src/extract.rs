/// Request extractors that validate before the handler runs
///
/// [`ValidJson`] and [`ValidQuery`] deserialize the body or query string and
/// run the `validator` rules on it. Both reject with [`ApiError`], so a
/// malformed request gets a 400 JSON error without touching the database.
///
/// # Example
///
/// ```no_run
/// use lms_api::extract::ValidJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CategoryRequest {
///     #[validate(length(min = 1, max = 255))]
///     name: String,
/// }
///
/// async fn handler(ValidJson(req): ValidJson<CategoryRequest>) -> String {
///     req.name
/// }
/// ```

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use validator::Validate;

/// JSON body that passed validation
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Query string that passed validation
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(ValidQuery(value))
    }
}

/// Deserializes a present key into `Some(value)`, keeping `null` as `Some(None)`
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` so an
/// absent key stays `None` and can be told apart from an explicit `null`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
