//! Typed verb helpers.
//!
//! Each helper fixes the method and the body encoding and passes straight
//! through to [`ApiClient::execute`]. Results deserialize into the caller's
//! type; use `()` or `Option<T>` where the endpoint may answer with no body.

use folio_domain::HttpMethod;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::ApiClient;
use crate::error::{ApiError, ApiResult};

impl ApiClient {
    /// `GET path`.
    ///
    /// # Errors
    /// See [`ApiClient::execute`]; also [`ApiError::Decode`] if the body
    /// does not match `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.call(path, HttpMethod::Get, None).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::get`]; also [`ApiError::Encode`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.call(path, HttpMethod::Post, Some(encode(body)?)).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::post`].
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.call(path, HttpMethod::Patch, Some(encode(body)?)).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::post`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.call(path, HttpMethod::Put, Some(encode(body)?)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    /// See [`ApiClient::get`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.call(path, HttpMethod::Delete, None).await
    }

    /// `DELETE path` with a JSON body, for bulk deletes.
    ///
    /// # Errors
    /// See [`ApiClient::post`].
    pub async fn delete_many<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.call(path, HttpMethod::Delete, Some(encode(body)?)).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<Vec<u8>>,
    ) -> ApiResult<T> {
        let value = self.execute(path, method, body, None).await?;
        serde_json::from_value(value).map_err(ApiError::Decode)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(ApiError::Encode)
}
