// src/client/rest.rs

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    client::{AuthBackend, CollectionSource},
    common::{error::AppError, response::Envelope},
    models::{
        assets::Resource,
        auth::{AuthResponse, ChangePasswordPayload, User},
    },
};

// Cliente HTTP do painel. Lê o envelope `{ ok, data }` / `{ ok: false, code, error }`.
#[derive(Clone)]
pub struct RestBackend {
    http: Client,
    base_url: String,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fonte REST de uma coleção, presa a um token.
    pub fn collection<R: Resource>(&self, token: impl Into<String>) -> RestCollection<R> {
        RestCollection { backend: self.clone(), token: token.into(), _resource: PhantomData }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::ServiceUnavailable(format!("resposta inválida ({status}): {e}")))?;

        if envelope.ok {
            return envelope
                .data
                .ok_or_else(|| AppError::ServiceUnavailable("resposta sem dados".to_string()));
        }

        let code = envelope.code.unwrap_or_default();
        let message = envelope.error.unwrap_or_default();
        tracing::debug!("↩️ {} {}: {}", status, code, message);
        Err(AppError::from_code(&code, message, envelope.details.as_ref()))
    }
}

#[async_trait]
impl AuthBackend for RestBackend {
    async fn login(&self, identifier: &str, secret: &str) -> Result<AuthResponse, AppError> {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "identifier": identifier, "secret": secret }));
        self.send(request).await
    }

    async fn current_user(&self, token: &str) -> Result<User, AppError> {
        let request = self.http.get(self.url("/api/users/me")).bearer_auth(token);
        self.send(request).await
    }

    async fn change_password(&self, token: &str, payload: &ChangePasswordPayload) -> Result<(), AppError> {
        let request = self
            .http
            .post(self.url("/api/auth/change-password"))
            .bearer_auth(token)
            .json(payload);
        self.send::<User>(request).await.map(|_| ())
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        let request = self.http.post(self.url("/api/auth/logout")).bearer_auth(token);
        self.send::<Value>(request).await.map(|_| ())
    }
}

pub struct RestCollection<R: Resource> {
    backend: RestBackend,
    token: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> RestCollection<R> {
    fn collection_url(&self) -> String {
        self.backend.url(&format!("/api/{}", R::RESOURCE))
    }

    fn item_url(&self, id: Uuid) -> String {
        self.backend.url(&format!("/api/{}/{}", R::RESOURCE, id))
    }
}

#[async_trait]
impl<R: Resource> CollectionSource<R> for RestCollection<R> {
    async fn fetch_all(&self) -> Result<Vec<R>, AppError> {
        let request = self.backend.http.get(self.collection_url()).bearer_auth(&self.token);
        self.backend.send(request).await
    }

    async fn create(&self, item: &R) -> Result<R, AppError> {
        let request = self
            .backend
            .http
            .post(self.collection_url())
            .bearer_auth(&self.token)
            .json(item);
        self.backend.send(request).await
    }

    async fn update(&self, id: Uuid, item: &R) -> Result<R, AppError> {
        let request = self
            .backend
            .http
            .put(self.item_url(id))
            .bearer_auth(&self.token)
            .json(item);
        self.backend.send(request).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let request = self.backend.http.delete(self.item_url(id)).bearer_auth(&self.token);
        self.backend.send::<Value>(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assets::Equipment;

    #[test]
    fn urls_ignore_a_trailing_slash() {
        let backend = RestBackend::new("http://127.0.0.1:3000/");
        assert_eq!(backend.url("/api/health"), "http://127.0.0.1:3000/api/health");

        let equipment = backend.collection::<Equipment>("t");
        let id = Uuid::nil();
        assert_eq!(equipment.collection_url(), "http://127.0.0.1:3000/api/equipment");
        assert_eq!(
            equipment.item_url(id),
            format!("http://127.0.0.1:3000/api/equipment/{id}")
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        // Porta livre: reservada e solta logo em seguida
        let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let backend = RestBackend::new(format!("http://{addr}"));
        let err = backend.login("admin", "Admin@345").await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }
}
