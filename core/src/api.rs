//! The API controller: one network round-trip per operation.
//!
//! # Design
//! `AnimalApi` is the narrow surface screens depend on, so they can be
//! driven by test doubles instead of a live backend. `ApiController`
//! implements it by pairing the stateless `AnimalSpotterClient` with a
//! `Transport` and a shared `Session`.
//!
//! Every operation resolves exactly once with a single `Result`. Nothing is
//! retried, cached or queued; concurrent calls are independent.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::client::AnimalSpotterClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError, ImageError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::session::Session;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Animal, AnimalName, Bearer, Image, User};

#[async_trait]
pub trait AnimalApi: Send + Sync {
    /// Register `user`. Nothing is stored locally.
    async fn sign_up(&self, user: &User) -> Result<(), ApiError>;

    /// Exchange credentials for a bearer token and keep it in the session.
    /// The session is untouched unless the whole exchange succeeds.
    async fn sign_in(&self, user: &User) -> Result<(), ApiError>;

    /// Names of every sighted animal, in server order.
    async fn list_names(&self) -> Result<Vec<AnimalName>, ApiError>;

    async fn fetch_details(&self, name: &str) -> Result<Animal, ApiError>;

    /// Download and decode an image. Every failure collapses to `None`.
    async fn fetch_image(&self, image_url: &str) -> Option<Image>;
}

pub struct ApiController<T = ReqwestTransport> {
    client: AnimalSpotterClient,
    transport: T,
    session: Arc<Session>,
}

impl ApiController<ReqwestTransport> {
    /// Controller over reqwest, pointed at `config.base_url`.
    pub fn from_config(config: &ClientConfig, session: Arc<Session>) -> Result<Self, ConfigError> {
        let client = AnimalSpotterClient::from_url(config.base_url.clone())?;
        Ok(Self::new(client, ReqwestTransport::new(), session))
    }
}

impl<T: Transport> ApiController<T> {
    pub fn new(client: AnimalSpotterClient, transport: T, session: Arc<Session>) -> Self {
        Self {
            client,
            transport,
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn client(&self) -> &AnimalSpotterClient {
        &self.client
    }

    /// Like `fetch_image`, but keeps the reason for a failure.
    pub async fn try_fetch_image(&self, image_url: &str) -> Result<Image, ImageError> {
        let request = self.client.build_fetch_image(image_url)?;
        let response = self.send(request).await?;
        self.client.parse_fetch_image(response)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }

    async fn require_bearer(&self) -> Result<Bearer, ApiError> {
        self.session.bearer().await.ok_or(ApiError::NoBearer)
    }
}

#[async_trait]
impl<T: Transport> AnimalApi for ApiController<T> {
    async fn sign_up(&self, user: &User) -> Result<(), ApiError> {
        let request = self.client.build_sign_up(user)?;
        let result = match self.send(request).await {
            Ok(response) => self.client.parse_sign_up(response),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = &result {
            warn!(username = %user.username, error = %e, "sign up failed");
        }
        result
    }

    async fn sign_in(&self, user: &User) -> Result<(), ApiError> {
        let request = self.client.build_sign_in(user)?;
        let result = match self.send(request).await {
            Ok(response) => self.client.parse_sign_in(response),
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(bearer) => {
                self.session.set_bearer(bearer).await;
                info!(username = %user.username, "signed in");
                Ok(())
            }
            Err(e) => {
                warn!(username = %user.username, error = %e, "sign in failed");
                Err(e)
            }
        }
    }

    async fn list_names(&self) -> Result<Vec<AnimalName>, ApiError> {
        let bearer = self.require_bearer().await?;
        let result = match self.send(self.client.build_list_names(&bearer)).await {
            Ok(response) => self.client.parse_list_names(response),
            Err(e) => Err(e.into()),
        };
        result.inspect_err(|e| {
            warn!(error = %e, "listing animal names failed");
        })
    }

    async fn fetch_details(&self, name: &str) -> Result<Animal, ApiError> {
        let bearer = self.require_bearer().await?;
        let request = self.client.build_fetch_details(&bearer, name)?;
        let result = match self.send(request).await {
            Ok(response) => self.client.parse_fetch_details(response),
            Err(e) => Err(e.into()),
        };
        result.inspect_err(|e| {
            warn!(animal = name, error = %e, "fetching animal details failed");
        })
    }

    async fn fetch_image(&self, image_url: &str) -> Option<Image> {
        match self.try_fetch_image(image_url).await {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(url = image_url, error = %e, "image unavailable");
                None
            }
        }
    }
}
