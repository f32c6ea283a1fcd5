//! Stateless HTTP request builder and response parser for the animal
//! spotter API.
//!
//! # Design
//! `AnimalSpotterClient` holds only a base URL and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Whoever sits in between (usually `ApiController` with a
//! `Transport`) performs the round-trip, so everything here is deterministic.
//!
//! Parsers check, in order: status (must be 200), body presence, then
//! shape. A 401 with a garbage body is therefore `UnexpectedStatusCode`,
//! never `BadDecode`.

use image::GenericImageView;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ApiError, ConfigError, ImageError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Animal, AnimalName, Bearer, Image, User};

/// Base address of the production backend.
pub const DEFAULT_BASE_URL: &str = "https://lambdaanimalspotter.vapor.cloud/api";

/// Synchronous, stateless client for the animal spotter API.
#[derive(Debug, Clone)]
pub struct AnimalSpotterClient {
    base_url: Url,
}

impl AnimalSpotterClient {
    /// Parse `base_url` and build a client on top of it. A trailing slash is
    /// ignored.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_url(url)
    }

    pub fn from_url(base_url: Url) -> Result<Self, ConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                value: base_url.to_string(),
                reason: "url cannot carry path segments".to_string(),
            });
        }
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn build_sign_up(&self, user: &User) -> Result<HttpRequest, ApiError> {
        self.build_credentials_post(&["users", "signup"], user)
    }

    pub fn build_sign_in(&self, user: &User) -> Result<HttpRequest, ApiError> {
        self.build_credentials_post(&["users", "login"], user)
    }

    pub fn build_list_names(&self, bearer: &Bearer) -> HttpRequest {
        self.build_authorized_get(&["animals", "all"], bearer)
    }

    /// `name` becomes one percent-encoded path segment, so
    /// `"Red Panda"` requests `/animals/Red%20Panda`.
    ///
    /// Empty, `.` and `..` names are rejected: URL normalization would turn
    /// them into a request for a different resource, even when escaped.
    pub fn build_fetch_details(&self, bearer: &Bearer, name: &str) -> Result<HttpRequest, ApiError> {
        if matches!(name, "" | "." | "..") {
            return Err(ApiError::InvalidName(name.to_string()));
        }
        Ok(self.build_authorized_get(&["animals", name], bearer))
    }

    /// Image URLs are absolute and unauthenticated. Anything that doesn't
    /// parse as an http(s) URL is rejected before any I/O happens.
    pub fn build_fetch_image(&self, image_url: &str) -> Result<HttpRequest, ImageError> {
        let url = Url::parse(image_url).map_err(|e| ImageError::InvalidUrl {
            url: image_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ImageError::InvalidUrl {
                url: image_url.to_string(),
                reason: format!("unsupported scheme {:?}", url.scheme()),
            });
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Sign-up succeeds on 200; whatever body comes back is ignored.
    pub fn parse_sign_up(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_sign_in(&self, response: HttpResponse) -> Result<Bearer, ApiError> {
        decode_json(&response)
    }

    pub fn parse_list_names(&self, response: HttpResponse) -> Result<Vec<AnimalName>, ApiError> {
        decode_json(&response)
    }

    pub fn parse_fetch_details(&self, response: HttpResponse) -> Result<Animal, ApiError> {
        decode_json(&response)
    }

    pub fn parse_fetch_image(&self, response: HttpResponse) -> Result<Image, ImageError> {
        if response.status != 200 {
            return Err(ImageError::UnexpectedStatusCode {
                status: response.status,
            });
        }
        if response.body.is_empty() {
            return Err(ImageError::NoData);
        }
        let format =
            image::guess_format(&response.body).map_err(|e| ImageError::Decode(e.to_string()))?;
        let decoded = image::load_from_memory_with_format(&response.body, format)
            .map_err(|e| ImageError::Decode(e.to_string()))?;
        let (width, height) = decoded.dimensions();
        Ok(Image {
            format,
            width,
            height,
            data: response.body,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        // `from_url` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    fn build_credentials_post(&self, segments: &[&str], user: &User) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(user).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint(segments),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    fn build_authorized_get(&self, segments: &[&str], bearer: &Bearer) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoint(segments),
            headers: vec![("Authorization".to_string(), bearer.authorization_value())],
            body: None,
        }
    }
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        Ok(())
    } else {
        Err(ApiError::UnexpectedStatusCode {
            status: response.status,
        })
    }
}

/// Status, then presence, then shape. Nothing is returned unless the whole
/// body decodes.
fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    check_status(response)?;
    if response.body.is_empty() {
        return Err(ApiError::NoData);
    }
    serde_json::from_slice(&response.body).map_err(|e| ApiError::BadDecode(e.to_string()))
}
