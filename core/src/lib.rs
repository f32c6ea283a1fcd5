//! API access layer for the animal spotter service.
//!
//! # Overview
//! Signs a user up or in against the backend, keeps the returned bearer
//! token in memory, and fetches animal names, sighting details and images.
//!
//! # Design
//! - `AnimalSpotterClient` is stateless: it builds `HttpRequest` values and
//!   parses `HttpResponse` values without touching the network.
//! - A `Transport` executes requests; `ReqwestTransport` is the real one.
//! - `ApiController` ties client, transport and a shared `Session` together
//!   behind the `AnimalApi` trait that UI code depends on.
//! - The mock server keeps its own copies of the wire types, so the
//!   end-to-end tests notice when the two disagree.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use api::{AnimalApi, ApiController};
pub use client::{AnimalSpotterClient, DEFAULT_BASE_URL};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, ImageError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::Session;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Animal, AnimalName, Bearer, Image, User};
