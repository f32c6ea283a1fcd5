//! Domain DTOs for the animal spotter API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined
//! independently from the mock-server crate; integration tests catch any
//! drift between the two. Credentials get hand-written `Debug` impls so they
//! never end up in logs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of an animal as returned by `GET /animals/all`.
pub type AnimalName = String;

/// Credentials for sign-up and sign-in.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token returned by a successful sign-in.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bearer {
    pub token: String,
}

impl Bearer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Value for the `Authorization` header: `Bearer <token>`.
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Bearer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bearer").field("token", &"<redacted>").finish()
    }
}

/// A sighting record returned by `GET /animals/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animal {
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "timeSeen", with = "epoch_seconds")]
    pub time_seen: DateTime<Utc>,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

/// A downloaded image that decoded successfully.
///
/// `data` keeps the bytes exactly as served so callers can hand them to
/// whatever renderer they use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub format: image::ImageFormat,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// `timeSeen` travels as a JSON number of seconds since the Unix epoch.
/// Whole and fractional values are both accepted.
mod epoch_seconds {
    use std::fmt;

    use chrono::{DateTime, Utc};
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    const NANOS_PER_SEC: f64 = 1_000_000_000.0;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let secs = value.timestamp();
        let nanos = value.timestamp_subsec_nanos();
        if nanos == 0 {
            serializer.serialize_i64(secs)
        } else {
            serializer.serialize_f64(secs as f64 + f64::from(nanos) / NANOS_PER_SEC)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(EpochSecondsVisitor)
    }

    struct EpochSecondsVisitor;

    impl Visitor<'_> for EpochSecondsVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number of seconds since the Unix epoch")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            DateTime::from_timestamp(v, 0)
                .ok_or_else(|| E::custom(format!("timestamp {v} is out of range")))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            let secs = i64::try_from(v)
                .map_err(|_| E::custom(format!("timestamp {v} is out of range")))?;
            self.visit_i64(secs)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if !v.is_finite() || v.abs() >= i64::MAX as f64 {
                return Err(E::custom(format!("timestamp {v} is out of range")));
            }
            let secs = v.floor();
            // Rounding can land on a full second; keep nanos in 0..1e9.
            let nanos = ((v - secs) * NANOS_PER_SEC).round().min(NANOS_PER_SEC - 1.0) as u32;
            DateTime::from_timestamp(secs as i64, nanos)
                .ok_or_else(|| E::custom(format!("timestamp {v} is out of range")))
        }
    }
}
