//! In-memory holder for the bearer token.
//!
//! A `Session` lives for as long as the process does and is shared with
//! `Arc`. Only a successful sign-in writes to it; authenticated calls read
//! it and fail with `NoBearer` when it is empty. Nothing is persisted.

use tokio::sync::RwLock;

use crate::types::Bearer;

#[derive(Debug, Default)]
pub struct Session {
    bearer: RwLock<Option<Bearer>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current token, if any.
    pub async fn bearer(&self) -> Option<Bearer> {
        self.bearer.read().await.clone()
    }

    /// Store `bearer`, replacing whatever an earlier sign-in left behind.
    pub async fn set_bearer(&self, bearer: Bearer) {
        *self.bearer.write().await = Some(bearer);
    }

    pub async fn is_signed_in(&self) -> bool {
        self.bearer.read().await.is_some()
    }

    /// Forget the token. Later authenticated calls fail with `NoBearer`.
    pub async fn clear(&self) {
        *self.bearer.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let session = Session::new();
        assert!(session.bearer().await.is_none());
        assert!(!session.is_signed_in().await);
    }

    #[tokio::test]
    async fn later_sign_in_overwrites_token() {
        let session = Session::new();
        session.set_bearer(Bearer::new("first")).await;
        session.set_bearer(Bearer::new("second")).await;
        assert_eq!(session.bearer().await, Some(Bearer::new("second")));
    }

    #[tokio::test]
    async fn clear_drops_token() {
        let session = Session::new();
        session.set_bearer(Bearer::new("t")).await;
        session.clear().await;
        assert!(!session.is_signed_in().await);
    }
}
