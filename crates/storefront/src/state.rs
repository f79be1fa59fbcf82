//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use bazaar_core::User;
use bazaar_core::view::ImageCdn;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};

use crate::api::{self, ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::notifications::NotificationSubscriber;

/// How long a fetched profile is reused before asking the backend again.
const PROFILE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// backend client, the image CDN, and the notification subscriber.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    cdn: ImageCdn,
    notifications: NotificationSubscriber,
    profiles: Cache<String, User>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let api = ApiClient::new(config.backend.base_url.clone());
        let cdn = ImageCdn::new(config.public_keys.image_cdn_cloud.clone());
        let notifications =
            NotificationSubscriber::new(api.clone(), config.backend.notification_retry);
        let profiles = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(PROFILE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                cdn,
                notifications,
                profiles,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the image CDN URL builder.
    #[must_use]
    pub fn cdn(&self) -> &ImageCdn {
        &self.inner.cdn
    }

    /// Get a reference to the notification subscriber.
    #[must_use]
    pub fn notifications(&self) -> &NotificationSubscriber {
        &self.inner.notifications
    }

    /// Profile for a session token, cached for a minute.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the profile lookup fails. Failures are not cached.
    pub async fn profile(&self, token: &SecretString) -> Result<User, ApiError> {
        let key = token.expose_secret().to_string();
        if let Some(user) = self.inner.profiles.get(&key).await {
            return Ok(user);
        }

        let user = api::auth::profile(&self.inner.api, token).await?;
        self.inner.profiles.insert(key, user.clone()).await;
        Ok(user)
    }

    /// Drop the cached profile for a token (logout, backend rejection).
    pub async fn forget_profile(&self, token: &SecretString) {
        self.inner.profiles.invalidate(token.expose_secret()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_state_wires_backend_and_cdn() {
        let state = AppState::new(test_config());
        assert_eq!(state.api().base_url().as_str(), "http://localhost:4000/api/");
        assert_eq!(
            state.cdn().url(Some("p/1"), bazaar_core::view::ImageTransform::Original),
            Some("https://res.cloudinary.com/bazaar-demo/image/upload/f_auto,q_auto/p/1".to_string())
        );
    }
}
