//! OAuth refresh-token exchange
//!
//! Every run exchanges the long-lived refresh token for a fresh access token.
//! Nothing is cached or persisted between runs.

use super::models::{abbreviate, TokenResponse};
use crate::config::{secret_string, BooksConfig, SecretString};
use crate::domain::{EtlError, Result};
use reqwest::Client;
use secrecy::ExposeSecret;

/// A short-lived bearer token and the API base it is valid for
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: SecretString,
    pub api_domain: String,
}

impl AccessToken {
    /// Value for the `Authorization` header
    pub(crate) fn authorization_header(&self) -> String {
        format!("Zoho-oauthtoken {}", self.token.expose_secret().as_str())
    }
}

/// Exchanges the configured refresh token for an [`AccessToken`]
pub struct TokenProvider {
    client: Client,
    config: BooksConfig,
}

impl TokenProvider {
    pub fn new(client: Client, config: &BooksConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Requests a new access token
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::Authentication`] when the request fails, the
    /// endpoint answers with a non-2xx status, or the body carries no
    /// `access_token`. The raw status and body are logged in those cases.
    pub async fn refresh(&self) -> Result<AccessToken> {
        let refresh_token = self.config.refresh_token.as_ref().ok_or_else(|| {
            EtlError::Configuration("books.refresh_token is not set".to_string())
        })?;
        let client_secret = self.config.client_secret.as_ref().ok_or_else(|| {
            EtlError::Configuration("books.client_secret is not set".to_string())
        })?;

        tracing::debug!(
            token_url = %self.config.accounts_url,
            client_id = %self.config.client_id,
            "Refreshing access token"
        );

        let form: [(&str, &str); 5] = [
            ("refresh_token", refresh_token.expose_secret().as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", client_secret.expose_secret().as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.config.accounts_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Token request failed");
                EtlError::Authentication(format!("Failed to request access token: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %abbreviate(&body),
                "Token endpoint returned an error status"
            );
            return Err(EtlError::Authentication(format!(
                "Token request failed with status {status}"
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                status = status.as_u16(),
                body = %abbreviate(&body),
                "Token response is not valid JSON"
            );
            EtlError::Authentication(format!("Failed to parse token response: {e}"))
        })?;

        let token = match parsed.access_token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                tracing::error!(
                    status = status.as_u16(),
                    body = %abbreviate(&body),
                    "Token response has no access_token"
                );
                return Err(EtlError::Authentication(format!(
                    "Token response has no access_token{}",
                    parsed
                        .error
                        .map(|e| format!(" (error: {e})"))
                        .unwrap_or_default()
                )));
            }
        };

        let api_domain = parsed
            .api_domain
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| self.config.default_api_domain.clone());

        tracing::info!(api_domain = %api_domain, "Access token refreshed");

        Ok(AccessToken {
            token: secret_string(token),
            api_domain,
        })
    }
}
