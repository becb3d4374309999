//! HTTP client for the list and detail endpoints

use super::auth::AccessToken;
use super::models::{abbreviate, ListResponse};
use crate::config::BooksConfig;
use crate::domain::{
    BillStatusFilter, BooksApiError, DocumentId, DocumentType, EtlError, OrganizationId, Result,
    SyncWindow,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Builds the shared HTTP client with the configured request timeout
///
/// # Errors
///
/// Returns a configuration error if the TLS backend cannot be initialised.
pub fn build_http_client(config: &BooksConfig) -> Result<Client> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
        .build()
        .map_err(|e| EtlError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Authenticated client bound to one organization
pub struct BooksClient {
    http: Client,
    base_url: Url,
    token: AccessToken,
    organization_id: OrganizationId,
    per_page: u32,
    bills_status_filter: Option<BillStatusFilter>,
}

impl BooksClient {
    /// Creates a client for the API domain carried by `token`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API domain is not a valid base URL
    /// or the organization id is invalid.
    pub fn new(http: Client, config: &BooksConfig, token: AccessToken) -> Result<Self> {
        let base_url = Url::parse(&token.api_domain).map_err(|e| {
            EtlError::Configuration(format!("Invalid API domain '{}': {e}", token.api_domain))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(EtlError::Configuration(format!(
                "API domain '{}' cannot be used as a base URL",
                token.api_domain
            )));
        }
        let organization_id = config.organization().map_err(EtlError::Configuration)?;

        Ok(Self {
            http,
            base_url,
            token,
            organization_id,
            per_page: config.per_page,
            bills_status_filter: config.bills_status_filter,
        })
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EtlError::Configuration("API domain cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["books", "v3"])
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<(StatusCode, String)> {
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.token.authorization_header())
            .query(query)
            .send()
            .await
            .map_err(|e| BooksApiError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BooksApiError::ConnectionFailed(format!("Failed to read body: {e}")))?;

        Ok((status, body))
    }

    async fn get_json(&self, url: Url, query: &[(&str, String)]) -> Result<Value> {
        let (status, body) = self.get(url, query).await?;

        if !status.is_success() {
            return Err(BooksApiError::HttpStatus {
                status: status.as_u16(),
                body: abbreviate(&body),
            }
            .into());
        }

        parse_json(&body)
    }

    /// Fetches one page of a collection
    ///
    /// # Errors
    ///
    /// Transport failures and non-JSON bodies are errors, as is a non-2xx
    /// status with a non-JSON body. A JSON body without the collection is
    /// returned as [`ListResponse::Unexpected`] whatever the status, for the
    /// caller's policy to handle.
    pub async fn list_page(
        &self,
        document_type: DocumentType,
        window: &SyncWindow,
        page: u32,
    ) -> Result<ListResponse> {
        let url = self.endpoint_url(&[document_type.endpoint()])?;

        let mut query = vec![
            ("organization_id", self.organization_id.to_string()),
            ("date_start", window.start_param()),
            ("date_end", window.end_param()),
            ("page", page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if document_type == DocumentType::Bill {
            if let Some(filter) = self.bills_status_filter {
                query.push(("filter_by", filter.as_query_value().to_string()));
            }
        }

        tracing::debug!(
            document_type = %document_type,
            page,
            "Fetching list page"
        );

        let (status, body) = self.get(url, &query).await?;

        if !status.is_success() {
            return match serde_json::from_str::<Value>(&body) {
                Ok(_) => {
                    tracing::warn!(
                        document_type = %document_type,
                        page,
                        status = status.as_u16(),
                        "List request failed with a JSON body"
                    );
                    Ok(ListResponse::Unexpected {
                        body: abbreviate(&format!("HTTP {}: {body}", status.as_u16())),
                    })
                }
                Err(_) => Err(BooksApiError::HttpStatus {
                    status: status.as_u16(),
                    body: abbreviate(&body),
                }
                .into()),
            };
        }

        let body = parse_json(&body)?;
        Ok(ListResponse::from_body(document_type, &body))
    }

    /// Fetches the full record of one document
    ///
    /// Returns `Ok(None)` when the response has no detail object.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses, non-JSON bodies and a non-zero
    /// `code` are errors.
    pub async fn fetch_detail(
        &self,
        document_type: DocumentType,
        id: &DocumentId,
    ) -> Result<Option<Value>> {
        let url = self.endpoint_url(&[document_type.endpoint(), id.as_str()])?;
        let query = [("organization_id", self.organization_id.to_string())];

        let mut body = self.get_json(url, &query).await?;

        let code = body.get("code").and_then(Value::as_i64).unwrap_or(0);
        if code != 0 {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message")
                .to_string();
            return Err(BooksApiError::ApiError { code, message }.into());
        }

        match body.get_mut(document_type.detail_key()).map(Value::take) {
            Some(detail @ Value::Object(_)) => Ok(Some(detail)),
            _ => Ok(None),
        }
    }
}

fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body)
        .map_err(|e| BooksApiError::InvalidResponse(format!("{e}: {}", abbreviate(body))).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn client_for(domain: &str) -> Result<BooksClient> {
        let config = BooksConfig {
            organization_id: "60012345678".to_string(),
            ..Default::default()
        };
        let token = AccessToken {
            token: secret_string("t".to_string()),
            api_domain: domain.to_string(),
        };
        BooksClient::new(Client::new(), &config, token)
    }

    #[test]
    fn test_endpoint_url_from_bare_domain() {
        let client = client_for("https://www.zohoapis.in").unwrap();
        let url = client.endpoint_url(&["bills", "B1"]).unwrap();
        assert_eq!(url.as_str(), "https://www.zohoapis.in/books/v3/bills/B1");
    }

    #[test]
    fn test_endpoint_url_with_trailing_slash() {
        let client = client_for("http://127.0.0.1:1234/").unwrap();
        let url = client.endpoint_url(&["creditnotes"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:1234/books/v3/creditnotes");
    }

    #[test]
    fn test_endpoint_url_escapes_id() {
        let client = client_for("https://www.zohoapis.in").unwrap();
        let url = client.endpoint_url(&["invoices", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://www.zohoapis.in/books/v3/invoices/a%2Fb");
    }

    #[test]
    fn test_invalid_domain_rejected() {
        assert!(matches!(
            client_for("not a url"),
            Err(EtlError::Configuration(_))
        ));
        assert!(matches!(
            client_for("mailto:books@example.com"),
            Err(EtlError::Configuration(_))
        ));
    }
}
