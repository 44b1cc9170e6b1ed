//! Remote link service client.
//!
//! The console never generates short codes, enforces uniqueness or counts
//! hits itself; all of that lives behind [`LinkService`].

use crate::errors::ServiceError;
use crate::models::{CreateLinkRequest, ErrorDetail, Link, UpdateLinkRequest, WeeklyStatRecord};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Operations the console needs from the link service.
///
/// # Implementations
///
/// - [`HttpLinkService`] talks JSON over HTTP
/// - `MockLinkService` is generated for unit tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkService: Send + Sync {
    /// Lists every link known to the service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the service cannot be reached.
    async fn list_links(&self) -> Result<Vec<Link>, ServiceError>;

    /// Creates a link, letting the service pick a code when
    /// `custom_short_code` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::AliasConflict`] when the custom code is taken and
    /// [`ServiceError::InvalidUrl`] when the target is rejected.
    async fn create_link(&self, request: CreateLinkRequest) -> Result<Link, ServiceError>;

    /// Points an existing short code at a new target.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the code is unknown.
    async fn update_link(&self, short_code: &str, long_url: &str) -> Result<Link, ServiceError>;

    /// Fetches per-link hit counts for the current week.
    async fn weekly_stats(&self) -> Result<Vec<WeeklyStatRecord>, ServiceError>;
}

#[derive(Clone)]
pub struct HttpLinkService {
    client: Client,
    base_url: Url,
}

impl HttpLinkService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ServiceError::Unavailable(format!("invalid service url {base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Unavailable(format!(
                "service url {base_url} cannot carry a path"
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl LinkService for HttpLinkService {
    async fn list_links(&self) -> Result<Vec<Link>, ServiceError> {
        let response = self.client.get(self.endpoint(&["links"])).send().await?;
        let response = expect_success(response).await?;
        Ok(response.json().await?)
    }

    async fn create_link(&self, request: CreateLinkRequest) -> Result<Link, ServiceError> {
        let has_custom_code = request.custom_short_code.is_some();
        let response = self
            .client
            .post(self.endpoint(&["links"]))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let detail = error_detail(status, &response.text().await.unwrap_or_default());
        Err(match status {
            StatusCode::CONFLICT => ServiceError::AliasConflict(detail),
            StatusCode::BAD_REQUEST if has_custom_code => ServiceError::AliasConflict(detail),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ServiceError::InvalidUrl(detail),
            other => ServiceError::Rejected {
                status: other.as_u16(),
                detail,
            },
        })
    }

    async fn update_link(&self, short_code: &str, long_url: &str) -> Result<Link, ServiceError> {
        let response = self
            .client
            .put(self.endpoint(&["links", short_code]))
            .json(&UpdateLinkRequest {
                long_url: long_url.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            // The service does not promise a body here.
            let fallback = Link {
                short_code: short_code.to_string(),
                long_url: long_url.to_string(),
            };
            return Ok(response.json().await.unwrap_or(fallback));
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(status, &body);
        Err(match status {
            StatusCode::NOT_FOUND if body.trim().is_empty() => {
                ServiceError::NotFound(format!("short code not found: {short_code}"))
            }
            StatusCode::NOT_FOUND => ServiceError::NotFound(detail),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ServiceError::InvalidUrl(detail),
            other => ServiceError::Rejected {
                status: other.as_u16(),
                detail,
            },
        })
    }

    async fn weekly_stats(&self) -> Result<Vec<WeeklyStatRecord>, ServiceError> {
        let response = self
            .client
            .get(self.endpoint(&["stats", "weekly"]))
            .send()
            .await?;
        let response = expect_success(response).await?;
        Ok(response.json().await?)
    }
}

async fn expect_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!("link service answered {status}: {body}");
    Err(ServiceError::Rejected {
        status: status.as_u16(),
        detail: error_detail(status, &body),
    })
}

/// Extracts the user-facing message from an error body.
///
/// `detail` is used verbatim when it is a string; structured details (such
/// as validation error lists) are surfaced as their JSON text.
fn error_detail(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorDetail>(body) {
        Ok(ErrorDetail {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(ErrorDetail { detail }) => detail.to_string(),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

/// Resolved short link shown to the user: `base + "/" + short_code`.
pub fn short_url(base: &str, short_code: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), short_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        let detail = error_detail(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Short code already in use"}"#,
        );
        assert_eq!(detail, "Short code already in use");
    }

    #[test]
    fn structured_detail_falls_back_to_json_text() {
        let detail = error_detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","long_url"],"msg":"field required"}]}"#,
        );
        assert!(detail.contains("field required"));
    }

    #[test]
    fn empty_body_uses_status_reason() {
        assert_eq!(error_detail(StatusCode::NOT_FOUND, ""), "Not Found");
        assert_eq!(error_detail(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
    }

    #[test]
    fn short_url_joins_with_single_slash() {
        assert_eq!(short_url("http://127.0.0.1:8000", "abc"), "http://127.0.0.1:8000/abc");
        assert_eq!(short_url("https://sho.rt/", "abc"), "https://sho.rt/abc");
    }

    #[test]
    fn endpoints_escape_short_codes() {
        let service = HttpLinkService::new("http://127.0.0.1:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            service.endpoint(&["links"]).as_str(),
            "http://127.0.0.1:8000/links"
        );
        assert_eq!(
            service.endpoint(&["links", "a b"]).as_str(),
            "http://127.0.0.1:8000/links/a%20b"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(HttpLinkService::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpLinkService::new("mailto:me@example.com", Duration::from_secs(1)).is_err());
    }
}
