use std::time::Duration;

use directory_logging::{directory_debug, directory_warn};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::decode::decode_user_page;
use crate::{FailureKind, FetchError, PageNumber, UserPage};

pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 1024 * 1024,
            allowed_content_types: vec!["application/json".to_string()],
        }
    }
}

impl SourceSettings {
    /// `{base_url}/users?page={page}`.
    pub fn users_url(&self, page: PageNumber) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                FetchError::new(FailureKind::InvalidUrl, "base url cannot carry a path")
            })?;
            segments.pop_if_empty().push("users");
        }
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }
}

/// Paginated supplier of user records.
#[async_trait::async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_page(&self, page: PageNumber) -> Result<UserPage, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUserSource {
    settings: SourceSettings,
    client: reqwest::Client,
}

impl ReqwestUserSource {
    pub fn new(settings: SourceSettings) -> Result<Self, FetchError> {
        let client = build_client(&settings)?;
        Ok(Self { settings, client })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

fn build_client(settings: &SourceSettings) -> Result<reqwest::Client, FetchError> {
    let redirect_limit = settings.redirect_limit;
    let policy = reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= redirect_limit {
            attempt.error("redirect limit exceeded")
        } else {
            attempt.follow()
        }
    });

    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .redirect(policy)
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

#[async_trait::async_trait]
impl UserSource for ReqwestUserSource {
    async fn fetch_page(&self, page: PageNumber) -> Result<UserPage, FetchError> {
        let url = self.settings.users_url(page)?;
        directory_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let bytes = self.read_body(response).await?;
        decode_user_page(&bytes).map_err(|err| {
            directory_warn!("Page {} could not be decoded: {}", page, err);
            FetchError::new(FailureKind::Decode, err.to_string())
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_url_appends_path_and_page() {
        let settings = SourceSettings::default();
        let url = settings.users_url(3).unwrap();
        assert_eq!(url.as_str(), "https://reqres.in/api/users?page=3");
    }

    #[test]
    fn users_url_tolerates_trailing_slash() {
        let settings = SourceSettings {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..SourceSettings::default()
        };
        let url = settings.users_url(1).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/users?page=1");
    }

    #[test]
    fn users_url_rejects_garbage() {
        let settings = SourceSettings {
            base_url: "not a url".to_string(),
            ..SourceSettings::default()
        };
        assert_eq!(settings.users_url(1).unwrap_err().kind, FailureKind::InvalidUrl);

        let settings = SourceSettings {
            base_url: "mailto:someone@example.com".to_string(),
            ..SourceSettings::default()
        };
        assert_eq!(settings.users_url(1).unwrap_err().kind, FailureKind::InvalidUrl);
    }
}
