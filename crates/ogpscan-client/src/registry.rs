//! HTTP client for CKAN-compatible open-data registries.
//!
//! CKAN (Comprehensive Knowledge Archive Network) is the open-source data
//! management system behind Canada's Open Government portal and many others.
//! The client speaks the Action API v3 and handles pagination, retries and
//! rate limiting internally, so callers see one logical operation per method.

use std::time::Duration;

use ogpscan_core::error::AppError;
use ogpscan_core::raw::RawPackage;
use ogpscan_core::traits::CatalogueClient;
use ogpscan_core::HttpConfig;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tokio::time::sleep;

/// Generic wrapper for CKAN API responses.
///
/// CKAN API reference: <https://docs.ckan.org/en/2.9/api/>
///
/// CKAN always returns responses with the structure:
/// ```json
/// {
///     "success": bool,
///     "result": T
/// }
/// ```
///
/// On errors (including a vanished dataset) `success` is `false` and
/// `result` is absent, so it is optional here.
#[derive(Deserialize, Debug)]
struct CkanResponse<T> {
    success: bool,
    result: Option<T>,
}

/// Response structure for the CKAN `package_search` API.
#[derive(Deserialize, Debug)]
struct PackageSearchResult {
    count: usize,
    results: Vec<PackageStub>,
}

/// Slim search hit: only the id is needed, detail fetches get the rest.
#[derive(Deserialize, Debug)]
struct PackageStub {
    id: String,
}

/// HTTP client for a CKAN registry.
///
/// # Examples
///
/// ```no_run
/// use ogpscan_client::RegistryClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RegistryClient::new("https://open.canada.ca/data/en")?;
/// let ids = client.search_owner_org("health-canada").await?;
/// println!("Found {} datasets", ids.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: Url,
    timeout_secs: u64,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl RegistryClient {
    /// Results per `package_search` page.
    const PAGE_SIZE: usize = 1000;

    /// Delay between paginated API requests to avoid rate limiting.
    const PAGE_DELAY: Duration = Duration::from_secs(1);

    /// Maximum backoff delay for rate-limited retries within `request_with_retry`.
    const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

    /// Maximum retries for rate-limited (429) responses.
    /// Higher than normal retries because rate limits are transient.
    const RATE_LIMIT_MAX_RETRIES: u32 = 10;

    /// Creates a new client for the given registry.
    ///
    /// # Arguments
    ///
    /// * `base_url_str` - Base URL of the registry
    ///   (e.g. <https://open.canada.ca/data/en>)
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidPortalUrl` if the URL is malformed.
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(base_url_str: &str) -> Result<Self, AppError> {
        Self::with_config(base_url_str, HttpConfig::default())
    }

    pub fn with_config(base_url_str: &str, http_config: HttpConfig) -> Result<Self, AppError> {
        // Url::join treats the last path segment as a file unless the base
        // ends with a slash, which would drop the "/data/en" portal prefix.
        let mut normalized = base_url_str.trim_end_matches('/').to_string();
        normalized.push('/');
        let base_url = Url::parse(&normalized)
            .map_err(|_| AppError::InvalidPortalUrl(base_url_str.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AppError::InvalidPortalUrl(base_url_str.to_string()));
        }

        let client = Client::builder()
            .user_agent("ogpscan/0.1 (inventory-bot)")
            .timeout(http_config.timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout_secs: http_config.timeout.as_secs(),
            max_retries: http_config.max_retries,
            retry_base_delay: http_config.retry_base_delay,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn action_url(&self, action: &str) -> Result<Url, AppError> {
        self.base_url
            .join(&format!("api/3/action/{}", action))
            .map_err(|e| AppError::Generic(e.to_string()))
    }

    /// Fetches all dataset ids owned by an organization, using paginated
    /// `package_search` with an `owner_org` filter query.
    ///
    /// This makes ~N/1000 API calls instead of walking the full portal
    /// listing, which matters on registries with strict rate limits.
    pub async fn search_owner_org(&self, owner_org: &str) -> Result<Vec<String>, AppError> {
        let fq = format!("owner_org:\"{}\"", owner_org);
        let mut ids = Vec::new();
        let mut start: usize = 0;

        loop {
            let mut url = self.action_url("package_search")?;
            {
                let mut pairs = url.query_pairs_mut();
                pairs
                    .append_pair("fq", &fq)
                    .append_pair("rows", &Self::PAGE_SIZE.to_string())
                    .append_pair("start", &start.to_string())
                    .append_pair("sort", "metadata_modified asc");
            }

            let resp = self.request_with_retry(&url).await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(AppError::ClientError(format!(
                    "HTTP {} from {}",
                    status.as_u16(),
                    url
                )));
            }

            let ckan_resp: CkanResponse<PackageSearchResult> = resp
                .json()
                .await
                .map_err(|e| AppError::ClientError(e.to_string()))?;

            let result = match ckan_resp.result {
                Some(result) if ckan_resp.success => result,
                _ => {
                    return Err(AppError::Generic(
                        "CKAN package_search returned success: false".to_string(),
                    ));
                }
            };

            let page_count = result.results.len();
            tracing::debug!(start, page_count, total = result.count, "Fetched search page");
            ids.extend(result.results.into_iter().map(|stub| stub.id));

            if start + page_count >= result.count || page_count < Self::PAGE_SIZE {
                break;
            }
            start += Self::PAGE_SIZE;

            // Polite delay between pages to avoid triggering rate limits
            sleep(Self::PAGE_DELAY).await;
        }

        Ok(ids)
    }

    /// Fetches the full raw record of a single dataset via `package_show`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DatasetGone` when the registry answers 404 or
    /// `success: false`, meaning the dataset vanished between listing and
    /// fetch.
    pub async fn show_package(&self, id: &str) -> Result<RawPackage, AppError> {
        let mut url = self.action_url("package_show")?;
        url.query_pairs_mut().append_pair("id", id);

        let resp = self.request_with_retry(&url).await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(AppError::DatasetGone(id.to_string()));
        }
        if !status.is_success() {
            return Err(AppError::ClientError(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }

        let ckan_resp: CkanResponse<RawPackage> = resp
            .json()
            .await
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        match ckan_resp.result {
            Some(pkg) if ckan_resp.success => Ok(pkg),
            _ => Err(AppError::DatasetGone(id.to_string())),
        }
    }

    /// Sends a GET request with retry on transient failures.
    ///
    /// Retries timeouts and connection failures with linear backoff, and 429
    /// responses with exponential backoff honoring `Retry-After`. Responses
    /// with non-retryable status codes are returned to the caller for
    /// status-specific handling; exhausted connection retries surface as
    /// `RemoteUnavailable` since nothing else in the scan can proceed.
    async fn request_with_retry(&self, url: &Url) -> Result<reqwest::Response, AppError> {
        let mut last_error = AppError::Generic("No attempts made".to_string());
        // Use higher retry count for 429s since they are transient
        let effective_max = Self::RATE_LIMIT_MAX_RETRIES.max(self.max_retries);

        for attempt in 1..=effective_max {
            match self.client.get(url.clone()).send().await {
                Ok(resp) => {
                    let status = resp.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = AppError::RateLimitExceeded;
                        if attempt < effective_max {
                            // Respect Retry-After if present, otherwise
                            // exponential backoff (capped)
                            let delay = resp
                                .headers()
                                .get("retry-after")
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.parse::<u64>().ok())
                                .map(Duration::from_secs)
                                .unwrap_or_else(|| {
                                    (self.retry_base_delay * 2_u32.pow(attempt))
                                        .min(Self::MAX_RETRY_DELAY)
                                });
                            sleep(delay).await;
                            continue;
                        }
                        return Err(last_error);
                    }

                    if status.is_server_error() && attempt < self.max_retries {
                        last_error =
                            AppError::ClientError(format!("Server error: HTTP {}", status.as_u16()));
                        let delay = self.retry_base_delay * attempt;
                        sleep(delay).await;
                        continue;
                    }

                    return Ok(resp);
                }
                Err(e) => {
                    let retryable = e.is_timeout() || e.is_connect();
                    if e.is_timeout() {
                        last_error = AppError::Timeout(self.timeout_secs);
                    } else if e.is_connect() {
                        last_error =
                            AppError::RemoteUnavailable(format!("Connection failed: {}", e));
                    } else {
                        last_error = AppError::ClientError(e.to_string());
                    }

                    if attempt < self.max_retries && retryable {
                        let delay = self.retry_base_delay * attempt;
                        sleep(delay).await;
                        continue;
                    }
                    return Err(last_error);
                }
            }
        }

        Err(last_error)
    }
}

impl CatalogueClient for RegistryClient {
    async fn search_datasets(&self, owner_org: &str) -> Result<Vec<String>, AppError> {
        self.search_owner_org(owner_org).await
    }

    async fn get_dataset(&self, id: &str) -> Result<RawPackage, AppError> {
        self.show_package(id).await
    }
}
