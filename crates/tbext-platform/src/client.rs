//! ThingsBoard REST client
//!
//! Every call is awaited before the next one is issued and none is retried.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Response;
use tbext_core::types::{
    ListingConfig, LoginRequest, LoginResponse, NetworkConfig, PageData, TbResource, EXTENSION,
    JS_MODULE,
};
use tbext_core::{Error, Result};
use tbext_secrets::SecureString;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the session token
pub const AUTH_HEADER: &str = "X-Authorization";

const LOGIN_PATH: &str = "/api/auth/login";
const RESOURCE_PATH: &str = "/api/resource";

/// Authenticated session, valid for the rest of the process
pub struct Session {
    header: HeaderValue,
}

impl Session {
    /// Build the `X-Authorization` header for a token once, up front
    pub fn new(token: &SecureString) -> Result<Self> {
        let mut header = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|_| Error::InvalidSessionToken)?;
        header.set_sensitive(true);
        Ok(Self { header })
    }

    fn bearer(&self) -> HeaderValue {
        self.header.clone()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("token", &"[REDACTED]").finish()
    }
}

/// Client for one ThingsBoard instance
pub struct ThingsBoardClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
    strict_listing: bool,
}

impl ThingsBoardClient {
    /// Create a client for `base_url` (scheme and host, optionally a path prefix)
    pub fn new(base_url: &str, network: &NetworkConfig) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| Error::invalid_base_url(&base_url, e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .default_headers(headers);
        if let Some(secs) = network.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| Error::request("Client setup", e))?;

        Ok(Self {
            http,
            base_url,
            page_size: network.page_size.max(1),
            strict_listing: false,
        })
    }

    /// Apply enumeration settings
    pub fn with_listing(mut self, listing: &ListingConfig) -> Self {
        self.strict_listing = listing.strict;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| Error::invalid_base_url(raw, e.to_string()))
    }

    /// Exchange username and password for a session token
    pub async fn login(&self, username: &str, password: &SecureString) -> Result<Session> {
        let url = self.endpoint(LOGIN_PATH)?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                username,
                password: password.expose(),
            })
            .send()
            .await
            .map_err(|e| Error::request("Login", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::login_failed(status.as_u16(), body));
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| Error::request("Login", e))?;

        let token = login
            .token
            .filter(|t| !t.is_empty())
            .map(SecureString::new)
            .ok_or(Error::MissingSessionToken)?;
        Session::new(&token)
    }

    /// Fetch one page of resources of the given type and sub-type
    pub async fn fetch_page(
        &self,
        session: &Session,
        resource_type: &str,
        resource_sub_type: &str,
        page: u32,
    ) -> Result<PageData<TbResource>> {
        let mut url = self.endpoint(RESOURCE_PATH)?;
        url.query_pairs_mut()
            .append_pair("pageSize", &self.page_size.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("resourceType", resource_type)
            .append_pair("resourceSubType", resource_sub_type);
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(AUTH_HEADER, session.bearer())
            .send()
            .await
            .map_err(|e| Error::request("Resource listing", e))?;

        let response = Self::check_status("Resource listing", response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::request("Resource listing", e))
    }

    /// All resources of a type and sub-type, in server order
    ///
    /// Pages are fetched from 0 while the server reports `hasNext`. A page
    /// that fails ends the listing with the resources gathered so far, unless
    /// strict listing is enabled, in which case the error is returned.
    pub async fn list_resources(
        &self,
        session: &Session,
        resource_type: &str,
        resource_sub_type: &str,
    ) -> Result<Vec<TbResource>> {
        let mut resources = Vec::new();
        let mut page = 0;

        loop {
            match self
                .fetch_page(session, resource_type, resource_sub_type, page)
                .await
            {
                Ok(page_data) => {
                    debug!(
                        page,
                        count = page_data.data.len(),
                        has_next = page_data.has_next,
                        "Fetched resource page"
                    );
                    resources.extend(page_data.data);
                    if !page_data.has_next {
                        break;
                    }
                    page += 1;
                }
                Err(e) if !self.strict_listing => {
                    warn!("Error fetching extension modules: {}", e);
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(resources)
    }

    /// All JS extension modules visible to the session
    pub async fn list_extension_modules(&self, session: &Session) -> Result<Vec<TbResource>> {
        self.list_resources(session, JS_MODULE, EXTENSION).await
    }

    /// Create or update a resource; the server decides by the presence of `id`
    pub async fn save_resource(&self, session: &Session, resource: &TbResource) -> Result<TbResource> {
        let url = self.endpoint(RESOURCE_PATH)?;
        debug!("POST {} (update: {})", url, resource.is_update());

        let response = self
            .http
            .post(url)
            .header(AUTH_HEADER, session.bearer())
            .json(resource)
            .send()
            .await
            .map_err(|e| Error::request("Resource upload", e))?;

        debug!("Response status: {}", response.status());
        let response = Self::check_status("Resource upload", response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::request("Resource upload", e))
    }

    /// Turn a non-success response into an error carrying its body
    async fn check_status(operation: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::http_status(operation, status.as_u16(), body))
    }
}
