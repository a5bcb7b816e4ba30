use crate::error::FetchError;
use open311_influx_shared::ServiceRequest;

/// City of Austin's public Open311 GeoReport v2 endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://311.austintexas.gov/open311/v2/requests.json";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Source of service requests for one invocation.
#[allow(async_fn_in_trait)]
pub trait ServiceRequestSource {
    async fn fetch_requests(&self) -> Result<Vec<ServiceRequest>, FetchError>;
}

pub struct Open311Client {
    http: reqwest::Client,
    endpoint: String,
}

impl Open311Client {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FetchError::Client { source })?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ServiceRequestSource for Open311Client {
    /// Fetch the full request collection in one GET. Anything but HTTP 200 fails.
    async fn fetch_requests(&self) -> Result<Vec<ServiceRequest>, FetchError> {
        let url = self.endpoint.clone();
        log::info!("Fetching service requests from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let requests: Vec<ServiceRequest> =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url: url.clone(), source })?;

        log::info!("Fetched {} service requests ({} bytes)", requests.len(), body.len());
        Ok(requests)
    }
}
