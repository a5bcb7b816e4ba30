use crate::config::Configuration;
use crate::error::SinkError;
use crate::line_protocol;
use open311_influx_shared::BatchPoints;
use reqwest::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Destination for a mapped batch.
#[allow(async_fn_in_trait)]
pub trait PointSink {
    async fn write_batch(&self, config: &Configuration, batch: &BatchPoints) -> Result<(), SinkError>;
}

/// Connection to an InfluxDB 1.x HTTP API, used for a single batch write.
pub struct InfluxClient {
    http: reqwest::Client,
    base: Url,
    username: String,
    password: String,
}

impl InfluxClient {
    /// Build a client for `InfluxHost` and check the server answers `/ping`.
    pub async fn connect(config: &Configuration) -> Result<Self, SinkError> {
        let mut base = Url::parse(&config.influx_host).map_err(|e| SinkError::InvalidHost {
            host: config.influx_host.clone(),
            reason: e.to_string(),
        })?;
        // Keep any path prefix (reverse proxies) when joining endpoints.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| SinkError::Connect {
                host: config.influx_host.clone(),
                source,
            })?;

        let client = Self {
            http,
            base,
            username: config.influx_username.clone(),
            password: config.influx_password.clone(),
        };
        client.ping().await?;

        log::info!("Connected to InfluxDB at {}", client.base);
        Ok(client)
    }

    pub async fn ping(&self) -> Result<(), SinkError> {
        let url = self.endpoint("ping")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| SinkError::Connect {
                host: self.base.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SinkError::Unavailable {
                host: self.base.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    /// Write every point of `batch` in one request.
    pub async fn write(&self, batch: &BatchPoints) -> Result<(), SinkError> {
        let url = self.endpoint("write")?;
        let body = line_protocol::encode_batch(batch);

        let mut request = self
            .http
            .post(url)
            .query(&[("db", batch.database.as_str()), ("precision", batch.precision.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body);
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request.send().await.map_err(|source| SinkError::Write { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        log::info!("Wrote {} points to database {}", batch.len(), batch.database);
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, SinkError> {
        self.base.join(path).map_err(|e| SinkError::InvalidHost {
            host: self.base.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Opens one InfluxDB connection per batch and drops it afterwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct InfluxSink;

impl PointSink for InfluxSink {
    async fn write_batch(&self, config: &Configuration, batch: &BatchPoints) -> Result<(), SinkError> {
        let client = InfluxClient::connect(config).await?;
        if batch.is_empty() {
            log::info!("No points to write to {}", batch.database);
            return Ok(());
        }
        client.write(batch).await
    }
}
