//! Feishu Bitable writer.

use super::{BitableConfig, DestinationError, FieldNames, RecordSink};
use crate::records::OutputRecord;
use async_trait::async_trait;
use chrono::{Local, TimeZone};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span, Instrument};

/// Maximum records accepted by one `batch_create` call.
pub const MAX_BATCH_SIZE: usize = 500;

/// Tokens are refreshed this long before Feishu says they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(300);

const TOKEN_ENDPOINT: &str = "tenant_access_token";
const BATCH_CREATE_ENDPOINT: &str = "batch_create";

/// Common `{ code, msg, ... }` reply shape of the Feishu Open API.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    tenant_access_token: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    expire: u64,
}

#[derive(Debug, Default, Deserialize)]
struct BatchCreateBody {
    #[serde(default)]
    data: Option<BatchCreateData>,
}

#[derive(Debug, Default, Deserialize)]
struct BatchCreateData {
    #[serde(default)]
    records: Vec<Value>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Writes records into a Feishu Bitable table.
///
/// The tenant access token is cached per instance and refreshed shortly
/// before it expires.
#[derive(Debug)]
pub struct BitableSink {
    client: Client,
    config: BitableConfig,
    token: Mutex<Option<CachedToken>>,
}

impl BitableSink {
    /// Creates a writer for the configured table.
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError::Client`] if the HTTP client cannot be built.
    pub fn new(config: BitableConfig) -> Result<Self, DestinationError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(DestinationError::Client)?;

        Ok(Self {
            client,
            config,
            token: Mutex::new(None),
        })
    }

    /// Returns a valid tenant access token, fetching one if needed.
    async fn access_token(&self) -> Result<String, DestinationError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
            debug!("Cached tenant access token expired");
        }

        let (value, lifetime) = self.request_token().await?;
        *cached = Some(CachedToken {
            value: value.clone(),
            refresh_at: Instant::now() + lifetime.saturating_sub(TOKEN_REFRESH_MARGIN),
        });
        Ok(value)
    }

    async fn request_token(&self) -> Result<(String, Duration), DestinationError> {
        info!("Requesting tenant access token");
        let url = self.endpoint_url("auth/v3/tenant_access_token/internal");
        let payload = json!({
            "app_id": self.config.app_id(),
            "app_secret": self.config.app_secret(),
        });

        let body: TokenBody = self.post(TOKEN_ENDPOINT, &url, None, &payload).await?;
        let token = body.tenant_access_token.ok_or(DestinationError::MissingToken)?;
        Ok((token, Duration::from_secs(body.expire)))
    }

    async fn batch_create(
        &self,
        token: &str,
        records: &[OutputRecord],
        date_millis: i64,
    ) -> Result<usize, DestinationError> {
        let url = self.endpoint_url(&format!(
            "bitable/v1/apps/{}/tables/{}/records/batch_create",
            self.config.app_token(),
            self.config.table_id()
        ));
        let rows: Vec<Value> = records
            .iter()
            .map(|record| json!({ "fields": build_fields(self.config.fields(), record, date_millis) }))
            .collect();

        let body: BatchCreateBody = self
            .post(BATCH_CREATE_ENDPOINT, &url, Some(token), &json!({ "records": rows }))
            .await?;

        // Without `data` Feishu gave no count, so the whole chunk is assumed written
        Ok(body
            .data
            .map_or(records.len(), |data| data.records.len()))
    }

    /// Posts `payload` and unwraps the `{ code, msg }` envelope.
    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: &str,
        bearer: Option<&str>,
        payload: &Value,
    ) -> Result<T, DestinationError> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .json(payload);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| {
            error!(endpoint, error = %source, "Feishu request error");
            DestinationError::Request {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| DestinationError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !status.is_success() {
            error!(endpoint, status = status.as_u16(), body = %text, "Feishu HTTP error");
            return Err(DestinationError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|source| DestinationError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if envelope.code != 0 {
            error!(endpoint, code = envelope.code, msg = %envelope.msg, "Feishu API error");
            return Err(DestinationError::Api {
                endpoint: endpoint.to_string(),
                code: envelope.code,
                msg: envelope.msg,
            });
        }

        Ok(envelope.body)
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/open-apis/{path}",
            self.config.base_url().as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl RecordSink for BitableSink {
    fn name(&self) -> &str {
        "feishu-bitable"
    }

    async fn write(&self, records: &[OutputRecord]) -> Result<usize, DestinationError> {
        if records.is_empty() {
            info!("No records to write");
            return Ok(0);
        }

        let span = info_span!("bitable_write", table = %self.config.table_id(), count = records.len());

        async {
            let token = self.access_token().await?;
            let date = today_midnight_millis();
            let mut written = 0;

            for chunk in records.chunks(MAX_BATCH_SIZE) {
                written += self.batch_create(&token, chunk, date).await?;
                debug!(written, "Batch written");
            }

            info!(written, "Records written to Bitable");
            Ok(written)
        }
        .instrument(span)
        .await
    }
}

/// Maps one record onto the table's columns.
pub fn build_fields(names: &FieldNames, record: &OutputRecord, date_millis: i64) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(names.date.clone(), json!(date_millis));
    fields.insert(names.rank.clone(), json!(record.rank));
    fields.insert(names.title.clone(), json!(record.title));
    fields.insert(names.description.clone(), json!(record.description));
    fields.insert(names.reason.clone(), json!(record.reason));
    fields.insert(names.author.clone(), json!(record.author));
    fields.insert(
        names.link.clone(),
        json!({ "text": record.link.text, "link": record.link.link }),
    );
    fields.insert(names.language.clone(), json!(record.language));
    fields.insert(names.stars_today.clone(), json!(record.stars_today));
    fields.insert(names.total_stars.clone(), json!(record.total_stars));
    fields.insert(names.forks.clone(), json!(record.forks));
    fields
}

/// Epoch milliseconds of today's local midnight.
fn today_midnight_millis() -> i64 {
    let now = Local::now();
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
        .unwrap_or(now)
        .timestamp_millis()
}
