//! BigQuery REST client authenticated with a service-account key.
//!
//! Access tokens come from the OAuth2 JWT-bearer grant: an RS256 assertion
//! signed with the key's private key is exchanged at the key's `token_uri`.
//! The token is fetched once per client and reused for its lifetime, which
//! never outlives a single invocation.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use crate::error::SocialError;
use crate::http::parse_response;

const SERVICE: &str = "BigQuery";
pub const API_BASE: &str = "https://bigquery.googleapis.com/bigquery/v2";
pub const UPLOAD_BASE: &str = "https://bigquery.googleapis.com/upload/bigquery/v2";
const SCOPE: &str = "https://www.googleapis.com/auth/bigquery";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const QUERY_TIMEOUT_MS: u64 = 20_000;
const MAX_JOB_POLLS: usize = 300;
const MULTIPART_BOUNDARY: &str = "pressline_load_boundary";

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The subset of a Google service-account JSON key this client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub project_id: String,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    schema: Option<TableSchema>,
    #[serde(default)]
    rows: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
struct TableSchema {
    fields: Vec<FieldSchema>,
}

#[derive(Debug, Deserialize)]
struct FieldSchema {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    f: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
struct TableCell {
    v: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Job {
    job_reference: JobReference,
    status: Option<JobStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatus {
    state: String,
    error_result: Option<ErrorProto>,
}

#[derive(Debug, Deserialize)]
struct ErrorProto {
    message: String,
}

/// Destination of a load job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub dataset_id: String,
    pub table_id: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct BigQueryClient {
    http: reqwest::Client,
    key: ServiceAccountKey,
    api_base: String,
    upload_base: String,
    poll_interval: Duration,
    token: OnceCell<String>,
}

impl BigQueryClient {
    pub fn new(http: reqwest::Client, key: ServiceAccountKey) -> Self {
        Self::with_base_urls(http, key, API_BASE, UPLOAD_BASE)
    }

    pub fn with_base_urls(
        http: reqwest::Client,
        key: ServiceAccountKey,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            key,
            api_base: api_base.into(),
            upload_base: upload_base.into(),
            poll_interval: Duration::from_secs(1),
            token: OnceCell::new(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn project_id(&self) -> &str {
        &self.key.project_id
    }

    /// Sign the JWT-bearer assertion for this key.
    pub fn signed_assertion(&self, issued_at: i64) -> Result<String, SocialError> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPE,
            aud: &self.key.token_uri,
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }

    async fn access_token(&self) -> Result<&str, SocialError> {
        let token = self
            .token
            .get_or_try_init(|| async {
                let assertion = self.signed_assertion(Utc::now().timestamp())?;
                let response = self
                    .http
                    .post(&self.key.token_uri)
                    .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
                    .send()
                    .await?;
                let token: TokenResponse = parse_response(SERVICE, response).await?;
                tracing::debug!(client_email = %self.key.client_email, "Obtained BigQuery access token");
                Ok::<_, SocialError>(token.access_token)
            })
            .await?;
        Ok(token.as_str())
    }

    /// Run a standard-SQL query and return each row as a column→value map.
    ///
    /// Integer, float and boolean columns are converted from BigQuery's
    /// string encoding into JSON numbers and booleans.
    pub async fn query_rows(&self, sql: &str) -> Result<Vec<Map<String, Value>>, SocialError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(format!("{}/projects/{}/queries", self.api_base, self.key.project_id))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "query": sql,
                "useLegacySql": false,
                "timeoutMs": QUERY_TIMEOUT_MS,
            }))
            .send()
            .await?;

        let body: QueryResponse = parse_response(SERVICE, response).await?;
        if !body.job_complete {
            return Err(SocialError::UnexpectedResponse {
                service: SERVICE,
                message: "query did not complete within the request timeout".into(),
            });
        }
        let fields = body.schema.map(|s| s.fields).unwrap_or_default();
        Ok(decode_rows(&fields, body.rows))
    }

    /// [`query_rows`](Self::query_rows), deserialized into `T`.
    pub async fn query<T: DeserializeOwned>(&self, sql: &str) -> Result<Vec<T>, SocialError> {
        self.query_rows(sql)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(Value::Object(row)).map_err(SocialError::from))
            .collect()
    }

    /// Replace `table` with newline-delimited JSON `rows`, letting BigQuery
    /// detect the schema. Waits for the load job to finish.
    pub async fn load_ndjson(&self, table: &TableRef, rows: &[Value]) -> Result<String, SocialError> {
        let token = self.access_token().await?;
        let metadata = serde_json::json!({
            "configuration": {
                "load": {
                    "destinationTable": {
                        "projectId": self.key.project_id,
                        "datasetId": table.dataset_id,
                        "tableId": table.table_id,
                    },
                    "sourceFormat": "NEWLINE_DELIMITED_JSON",
                    "writeDisposition": "WRITE_TRUNCATE",
                    "autodetect": true,
                }
            }
        });

        let response = self
            .http
            .post(format!(
                "{}/projects/{}/jobs?uploadType=multipart",
                self.upload_base, self.key.project_id
            ))
            .bearer_auth(token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(multipart_related_body(&metadata, &to_ndjson(rows)?))
            .send()
            .await?;

        let job: Job = parse_response(SERVICE, response).await?;
        tracing::info!(
            job_id = %job.job_reference.job_id,
            table = %table.table_id,
            rows = rows.len(),
            "Started BigQuery load job"
        );
        self.wait_for_job(job).await
    }

    async fn wait_for_job(&self, mut job: Job) -> Result<String, SocialError> {
        for _ in 0..MAX_JOB_POLLS {
            if let Some(status) = &job.status {
                if status.state == "DONE" {
                    return match &status.error_result {
                        Some(err) => Err(SocialError::UnexpectedResponse {
                            service: SERVICE,
                            message: format!("job {} failed: {}", job.job_reference.job_id, err.message),
                        }),
                        None => Ok(job.job_reference.job_id),
                    };
                }
            }

            tokio::time::sleep(self.poll_interval).await;
            let token = self.access_token().await?;
            let mut request = self
                .http
                .get(format!(
                    "{}/projects/{}/jobs/{}",
                    self.api_base, self.key.project_id, job.job_reference.job_id
                ))
                .bearer_auth(token);
            if let Some(location) = &job.job_reference.location {
                request = request.query(&[("location", location)]);
            }
            job = parse_response(SERVICE, request.send().await?).await?;
        }

        Err(SocialError::UnexpectedResponse {
            service: SERVICE,
            message: format!("job {} still running after {MAX_JOB_POLLS} polls", job.job_reference.job_id),
        })
    }
}

// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------

fn decode_rows(fields: &[FieldSchema], rows: Vec<TableRow>) -> Vec<Map<String, Value>> {
    rows.into_iter()
        .map(|row| {
            fields
                .iter()
                .zip(row.f)
                .map(|(field, cell)| (field.name.clone(), decode_cell(&field.field_type, cell.v)))
                .collect()
        })
        .collect()
}

fn decode_cell(field_type: &str, value: Value) -> Value {
    let Value::String(raw) = &value else {
        return value;
    };
    match field_type {
        "INTEGER" | "INT64" => raw.parse::<i64>().map(Value::from).unwrap_or(value),
        "FLOAT" | "FLOAT64" => raw.parse::<f64>().map(Value::from).unwrap_or(value),
        "BOOLEAN" | "BOOL" => match raw.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => value,
        },
        _ => value,
    }
}

fn to_ndjson(rows: &[Value]) -> Result<String, SocialError> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(row)?);
        out.push('\n');
    }
    Ok(out)
}

fn multipart_related_body(metadata: &Value, data: &str) -> String {
    format!(
        "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n\
         --{b}\r\nContent-Type: application/octet-stream\r\n\r\n{data}\r\n--{b}--\r\n",
        b = MULTIPART_BOUNDARY,
    )
}
