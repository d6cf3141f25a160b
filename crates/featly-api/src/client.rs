// Async HTTP client for the feature items REST API.
//
// Base path: {base_url}/api/features
// Auth: optional X-API-KEY header (see TransportConfig)

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{
    DataEnvelope, FeatureItemForm, FeatureItemResponse, FeatureListResponse, ListQuery,
};

const API_BASE_PATH: &str = "api/features";

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the `/api/features` resource.
///
/// Every method maps to exactly one HTTP request; no retries, caching,
/// or pagination walking happen here.
#[derive(Debug, Clone)]
pub struct FeatureClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FeatureClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers and TLS).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ensure the base URL ends with a slash so relative joins keep any
    /// path prefix (`https://host/app` → `https://host/app/api/features`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn collection_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join(API_BASE_PATH)?)
    }

    /// `{base}/api/features/{id}` with the id percent-encoded as one segment.
    fn item_url(&self, id: &str) -> Result<Url, Error> {
        let mut url = self.collection_url()?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let decoded = serde_json::from_str::<ErrorResponse>(&raw).ok();

        if status == StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: decoded
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| "missing or invalid API key".into()),
            };
        }

        match decoded {
            Some(err) => Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            },
            None => Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            },
        }
    }

    // ── Feature items ────────────────────────────────────────────────

    /// `GET /api/features?search&sort_by&sort_direction&page&per_page`
    pub async fn list_items(&self, query: &ListQuery) -> Result<FeatureListResponse, Error> {
        self.get_with_params(self.collection_url()?, &query.to_params())
            .await
    }

    /// `GET /api/features/{id}`
    pub async fn get_item(&self, id: &str) -> Result<FeatureItemResponse, Error> {
        let envelope: DataEnvelope<FeatureItemResponse> = self.get(self.item_url(id)?).await?;
        Ok(envelope.data)
    }

    /// `POST /api/features`
    pub async fn create_item(&self, form: &FeatureItemForm) -> Result<FeatureItemResponse, Error> {
        let envelope: DataEnvelope<FeatureItemResponse> =
            self.post(self.collection_url()?, form).await?;
        Ok(envelope.data)
    }

    /// `PUT /api/features/{id}`
    pub async fn update_item(
        &self,
        id: &str,
        form: &FeatureItemForm,
    ) -> Result<FeatureItemResponse, Error> {
        let envelope: DataEnvelope<FeatureItemResponse> =
            self.put(self.item_url(id)?, form).await?;
        Ok(envelope.data)
    }

    /// `DELETE /api/features/{id}`
    pub async fn delete_item(&self, id: &str) -> Result<(), Error> {
        self.delete(self.item_url(id)?).await
    }
}
