//! HTTP GraphQL client for the engine session

use super::error::EngineError;
use super::settings::EngineSettings;
use async_trait::async_trait;
use langbridge_application::{GraphQlRequest, QueryTransport, TransportError};
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "no_variables")]
    variables: &'a Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_name: Option<&'a str>,
}

fn no_variables(variables: &&Map<String, Value>) -> bool {
    variables.is_empty()
}

#[derive(Deserialize)]
struct ResponseBody {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<ResponseError>,
}

#[derive(Deserialize)]
struct ResponseError {
    message: String,
}

/// [`QueryTransport`] over HTTP, authenticated with the session token.
pub struct EngineClient {
    http: reqwest::Client,
    endpoint: Url,
    token: SecretString,
}

impl EngineClient {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        let endpoint =
            Url::parse(&settings.endpoint).map_err(|e| EngineError::InvalidEndpoint {
                endpoint: settings.endpoint.clone(),
                message: e.to_string(),
            })?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint,
            token: settings.token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, request: &GraphQlRequest) -> Result<Value, TransportError> {
        let body = RequestBody {
            query: &request.query,
            variables: &request.variables,
            operation_name: request.operation_name.as_deref(),
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .basic_auth(self.token.expose_secret(), Some(""))
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::ConnectionError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::ConnectionError(e.to_string()))?;
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ResponseBody = serde_json::from_str(&text)
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
        if !parsed.errors.is_empty() {
            return Err(TransportError::GraphQl {
                messages: parsed.errors.into_iter().map(|e| e.message).collect(),
            });
        }
        parsed
            .data
            .ok_or_else(|| TransportError::InvalidResponse("response has no data".to_string()))
    }
}

#[async_trait]
impl QueryTransport for EngineClient {
    async fn execute(
        &self,
        request: GraphQlRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        debug!(
            operation = request.operation_name.as_deref().unwrap_or("-"),
            bytes = request.query.len(),
            "Sending engine request"
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = self.send(&request) => result,
        };
        if let Err(e) = &result
            && !e.is_cancelled()
        {
            warn!(error = %e, "Engine request failed");
        }
        result
    }
}
