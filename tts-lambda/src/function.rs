//! HTTP-facing Lambda function.
//!
//! Maps an API Gateway / function URL event onto `SpeechHandler`:
//! - `OPTIONS` preflight short-circuits with CORS headers and no body
//! - malformed JSON and invalid requests become 400 responses
//! - synthesis or storage failures become 500 responses
//!
//! Every response carries the same CORS header set.

use lambda_http::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use lambda_http::http::{HeaderMap, HeaderValue, Method, StatusCode};
use lambda_http::{Body, Request, Response};
use serde::Serialize;
use tracing::{debug, error, instrument, warn};
use tts_lambda_common::config::Config;
use tts_lambda_common::error::Error;

use crate::handler::{SpeechHandler, SpeechRequest, SpeechResult};

/// Error body for unparsable request bodies.
pub const INVALID_JSON_ERROR: &str = "Invalid JSON in request body";

/// Error body for any failure after validation.
pub const CONVERSION_FAILED_ERROR: &str = "Failed to convert text to speech";

/// Message included in successful responses.
pub const SUCCESS_MESSAGE: &str = "Text successfully converted to speech";

/// Successful response body.
#[derive(Debug, Serialize)]
pub struct SuccessBody<'a> {
    pub message: &'static str,
    #[serde(flatten)]
    pub result: &'a SpeechResult,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

/// The Lambda function.
pub struct SpeechFunction {
    handler: SpeechHandler,
}

impl SpeechFunction {
    /// Wrap an existing handler.
    pub fn new(handler: SpeechHandler) -> Self {
        Self { handler }
    }

    /// Build the function with AWS-backed collaborators.
    pub async fn from_config(config: Config) -> Self {
        Self::new(SpeechHandler::new(config).await)
    }

    /// Handle one invocation event.
    ///
    /// Never fails: every outcome is expressed as an HTTP response.
    #[instrument(level = "info", name = "handle_event", skip_all, fields(method = %event.method()))]
    pub async fn handle(&self, event: Request) -> Response<Body> {
        debug!(body_bytes = event.body().len(), "Received event");

        if event.method() == Method::OPTIONS {
            return empty_response(StatusCode::OK);
        }

        let request = match SpeechRequest::from_json(event.body()) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected unparsable request body");
                return json_response(StatusCode::BAD_REQUEST, &ErrorBody::new(INVALID_JSON_ERROR));
            }
        };

        match self.handler.convert(&request).await {
            Ok(result) => json_response(
                StatusCode::OK,
                &SuccessBody {
                    message: SUCCESS_MESSAGE,
                    result: &result,
                },
            ),
            Err(Error::Validation(message)) => {
                debug!(reason = %message, "Rejected invalid request");
                json_response(StatusCode::BAD_REQUEST, &ErrorBody::new(message))
            }
            Err(e) => {
                error!(error = %e, "Text-to-speech conversion failed");
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &ErrorBody {
                        error: CONVERSION_FAILED_ERROR.to_string(),
                        message: Some(e.to_string()),
                    },
                )
            }
        }
    }
}

/// The CORS and content-type headers attached to every response.
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn response(status: StatusCode, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = cors_headers();
    response
}

fn empty_response(status: StatusCode) -> Response<Body> {
    response(status, Body::Empty)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Body> {
    match serde_json::to_string(body) {
        Ok(json) => response(status, Body::Text(json)),
        Err(e) => {
            error!(error = %e, "Failed to serialize response body");
            response(
                StatusCode::INTERNAL_SERVER_ERROR,
                Body::Text(format!(r#"{{"error":"{}"}}"#, CONVERSION_FAILED_ERROR)),
            )
        }
    }
}
