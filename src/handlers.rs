use actix_web::error::PayloadError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError, Result};
use futures_util::StreamExt;
use serde_json::json;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::PostprocessError;
use crate::postprocess::assemble_response;

/// Everything that can reject a `/postprocess` request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Postprocess(#[from] PostprocessError),

    #[error("request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Payload(#[from] PayloadError),
}

impl RequestError {
    pub fn kind(&self) -> &'static str {
        match self {
            RequestError::Postprocess(e) => e.kind(),
            RequestError::PayloadTooLarge { .. } => "payload_too_large",
            RequestError::Payload(_) => "payload_error",
        }
    }
}

impl ResponseError for RequestError {
    fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Postprocess(PostprocessError::Parse(_)) => StatusCode::BAD_REQUEST,
            RequestError::Postprocess(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RequestError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RequestError::Payload(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, RequestError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > limit {
            return Err(RequestError::PayloadTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

async fn handle(
    payload: web::Payload,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, RequestError> {
    let body = read_body(payload, config.server.max_payload_bytes).await?;
    let result = assemble_response(&body, config.postprocess.rounding)?;

    info!(rows = result.prediction.len(), "prediction ready");
    Ok(HttpResponse::Ok().json(result))
}

/// Round the model output carried in the request body and echo the payload back.
pub async fn postprocess(
    payload: web::Payload,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, RequestError> {
    let span = info_span!("postprocess", request_id = %Uuid::new_v4());
    async move {
        handle(payload, config).await.inspect_err(|e| {
            warn!(kind = e.kind(), "rejected inference payload: {}", e);
        })
    }
    .instrument(span)
    .await
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Register the service routes; shared by the binary and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/postprocess").route(web::post().to(postprocess)))
        .service(web::resource("/health").route(web::get().to(health)));
}
