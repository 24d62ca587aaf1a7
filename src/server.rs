use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::composer;
use crate::error::ServiceError;
use crate::store::QuoteRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn QuoteRepository>,
}

/// Builds the service router. The only resource is the rendered quotation
/// document; requests that omit the quote id are answered without touching
/// the repository.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/quotations/:quote_id",
            get(generate_quotation_pdf).options(preflight),
        )
        .route(
            "/quotations",
            get(missing_identifier).options(preflight),
        )
        .route(
            "/quotations/",
            get(missing_identifier).options(preflight),
        )
        .layer(middleware::from_fn(cors_headers))
        .with_state(state)
}

/// GET /quotations/{quote_id}: fetch, render and return the PDF bytes as a
/// download attachment.
async fn generate_quotation_pdf(
    State(state): State<AppState>,
    Path(quote_id): Path<String>,
) -> Result<Response, ServiceError> {
    log::info!("Generating the quotation document for quote {quote_id}");

    let bundle = state.repository.fetch_bundle(&quote_id).await?;
    let pdf_bytes = composer::render(&bundle)?;
    log::info!(
        "Rendered {} bytes covering {} selected items",
        pdf_bytes.len(),
        bundle.selected_item_count()
    );

    let disposition = format!("attachment; filename=\"quotation-{quote_id}.pdf\"");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf_bytes,
    )
        .into_response())
}

async fn missing_identifier() -> ServiceError {
    ServiceError::MissingIdentifier
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Browser clients call the service directly, so every response carries the
/// permissive CORS headers, error responses included.
async fn cors_headers(
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("authorization, x-client-info, apikey, content-type"),
    );
    response
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        log::error!("Failed to produce the quotation document: {self}");
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
