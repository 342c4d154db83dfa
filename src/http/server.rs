//! HTTP API Server for the summary index
//!
//! Exposes triple-pattern fragments, the declared query features and a health
//! check over a shared [`SummaryDatasource`].

use crate::{
    datasource::{Datasource, SummaryDatasource},
    error::SummaryError,
    query::{parse_iri, parse_term, Feature, QueryMetadata, TriplePatternQuery},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use oxigraph::model::{NamedNode, Term};
use serde::{Deserialize, Serialize};
use std::{future::Future, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Query string of `GET /fragments`
#[derive(Debug, Default, Deserialize)]
pub struct FragmentParams {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
    #[serde(default)]
    pub offset: usize,
    pub limit: Option<usize>,
    pub source_predicate: Option<String>,
}

/// A triple with every term in N-Triples syntax
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripleDto {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// Response for a fragment request
#[derive(Debug, Serialize)]
pub struct FragmentResponse {
    pub metadata: QueryMetadata,
    pub triples: Vec<TripleDto>,
}

/// Response for the features endpoint
#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    pub features: &'static [Feature],
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub statements: usize,
    pub filters: usize,
    pub index_version: u64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub struct AppState {
    pub datasource: Arc<SummaryDatasource>,
}

/// Custom error type for API errors
#[derive(Debug)]
pub enum ApiError {
    Summary(SummaryError),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Summary(e @ SummaryError::QueryError(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Summary(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        ApiError::Summary(err)
    }
}

/// Create the HTTP server with all routes
pub fn create_server(datasource: Arc<SummaryDatasource>) -> Router {
    let state = Arc::new(AppState { datasource });

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/fragments", get(get_fragment))
        .route("/features", get(get_features))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// GET /health - Store and filter index status
async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let filters = state.datasource.filters();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        statements: state.datasource.store().len()?,
        filters: filters.len(),
        index_version: filters.version(),
    }))
}

/// GET /features - Query features the datasource supports
async fn get_features(State(state): State<Arc<AppState>>) -> Json<FeaturesResponse> {
    Json(FeaturesResponse { features: state.datasource.supported_features() })
}

/// GET /fragments - Evaluate one triple pattern
async fn get_fragment(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FragmentParams>,
) -> Result<Json<FragmentResponse>, ApiError> {
    let query = to_query(params)?;
    if !state.datasource.supports(&query) {
        return Err(ApiError::BadRequest("Unsupported query features".to_string()));
    }

    let outcome = state.datasource.execute_query(&query)?;
    let triples = outcome
        .triples
        .into_iter()
        .map(|triple| TripleDto {
            subject: triple.subject.to_string(),
            predicate: triple.predicate.to_string(),
            object: triple.object.to_string(),
        })
        .collect();

    Ok(Json(FragmentResponse { metadata: outcome.metadata, triples }))
}

fn to_query(params: FragmentParams) -> Result<TriplePatternQuery, ApiError> {
    let predicate = match parse_term(params.predicate.as_deref().unwrap_or_default())? {
        Some(Term::NamedNode(node)) => Some(node),
        Some(other) => {
            return Err(ApiError::BadRequest(format!("Predicate {} is not an IRI", other)));
        }
        None => None,
    };
    let source_predicate: Option<NamedNode> = match params.source_predicate.as_deref() {
        Some(value) if !value.trim().is_empty() => Some(parse_iri(value)?),
        _ => None,
    };

    Ok(TriplePatternQuery {
        subject: parse_term(params.subject.as_deref().unwrap_or_default())?,
        predicate,
        object: parse_term(params.object.as_deref().unwrap_or_default())?,
        offset: params.offset,
        limit: params.limit,
        source_predicate,
    })
}

/// Start the HTTP server on the specified address, serving until `shutdown` resolves
pub async fn start_server(
    addr: &str,
    datasource: Arc<SummaryDatasource>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server(datasource);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Summary index HTTP API listening on http://{}", addr);
    log::info!("  GET /fragments?subject=&predicate=&object=&offset=&limit=&source_predicate=");
    log::info!("  GET /features");
    log::info!("  GET /health");

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_query_parses_terms() {
        let params = FragmentParams {
            subject: Some("http://schema.org/Book".to_string()),
            predicate: Some("<http://purl.org/dc/terms/isPartOf>".to_string()),
            object: None,
            offset: 10,
            limit: Some(5),
            source_predicate: Some("http://www.w3.org/1999/02/22-rdf-syntax-ns#type".to_string()),
        };
        let query = to_query(params).unwrap();
        assert!(query.source_selection_subject().is_some());
        assert_eq!(query.offset, 10);
        assert_eq!(query.limit, Some(5));
        assert!(query.source_predicate.is_some());
    }

    #[test]
    fn test_to_query_rejects_literal_predicate() {
        let params =
            FragmentParams { predicate: Some("\"title\"".to_string()), ..Default::default() };
        assert!(matches!(to_query(params), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_query_errors_map_to_bad_request() {
        let response =
            ApiError::from(SummaryError::QueryError("bad term".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response =
            ApiError::from(SummaryError::StoreError("broken".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
