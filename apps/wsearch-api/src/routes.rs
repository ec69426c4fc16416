use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use wsearch_service::{
	ClickRequest, CompareMode, CompareRequest, CompareResponse, EntityDetail, Error,
	SearchInputRequest, SearchResultsRequest, SearchResultsResponse, SuggestionsRequest,
	SuggestionsResponse, TrendingResponse,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeywordQuery {
	#[serde(default)]
	keyword: String,
	/// Kept as text so a malformed id degrades to anonymous instead of rejecting the request.
	user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompareQuery {
	#[serde(default)]
	keyword: String,
	mode: Option<String>,
	limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TrendingQuery {
	limit: Option<u32>,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/search/suggestions", get(suggestions))
		.route("/api/search/results", get(search_results))
		.route("/api/search/compare", get(compare))
		.route("/api/search/trending", get(trending))
		.route("/api/search/input", post(search_input))
		.route("/api/search/click", post(click))
		.route("/api/entities/{id}", get(entity))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn suggestions(
	State(state): State<AppState>,
	Query(query): Query<KeywordQuery>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
	let user_id = wsearch_service::parse_optional_id(query.user_id.as_deref());
	let response =
		state.service.suggestions(SuggestionsRequest { keyword: query.keyword, user_id }).await?;

	Ok(Json(response))
}

async fn search_results(
	State(state): State<AppState>,
	Query(query): Query<KeywordQuery>,
) -> Result<Json<SearchResultsResponse>, ApiError> {
	let user_id = wsearch_service::parse_optional_id(query.user_id.as_deref());
	let response = state
		.service
		.search_results(SearchResultsRequest { keyword: query.keyword, user_id })
		.await?;

	Ok(Json(response))
}

async fn compare(
	State(state): State<AppState>,
	Query(query): Query<CompareQuery>,
) -> Result<Json<CompareResponse>, ApiError> {
	let mode = match query.mode.as_deref() {
		Some(raw) => raw.parse::<CompareMode>()?,
		None => CompareMode::default(),
	};
	let response = state
		.service
		.compare(CompareRequest { keyword: query.keyword, mode, limit: query.limit })
		.await?;

	Ok(Json(response))
}

async fn trending(
	State(state): State<AppState>,
	Query(query): Query<TrendingQuery>,
) -> Result<Json<TrendingResponse>, ApiError> {
	let response = state.service.trending(query.limit).await?;

	Ok(Json(response))
}

async fn search_input(
	State(state): State<AppState>,
	Json(payload): Json<SearchInputRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.log_search_input(payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn click(
	State(state): State<AppState>,
	Json(payload): Json<ClickRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.log_click(payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn entity(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<EntityDetail>, ApiError> {
	let response = state.service.get_entity(&id).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::NotFound { message } => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Request failed on storage.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", "Storage unavailable.")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}
