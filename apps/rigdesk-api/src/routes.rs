use axum::{
	Json, Router,
	body::Bytes,
	extract::{Multipart, Path, Query, Request, State},
	http::{HeaderMap, HeaderValue, StatusCode, Uri, header},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::state::AppState;
use rigdesk_domain::{
	pagination::Page,
	search::{SearchDocument, SearchResult},
};
use rigdesk_service::{
	AssetStorage, ConceptEmpElementItem, Error, FaqItem, NotificationItem, PageQuery,
	ProfileUpdateRequest, ReindexReport, SearchRequest, TenantAccess, UnreadCount, UserProfile,
	WellPlannerDuration, WellPlannerItem,
};

/// Header carrying the acting user, set by the gateway in front of the API.
pub const USER_ID_HEADER: &str = "x-rigdesk-user-id";

const AVATAR_FIELD: &str = "profile_image";
const PAGE_PARAMS: [&str; 2] = ["page", "page_size"];

pub fn router(state: AppState) -> Router {
	let static_route = format!("/{}/{{*key}}", state.service.static_files.location());
	let media_route = format!("/{}/{{*key}}", state.service.media.location());
	let tenant_routes = Router::new()
		.route("/api/tenants/{tenant_id}/emps/", get(list_emps))
		.route("/api/tenants/{tenant_id}/search/", get(search))
		.route("/api/tenants/{tenant_id}/support/faq/", get(list_faqs))
		.route("/api/tenants/{tenant_id}/notifications/", get(list_notifications))
		.route("/api/tenants/{tenant_id}/notifications/read/", post(read_all_notifications))
		.route("/api/tenants/{tenant_id}/notifications/unread/", get(unread_notifications))
		.route(
			"/api/tenants/{tenant_id}/notifications/{notification_id}/read/",
			post(read_notification),
		)
		.route("/api/tenants/{tenant_id}/me/", get(me))
		.route("/api/tenants/{tenant_id}/me/update/", post(update_me))
		.route("/api/tenants/{tenant_id}/me/avatar/", post(upload_avatar))
		.route(
			"/api/tenants/{tenant_id}/me/avatar/delete/",
			post(delete_avatar).delete(delete_avatar),
		)
		.route("/api/tenants/{tenant_id}/well-planners/", get(list_well_planners))
		.route("/api/tenants/{tenant_id}/well-planners/{id}/duration/", get(well_planner_duration))
		.route("/api/tenants/{tenant_id}/well-planners/{id}/delete/", post(delete_well_planner))
		.route_layer(middleware::from_fn_with_state(state.clone(), api_auth));

	Router::new()
		.route("/health", get(health))
		.merge(tenant_routes)
		.route(&static_route, get(download_static))
		.route(&media_route, get(download_media))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/search/documents", post(upsert_document))
		.route("/v1/admin/search/documents/{id}", delete(remove_document))
		.route("/v1/admin/tenants/{tenant_id}/search/reindex", post(reindex_well_planners))
		.route("/v1/admin/static/{*key}", put(upload_static))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
struct DownloadQuery {
	expires: Option<i64>,
	signature: Option<String>,
}

#[derive(Debug, Serialize)]
struct StoredObject {
	name: String,
	url: String,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn api_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
	let expected = state.service.cfg.security.api_auth_token.as_deref();

	if expected.is_some_and(|token| read_bearer_token(req.headers()) != Some(token)) {
		return json_error(StatusCode::UNAUTHORIZED, "Invalid token.").into_response();
	}

	next.run(req).await
}

async fn list_emps(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(tenant_id): Path<i64>,
) -> Result<Json<Vec<ConceptEmpElementItem>>, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;
	let response = state.service.list_concept_emp_elements(&access).await?;

	Ok(Json(response))
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	uri: Uri,
	Path(tenant_id): Path<i64>,
	Query(req): Query<SearchRequest>,
) -> Result<Json<Page<SearchResult>>, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;
	let base_url = page_base_url(&state.service.cfg.service.public_url, &uri);
	let response =
		state.service.search_page(&access, &req, &base_url, OffsetDateTime::now_utc()).await?;

	Ok(Json(response))
}

async fn list_faqs(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(tenant_id): Path<i64>,
) -> Result<Json<Vec<FaqItem>>, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;
	let response = state.service.list_faqs(&access).await?;

	Ok(Json(response))
}

async fn list_notifications(
	State(state): State<AppState>,
	headers: HeaderMap,
	uri: Uri,
	Path(tenant_id): Path<i64>,
	Query(query): Query<PageQuery>,
) -> Result<Json<Page<NotificationItem>>, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;
	let base_url = page_base_url(&state.service.cfg.service.public_url, &uri);
	let response = state.service.list_notifications(&access, &query, &base_url).await?;

	Ok(Json(response))
}

async fn read_all_notifications(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(tenant_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;

	state.service.read_all_notifications(&access).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn unread_notifications(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(tenant_id): Path<i64>,
) -> Result<Json<UnreadCount>, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;
	let response = state.service.unread_notifications(&access).await?;

	Ok(Json(response))
}

async fn read_notification(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path((tenant_id, notification_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;

	state.service.read_notification(&access, notification_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn me(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(tenant_id): Path<i64>,
) -> Result<Json<UserProfile>, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;
	let response = state.service.me(&access).await?;

	Ok(Json(response))
}

async fn update_me(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(tenant_id): Path<i64>,
	Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<UserProfile>, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;
	let response = state.service.update_me(&access, &payload).await?;

	Ok(Json(response))
}

async fn upload_avatar(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(tenant_id): Path<i64>,
	mut multipart: Multipart,
) -> Result<Json<UserProfile>, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;
	let mut upload = None;

	while let Some(field) = multipart
		.next_field()
		.await
		.map_err(|err| json_error(err.status(), err.body_text()))?
	{
		if field.name() != Some(AVATAR_FIELD) {
			continue;
		}

		let file_name = field.file_name().unwrap_or(AVATAR_FIELD).to_string();
		let bytes = field.bytes().await.map_err(|err| json_error(err.status(), err.body_text()))?;

		upload = Some((file_name, bytes));
	}

	let Some((file_name, bytes)) = upload else {
		return Err(field_error(AVATAR_FIELD, "No file was submitted."));
	};
	let response = state.service.upload_avatar(&access, &file_name, &bytes).await?;

	Ok(Json(response))
}

async fn delete_avatar(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(tenant_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;

	state.service.delete_avatar(&access).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn list_well_planners(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(tenant_id): Path<i64>,
) -> Result<Json<Vec<WellPlannerItem>>, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;
	let response = state.service.list_well_planners(&access).await?;

	Ok(Json(response))
}

async fn well_planner_duration(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path((tenant_id, well_planner_id)): Path<(i64, i64)>,
) -> Result<Json<WellPlannerDuration>, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;
	let response = state.service.well_planner_duration(&access, well_planner_id).await?;

	Ok(Json(response))
}

async fn delete_well_planner(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path((tenant_id, well_planner_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
	let access = tenant_access(&state, &headers, tenant_id).await?;

	state.service.delete_well_planner(&access, well_planner_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn download_static(
	State(state): State<AppState>,
	Path(key): Path<String>,
	Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
	download(&state.service.static_files, &key, query).await
}

async fn download_media(
	State(state): State<AppState>,
	Path(key): Path<String>,
	Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
	download(&state.service.media, &key, query).await
}

async fn upsert_document(
	State(state): State<AppState>,
	Json(payload): Json<SearchDocument>,
) -> Result<StatusCode, ApiError> {
	state.service.upsert_document(&payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn remove_document(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
	state.service.remove_document(&id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn reindex_well_planners(
	State(state): State<AppState>,
	Path(tenant_id): Path<i64>,
) -> Result<Json<ReindexReport>, ApiError> {
	let response = state.service.reindex_well_planners(tenant_id).await?;

	Ok(Json(response))
}

async fn upload_static(
	State(state): State<AppState>,
	Path(key): Path<String>,
	body: Bytes,
) -> Result<Json<StoredObject>, ApiError> {
	let storage = &state.service.static_files;
	let name = storage.save(&key, &body).await?;
	let url = storage.url(&name, OffsetDateTime::now_utc());

	Ok(Json(StoredObject { name, url }))
}

async fn tenant_access(
	state: &AppState,
	headers: &HeaderMap,
	tenant_id: i64,
) -> Result<TenantAccess, ApiError> {
	Ok(state.service.authorize(tenant_id, acting_user(headers)).await?)
}

async fn download(
	storage: &AssetStorage,
	key: &str,
	query: DownloadQuery,
) -> Result<Response, ApiError> {
	let bytes = storage
		.open_signed(key, query.expires, query.signature.as_deref(), OffsetDateTime::now_utc())
		.await?;

	Ok(([(header::CONTENT_TYPE, content_type(key))], bytes).into_response())
}

fn acting_user(headers: &HeaderMap) -> Option<i64> {
	headers.get(USER_ID_HEADER)?.to_str().ok()?.trim().parse().ok()
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(header::AUTHORIZATION)?;
	let value = raw.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}

/// Absolute URL of the current request without its paging parameters.
fn page_base_url(public_url: &str, uri: &Uri) -> String {
	let retained = uri
		.query()
		.unwrap_or_default()
		.split('&')
		.filter(|pair| !pair.is_empty())
		.filter(|pair| {
			let name = pair.split_once('=').map(|(name, _)| name).unwrap_or(pair);

			!PAGE_PARAMS.contains(&name)
		})
		.collect::<Vec<_>>();

	if retained.is_empty() {
		format!("{public_url}{}", uri.path())
	} else {
		format!("{public_url}{}?{}", uri.path(), retained.join("&"))
	}
}

fn content_type(key: &str) -> &'static str {
	let ext = key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()).unwrap_or_default();

	match ext.as_str() {
		"png" => "image/png",
		"jpg" | "jpeg" => "image/jpeg",
		"gif" => "image/gif",
		"webp" => "image/webp",
		"svg" => "image/svg+xml",
		"css" => "text/css",
		"js" => "text/javascript",
		"pdf" => "application/pdf",
		_ => "application/octet-stream",
	}
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	detail: Value,
	retry_after: Option<u64>,
}
impl ApiError {
	fn new(status: StatusCode, detail: Value) -> Self {
		Self { status, detail, retry_after: None }
	}
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> ApiError {
	ApiError::new(status, Value::String(message.into()))
}

pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> ApiError {
	let mut fields = Map::new();

	fields.insert(field.into(), Value::Array(vec![Value::String(message.into())]));

	ApiError::new(StatusCode::BAD_REQUEST, Value::Object(fields))
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::Unauthenticated | Error::PermissionDenied =>
				json_error(StatusCode::FORBIDDEN, err.to_string()),
			Error::Validation { field, message } => field_error(field, message),
			Error::InvalidRequest { message } => json_error(StatusCode::BAD_REQUEST, message),
			Error::NotFound { message } => json_error(StatusCode::NOT_FOUND, message),
			Error::Throttled { wait_secs } => {
				let mut api_err = json_error(StatusCode::TOO_MANY_REQUESTS, err.to_string());

				api_err.retry_after = Some(wait_secs);

				api_err
			},
			Error::Conflict { .. } => json_error(StatusCode::CONFLICT, err.to_string()),
			Error::Qdrant { .. } | Error::Redis { .. } => {
				tracing::error!(error = %err, "Upstream dependency failed.");

				json_error(StatusCode::BAD_GATEWAY, err.to_string())
			},
			Error::Storage { .. } | Error::Crypto { .. } => {
				tracing::error!(error = %err, "Request failed.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let mut body = Map::new();

		body.insert("detail".to_string(), self.detail);

		let mut response = (self.status, Json(Value::Object(body))).into_response();

		if let Some(wait_secs) = self.retry_after {
			response.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(wait_secs));
		}

		response
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn page_base_url_drops_paging_parameters() {
		let uri = "/api/tenants/1/search/?query=rig%20a&page=2&page_size=5"
			.parse::<Uri>()
			.expect("Invalid URI.");

		assert_eq!(
			page_base_url("https://rigdesk.test", &uri),
			"https://rigdesk.test/api/tenants/1/search/?query=rig%20a"
		);

		let uri = "/api/tenants/1/notifications/?page=3".parse::<Uri>().expect("Invalid URI.");

		assert_eq!(
			page_base_url("https://rigdesk.test", &uri),
			"https://rigdesk.test/api/tenants/1/notifications/"
		);
	}

	#[test]
	fn bearer_tokens_are_trimmed() {
		let mut headers = HeaderMap::new();

		assert_eq!(read_bearer_token(&headers), None);

		headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer  secret "));

		assert_eq!(read_bearer_token(&headers), Some("secret"));

		headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));

		assert_eq!(read_bearer_token(&headers), None);
	}

	#[test]
	fn acting_user_requires_a_numeric_id() {
		let mut headers = HeaderMap::new();

		headers.insert(USER_ID_HEADER, HeaderValue::from_static("42"));

		assert_eq!(acting_user(&headers), Some(42));

		headers.insert(USER_ID_HEADER, HeaderValue::from_static("admin"));

		assert_eq!(acting_user(&headers), None);
	}
}
