//! HTTP handlers for Shipyard server.

use std::fmt;
use std::sync::Arc;

use actix_web::error::{BlockingError, InternalError};
use actix_web::{HttpResponse, Responder, delete, get, post, web};
use serde::{Deserialize, Serialize};
use shipyard_core::{
    PageRequest, Ship, ShipCriteria, ShipOrder, ShipPayload, ShipRepository, ShipService,
    ShipyardError,
};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::openapi::ApiDoc;

const DEFAULT_PAGE_SIZE: u32 = 3;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship CRUD service over the configured repository.
    pub ships: ShipService<Arc<dyn ShipRepository>>,
}

impl AppState {
    /// Build state around a repository.
    pub fn new(repository: Arc<dyn ShipRepository>) -> Self {
        Self {
            ships: ShipService::new(repository),
        }
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Sorting and paging parameters for ship listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Sort key.
    #[serde(default)]
    pub order: ShipOrder,
    /// Zero-based page index.
    #[serde(default)]
    pub page_number: u32,
    /// Ships per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Register every ship route plus the OpenAPI document.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| bad_request(err)))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| bad_request(err)));
    // `/ships/count` must be registered ahead of `/ships/{id}`.
    cfg.service(list_ships)
        .service(count_ships)
        .service(create_ship)
        .service(get_ship)
        .service(update_ship)
        .service(delete_ship)
        .service(openapi_json);
}

/// Reject a request whose query string or body could not be extracted.
fn bad_request<E>(err: E) -> actix_web::Error
where
    E: fmt::Debug + fmt::Display + 'static,
{
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        message: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}

/// An empty body (or JSON `null`) is no payload; anything else must parse.
fn optional_payload(body: &[u8]) -> Result<Option<ShipPayload>, HttpResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<ShipPayload>>(body).map_err(|err| {
        HttpResponse::BadRequest().json(ErrorResponse {
            message: format!("invalid ship payload: {err}"),
        })
    })
}

fn error_response(err: &ShipyardError) -> HttpResponse {
    let body = ErrorResponse {
        message: err.to_string(),
    };
    match err {
        ShipyardError::InvalidId(_)
        | ShipyardError::InvalidShip(_)
        | ShipyardError::InvalidQuery(_) => HttpResponse::BadRequest().json(body),
        ShipyardError::NotFound(_) => HttpResponse::NotFound().json(body),
        ShipyardError::Storage(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn respond<T>(
    result: Result<shipyard_core::Result<T>, BlockingError>,
    ok: impl FnOnce(T) -> HttpResponse,
) -> HttpResponse {
    match result {
        Ok(Ok(value)) => ok(value),
        Ok(Err(err)) => error_response(&err),
        Err(err) => HttpResponse::InternalServerError().json(ErrorResponse {
            message: format!("ship task failed: {err}"),
        }),
    }
}

#[utoipa::path(
    get,
    path = "/ships",
    params(ShipCriteria, PageParams),
    responses(
        (status = 200, description = "Current page of matching ships", body = [Ship]),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/ships")]
/// List ships matching the filters, one page at a time.
pub async fn list_ships(
    state: web::Data<AppState>,
    criteria: web::Query<ShipCriteria>,
    paging: web::Query<PageParams>,
) -> impl Responder {
    let paging = paging.into_inner();
    let page = match PageRequest::new(paging.page_number, paging.page_size) {
        Ok(page) => page,
        Err(err) => return error_response(&err),
    };
    let criteria = criteria.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.list(&criteria, paging.order, Some(page))).await;
    respond(result, |ships| HttpResponse::Ok().json(ships))
}

#[utoipa::path(
    get,
    path = "/ships/count",
    params(ShipCriteria),
    responses(
        (status = 200, description = "Number of matching ships", body = u64),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/ships/count")]
/// Count every ship matching the filters.
pub async fn count_ships(
    state: web::Data<AppState>,
    criteria: web::Query<ShipCriteria>,
) -> impl Responder {
    let criteria = criteria.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.count(&criteria)).await;
    respond(result, |count| HttpResponse::Ok().json(count))
}

#[utoipa::path(
    post,
    path = "/ships",
    request_body = ShipPayload,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Invalid ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/ships")]
/// Create a ship from a complete payload.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipPayload>,
) -> impl Responder {
    let payload = payload.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.create(payload)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    get,
    path = "/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship", body = Ship),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/ships/{id}")]
/// Fetch one ship.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let raw_id = path.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.get(&raw_id)).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    post,
    path = "/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    request_body = ShipPayload,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Malformed identifier or payload", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/ships/{id}")]
/// Partially update one ship.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    let raw_id = path.into_inner();
    let payload = match optional_payload(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let ships = state.ships.clone();
    let result = web::block(move || ships.update(&raw_id, payload.as_ref())).await;
    respond(result, |ship| HttpResponse::Ok().json(ship))
}

#[utoipa::path(
    delete,
    path = "/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/ships/{id}")]
/// Delete one ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let raw_id = path.into_inner();
    let ships = state.ships.clone();
    let result = web::block(move || ships.delete(&raw_id)).await;
    respond(result, |()| HttpResponse::Ok().finish())
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI specification")
    ),
    tag = "system"
)]
#[get("/openapi.json")]
/// Serve the OpenAPI specification.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
