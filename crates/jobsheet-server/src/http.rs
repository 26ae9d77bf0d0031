//! HTTP surface: request dispatch and the accept loop
//!
//! Routing is a plain function from (method, url, body) to a status code and
//! JSON body, so the whole surface is testable without opening a socket. The
//! accept loop around it is a thin shell: read the body, dispatch, respond.

use std::collections::BTreeMap;
use std::io::Read;

use jobsheet_core::{Record, Schema};
use serde_json::{json, Value as JsonValue};
use tiny_http::{Header, Method, Response, Server};

use crate::error::{ServiceError, ServiceResult};
use crate::service::SyncService;

/// A dispatched response: status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: JsonValue,
}

impl ApiResponse {
    fn ok(body: JsonValue) -> Self {
        Self { status: 200, body }
    }

    fn message<S: Into<String>>(status: u16, text: S) -> Self {
        Self {
            status,
            body: json!({ "message": text.into() }),
        }
    }
}

impl From<ServiceError> for ApiResponse {
    fn from(err: ServiceError) -> Self {
        ApiResponse::message(err.status(), err.to_string())
    }
}

/// Route one request against the service.
pub fn dispatch(service: &SyncService, method: &Method, url: &str, body: &str) -> ApiResponse {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    };
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| decode_component(s, false))
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    let result = match (method, segments.as_slice()) {
        (Method::Get, ["headers"]) => list_headers(service),
        (Method::Get, ["refined"]) => list_refined(service),
        (Method::Get, ["records"]) => list_records(service),
        (Method::Get, ["search"]) => search(service, query),
        (Method::Get, ["locks"]) => read_locks(service),
        (Method::Post, ["records"]) => insert(service, body),
        (Method::Post, ["records", id]) => update(service, id, body),
        (Method::Post, ["refined", "sync"]) => resync(service),
        (Method::Post, ["refined", field]) => add_suggestion(service, field, body),
        (Method::Post, ["locks"]) => write_locks(service, body),
        (_, segments) if route_exists(segments) => {
            Ok(ApiResponse::message(405, "method not allowed"))
        }
        _ => Ok(ApiResponse::message(404, "not found")),
    };

    result.unwrap_or_else(ApiResponse::from)
}

/// Run the HTTP server until the process exits. Each request is handled to
/// completion before the next is taken from the accept queue.
pub fn serve(service: &SyncService) -> ServiceResult<()> {
    let addr = &service.config().bind_addr;
    let server = Server::http(addr)
        .map_err(|err| ServiceError::internal(format!("binding {addr}: {err}")))?;
    log::info!("listening on http://{addr}");

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let mut body = String::new();
        let response = match request.as_reader().read_to_string(&mut body) {
            Ok(_) => dispatch(service, &method, &url, &body),
            Err(err) => ApiResponse::message(400, format!("unreadable request body: {err}")),
        };

        log::info!("{} {url} -> {}", method.as_str(), response.status);
        if let Err(err) = request.respond(to_http_response(&response)) {
            log::error!("failed to send response for {} {url}: {err}", method.as_str());
        }
    }
    Ok(())
}

fn to_http_response(api: &ApiResponse) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut response =
        Response::from_data(api.body.to_string().into_bytes()).with_status_code(api.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response.add_header(header);
    }
    response
}

// === Route handlers ===

fn list_headers(service: &SyncService) -> ServiceResult<ApiResponse> {
    let headers = service.headers()?;
    Ok(ApiResponse::ok(json!({ "headers": headers })))
}

fn list_refined(service: &SyncService) -> ServiceResult<ApiResponse> {
    let lists = service.refined_lists()?;
    Ok(ApiResponse::ok(json!({ "files": lists })))
}

fn list_records(service: &SyncService) -> ServiceResult<ApiResponse> {
    let (fields, rows) = service.records()?;
    Ok(ApiResponse::ok(rows_to_json(&fields, &rows)))
}

fn search(service: &SyncService, query: &str) -> ServiceResult<ApiResponse> {
    let value = query_param(query, "value")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::bad_request("value parameter is required"))?;
    let field = query_param(query, "field");
    let (fields, rows) = service.search(field.as_deref(), &value)?;
    Ok(ApiResponse::ok(rows_to_json(&fields, &rows)))
}

fn insert(service: &SyncService, body: &str) -> ServiceResult<ApiResponse> {
    let object = parse_object(body)?;
    let message = service.insert(&Record::from_json_object(&object))?;
    Ok(ApiResponse::message(200, message))
}

fn update(service: &SyncService, id: &str, body: &str) -> ServiceResult<ApiResponse> {
    let object = parse_object(body)?;
    let message = service.update(id, &Record::from_json_object(&object))?;
    Ok(ApiResponse::message(200, message))
}

fn resync(service: &SyncService) -> ServiceResult<ApiResponse> {
    let message = service.resync()?;
    Ok(ApiResponse::message(200, message))
}

fn add_suggestion(service: &SyncService, field: &str, body: &str) -> ServiceResult<ApiResponse> {
    let object = parse_object(body)?;
    let value = object
        .get("value")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| ServiceError::bad_request("expected a JSON object with a \"value\" string"))?;
    let message = service.add_suggestion(field, value)?;
    Ok(ApiResponse::message(200, message))
}

fn read_locks(service: &SyncService) -> ServiceResult<ApiResponse> {
    let locks = service.locks()?;
    Ok(ApiResponse::ok(json!(locks)))
}

fn write_locks(service: &SyncService, body: &str) -> ServiceResult<ApiResponse> {
    let object = parse_object(body)?;
    let mut updates = BTreeMap::new();
    for (field, value) in &object {
        let locked = value.as_bool().ok_or_else(|| {
            ServiceError::bad_request(format!("lock state for \"{field}\" must be a boolean"))
        })?;
        updates.insert(field.clone(), locked);
    }
    let message = service.set_locks(&updates)?;
    Ok(ApiResponse::message(200, message))
}

// === Helpers ===

fn route_exists(segments: &[&str]) -> bool {
    matches!(
        segments,
        ["headers"] | ["refined"] | ["records"] | ["search"] | ["locks"] | ["records", _] | ["refined", _]
    )
}

fn rows_to_json(fields: &[String], rows: &[Record]) -> JsonValue {
    let schema = Schema::from_fields(fields.iter().cloned());
    JsonValue::Array(
        rows.iter()
            .map(|row| JsonValue::Object(row.to_json_object(&schema)))
            .collect(),
    )
}

fn parse_object(body: &str) -> Result<serde_json::Map<String, JsonValue>, ServiceError> {
    if body.trim().is_empty() {
        return Err(ServiceError::bad_request("request body is empty"));
    }
    let value: JsonValue = serde_json::from_str(body)
        .map_err(|err| ServiceError::bad_request(format!("invalid JSON body: {err}")))?;
    match value {
        JsonValue::Object(map) => Ok(map),
        _ => Err(ServiceError::bad_request("expected a JSON object")),
    }
}

/// First value of a query parameter, form-decoded.
fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if decode_component(key, true) == name {
            Some(decode_component(value, true))
        } else {
            None
        }
    })
}

/// Percent-decode a URL component. In query strings `+` also decodes to a
/// space.
fn decode_component(input: &str, plus_as_space: bool) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hi = (bytes[i + 1] as char).to_digit(16);
                let lo = (bytes[i + 2] as char).to_digit(16);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi * 16 + lo) as u8);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
