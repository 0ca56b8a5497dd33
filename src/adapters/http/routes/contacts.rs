use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    adapters::http::{app_state::AppState, extract::AppJson, middleware::CurrentUser},
    app_error::{AppError, AppResult},
    domain::entities::{contact::Contact, record_fields::RecordFields},
};

#[derive(Serialize)]
struct ContactsResponse {
    contacts: Vec<Contact>,
    total: usize,
}

/// Expects `require_auth` to be layered on by the parent router.
pub fn router() -> Router<AppState> {
    Router::new().route("/contacts", get(list_contacts).post(create_contact))
}

async fn list_contacts(
    State(app_state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    let contacts = app_state.contact_use_cases.list(user.id).await?;
    Ok(Json(ContactsResponse {
        total: contacts.len(),
        contacts,
    }))
}

async fn create_contact(
    State(app_state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    AppJson(body): AppJson<Value>,
) -> AppResult<impl IntoResponse> {
    let contact = app_state
        .contact_use_cases
        .create(user.id, object_body(body)?)
        .await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// Create bodies are free-form but must be JSON objects.
pub(crate) fn object_body(body: Value) -> AppResult<RecordFields> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(AppError::InvalidInput(
            "Request body must be a JSON object".into(),
        )),
    }
}
