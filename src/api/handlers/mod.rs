use std::sync::MutexGuard;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use umlkit_core::models::{ClassEntity, RelationshipEntity, RelationshipType, SavedModel};
use umlkit_core::observer::ModelEvent;
use umlkit_core::{ErrorKind, ModelError, Snapshot, Store};

use super::AppState;
use crate::render;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Rejected model operations are reported to the client as-is.
fn model_error(e: ModelError) -> (StatusCode, String) {
    let status = match e.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    tracing::warn!("Rejected: {}", e);
    (status, e.to_string())
}

/// Log an internal error and return a sanitized response to the client.
/// Model errors carried through the persistence layer keep their message.
fn internal_error(e: anyhow::Error) -> (StatusCode, String) {
    if let Some(model) = e.downcast_ref::<ModelError>() {
        return model_error(model.clone());
    }

    tracing::error!("Internal error: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn lock(state: &AppState) -> MutexGuard<'_, Store> {
    state.store.lock().expect("model lock poisoned")
}

/// Apply one store operation and answer with the refreshed snapshot.
fn mutate(
    state: &AppState,
    op: impl FnOnce(&mut Store) -> umlkit_core::Result<()>,
) -> ApiResult<Json<Snapshot>> {
    let mut store = lock(state);
    op(&mut store).map_err(model_error)?;
    Ok(Json(store.export_snapshot()))
}

/// Replay a snapshot into a scratch store so a bad one never touches the working model.
fn check_snapshot(snapshot: &Snapshot) -> ApiResult<()> {
    Store::from_snapshot(snapshot).map(drop).map_err(model_error)
}

fn created(result: ApiResult<Json<Snapshot>>) -> ApiResult<(StatusCode, Json<Snapshot>)> {
    result.map(|snapshot| (StatusCode::CREATED, snapshot))
}

// ============================================================
// Request bodies
// ============================================================

#[derive(Debug, Deserialize)]
pub struct NameInput {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListClassesQuery {
    pub sorted: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ParameterListInput {
    pub names: Vec<String>,
}

/// Relationship types arrive as text so unknown ones get a model error.
#[derive(Debug, Deserialize)]
pub struct RelationshipInput {
    pub source: String,
    pub destination: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct RelationshipTypeInput {
    #[serde(rename = "type")]
    pub kind: String,
}

fn parse_kind(kind: &str) -> ApiResult<RelationshipType> {
    kind.parse().map_err(model_error)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Whole model
// ============================================================

pub async fn export_model(State(state): State<AppState>) -> Json<Snapshot> {
    let snapshot = lock(&state).export_snapshot();
    Json(snapshot)
}

/// Replace the model with the posted snapshot.
pub async fn import_model(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<Snapshot>> {
    let snapshot = Snapshot::from_value(body).map_err(model_error)?;
    check_snapshot(&snapshot)?;
    mutate(&state, |store| store.import_snapshot(&snapshot))
}

/// Discard the working model. No saved model stays active.
pub async fn clear_model(State(state): State<AppState>) -> ApiResult<StatusCode> {
    lock(&state).clear();
    state.db.deactivate_all().map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn render_model(State(state): State<AppState>) -> String {
    let snapshot = lock(&state).export_snapshot();
    render::render_model(&snapshot)
}

// ============================================================
// Classes
// ============================================================

pub async fn list_classes(
    State(state): State<AppState>,
    Query(query): Query<ListClassesQuery>,
) -> Json<Vec<String>> {
    let store = lock(&state);
    let names: Vec<String> = if query.sorted.unwrap_or(false) {
        store
            .class_names_sorted()
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        store.class_names().map(String::from).collect()
    };
    Json(names)
}

pub async fn get_class(
    State(state): State<AppState>,
    Path(class): Path<String>,
) -> ApiResult<Json<ClassEntity>> {
    let found = lock(&state).class(&class).cloned();
    found
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("class '{}' does not exist", class)))
}

pub async fn add_class(
    State(state): State<AppState>,
    Json(input): Json<NameInput>,
) -> ApiResult<(StatusCode, Json<Snapshot>)> {
    created(mutate(&state, |store| store.add_class(&input.name)))
}

pub async fn rename_class(
    State(state): State<AppState>,
    Path(class): Path<String>,
    Json(input): Json<NameInput>,
) -> ApiResult<Json<Snapshot>> {
    mutate(&state, |store| store.rename_class(&class, &input.name))
}

pub async fn delete_class(
    State(state): State<AppState>,
    Path(class): Path<String>,
) -> ApiResult<Json<Snapshot>> {
    mutate(&state, |store| store.delete_class(&class))
}

// ============================================================
// Fields
// ============================================================

pub async fn add_field(
    State(state): State<AppState>,
    Path(class): Path<String>,
    Json(input): Json<NameInput>,
) -> ApiResult<(StatusCode, Json<Snapshot>)> {
    created(mutate(&state, |store| store.add_field(&class, &input.name)))
}

pub async fn rename_field(
    State(state): State<AppState>,
    Path((class, field)): Path<(String, String)>,
    Json(input): Json<NameInput>,
) -> ApiResult<Json<Snapshot>> {
    mutate(&state, |store| store.rename_field(&class, &field, &input.name))
}

pub async fn delete_field(
    State(state): State<AppState>,
    Path((class, field)): Path<(String, String)>,
) -> ApiResult<Json<Snapshot>> {
    mutate(&state, |store| store.delete_field(&class, &field))
}

// ============================================================
// Methods
// ============================================================

pub async fn add_method(
    State(state): State<AppState>,
    Path(class): Path<String>,
    Json(input): Json<NameInput>,
) -> ApiResult<(StatusCode, Json<Snapshot>)> {
    created(mutate(&state, |store| store.add_method(&class, &input.name)))
}

pub async fn rename_method(
    State(state): State<AppState>,
    Path((class, method)): Path<(String, String)>,
    Json(input): Json<NameInput>,
) -> ApiResult<Json<Snapshot>> {
    mutate(&state, |store| store.rename_method(&class, &method, &input.name))
}

pub async fn delete_method(
    State(state): State<AppState>,
    Path((class, method)): Path<(String, String)>,
) -> ApiResult<Json<Snapshot>> {
    mutate(&state, |store| store.delete_method(&class, &method))
}

// ============================================================
// Parameters
// ============================================================

pub async fn add_parameter(
    State(state): State<AppState>,
    Path((class, method)): Path<(String, String)>,
    Json(input): Json<NameInput>,
) -> ApiResult<(StatusCode, Json<Snapshot>)> {
    created(mutate(&state, |store| {
        store.add_parameter(&class, &method, &input.name)
    }))
}

pub async fn replace_parameters(
    State(state): State<AppState>,
    Path((class, method)): Path<(String, String)>,
    Json(input): Json<ParameterListInput>,
) -> ApiResult<Json<Snapshot>> {
    mutate(&state, |store| {
        store.replace_parameter_list(&class, &method, input.names.as_slice())
    })
}

pub async fn rename_parameter(
    State(state): State<AppState>,
    Path((class, method, param)): Path<(String, String, String)>,
    Json(input): Json<NameInput>,
) -> ApiResult<Json<Snapshot>> {
    mutate(&state, |store| {
        store.rename_parameter(&class, &method, &param, &input.name)
    })
}

pub async fn delete_parameter(
    State(state): State<AppState>,
    Path((class, method, param)): Path<(String, String, String)>,
) -> ApiResult<Json<Snapshot>> {
    mutate(&state, |store| store.delete_parameter(&class, &method, &param))
}

// ============================================================
// Relationships
// ============================================================

pub async fn list_relationships(State(state): State<AppState>) -> Json<Vec<RelationshipEntity>> {
    let relationships = lock(&state).relationships().to_vec();
    Json(relationships)
}

pub async fn add_relationship(
    State(state): State<AppState>,
    Json(input): Json<RelationshipInput>,
) -> ApiResult<(StatusCode, Json<Snapshot>)> {
    let kind = parse_kind(&input.kind)?;
    created(mutate(&state, |store| {
        store.add_relationship(&input.source, &input.destination, kind)
    }))
}

pub async fn change_relationship_type(
    State(state): State<AppState>,
    Path((source, destination)): Path<(String, String)>,
    Json(input): Json<RelationshipTypeInput>,
) -> ApiResult<Json<Snapshot>> {
    let kind = parse_kind(&input.kind)?;
    mutate(&state, |store| {
        store.change_relationship_type(&source, &destination, kind)
    })
}

pub async fn delete_relationship(
    State(state): State<AppState>,
    Path((source, destination)): Path<(String, String)>,
) -> ApiResult<Json<Snapshot>> {
    mutate(&state, |store| store.delete_relationship(&source, &destination))
}

// ============================================================
// Events
// ============================================================

pub async fn list_events(State(state): State<AppState>) -> Json<Vec<ModelEvent>> {
    Json(state.events.recent())
}

// ============================================================
// Saved models
// ============================================================

pub async fn list_saves(State(state): State<AppState>) -> ApiResult<Json<Vec<SavedModel>>> {
    state.db.list_saves().map(Json).map_err(internal_error)
}

/// Save the working model under a name and make it the active save.
pub async fn save_model(
    State(state): State<AppState>,
    Json(input): Json<NameInput>,
) -> ApiResult<(StatusCode, Json<SavedModel>)> {
    let snapshot = lock(&state).export_snapshot();
    state
        .db
        .save_snapshot(&input.name, &snapshot)
        .map(|saved| (StatusCode::CREATED, Json(saved)))
        .map_err(internal_error)
}

/// Replace the working model with a saved one and make that save active.
/// A stored body that no longer replays leaves both the model and the
/// active flag untouched.
pub async fn load_model(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Snapshot>> {
    let snapshot = state
        .db
        .get_snapshot(&name)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, format!("no saved model named '{}'", name)))?;
    check_snapshot(&snapshot)?;

    let mut store = lock(&state);
    state.db.load_snapshot(&name).map_err(internal_error)?;
    store.import_snapshot(&snapshot).map_err(model_error)?;
    Ok(Json(store.export_snapshot()))
}

pub async fn delete_save(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    if state.db.delete_snapshot(&name).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, format!("no saved model named '{}'", name)))
    }
}
