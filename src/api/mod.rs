mod handlers;

use std::sync::{Arc, Mutex};

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use umlkit_core::db::Database;
use umlkit_core::observer::{EventLog, TracingObserver};
use umlkit_core::Store;

/// Shared state behind the HTTP API.
///
/// The store sits behind a single mutex so that each request's
/// validate → mutate → cascade → notify sequence runs as one unit.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
    db: Database,
    events: Arc<EventLog>,
}

impl AppState {
    pub fn new(db: Database, event_log_capacity: usize) -> Self {
        let events = Arc::new(EventLog::new(event_log_capacity));
        let mut store = Store::new();
        store.attach(events.clone());
        store.attach(Arc::new(TracingObserver));

        Self {
            store: Arc::new(Mutex::new(store)),
            db,
            events,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Whole model
        .route("/model", get(handlers::export_model))
        .route("/model", put(handlers::import_model))
        .route("/model", delete(handlers::clear_model))
        .route("/model/render", get(handlers::render_model))
        // Classes
        .route("/classes", get(handlers::list_classes))
        .route("/classes", post(handlers::add_class))
        .route("/classes/{class}", get(handlers::get_class))
        .route("/classes/{class}", put(handlers::rename_class))
        .route("/classes/{class}", delete(handlers::delete_class))
        // Fields
        .route("/classes/{class}/fields", post(handlers::add_field))
        .route("/classes/{class}/fields/{field}", put(handlers::rename_field))
        .route("/classes/{class}/fields/{field}", delete(handlers::delete_field))
        // Methods
        .route("/classes/{class}/methods", post(handlers::add_method))
        .route("/classes/{class}/methods/{method}", put(handlers::rename_method))
        .route("/classes/{class}/methods/{method}", delete(handlers::delete_method))
        // Parameters
        .route("/classes/{class}/methods/{method}/params", post(handlers::add_parameter))
        .route("/classes/{class}/methods/{method}/params", put(handlers::replace_parameters))
        .route("/classes/{class}/methods/{method}/params/{param}", put(handlers::rename_parameter))
        .route("/classes/{class}/methods/{method}/params/{param}", delete(handlers::delete_parameter))
        // Relationships
        .route("/relationships", get(handlers::list_relationships))
        .route("/relationships", post(handlers::add_relationship))
        .route("/relationships/{source}/{destination}", put(handlers::change_relationship_type))
        .route("/relationships/{source}/{destination}", delete(handlers::delete_relationship))
        // Events
        .route("/events", get(handlers::list_events))
        // Saved models
        .route("/saves", get(handlers::list_saves))
        .route("/saves", post(handlers::save_model))
        .route("/saves/{name}/load", post(handlers::load_model))
        .route("/saves/{name}", delete(handlers::delete_save))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
