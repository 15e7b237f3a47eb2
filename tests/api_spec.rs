use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use umlkit::api::{create_router, AppState};
use umlkit_core::db::Database;
use umlkit_core::models::SavedModel;
use umlkit_core::Snapshot;

fn setup() -> TestServer {
    setup_with_db().0
}

/// The returned handle shares the server's connection.
fn setup_with_db() -> (TestServer, Database) {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router(AppState::new(db.clone(), 64));
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, db)
}

/// Parses fine but cannot replay: the relationship names a missing class.
fn dangling_snapshot() -> Value {
    json!({
        "classes": [ { "name": "A", "fields": [], "methods": [] } ],
        "relationships": [
            { "source": "A", "destination": "Ghost", "type": "composition" }
        ]
    })
}

async fn add_class(server: &TestServer, name: &str) {
    server
        .post("/api/v1/classes")
        .json(&json!({ "name": name }))
        .await
        .assert_status(StatusCode::CREATED);
}

mod classes {
    use super::*;

    #[tokio::test]
    async fn add_returns_the_refreshed_snapshot() {
        let server = setup();

        let response = server
            .post("/api/v1/classes")
            .json(&json!({ "name": "Dog" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let snapshot: Snapshot = response.json();
        assert_eq!(snapshot.classes[0].name, "Dog");
    }

    #[tokio::test]
    async fn duplicate_add_is_a_conflict() {
        let server = setup();
        add_class(&server, "Dog").await;

        let response = server
            .post("/api/v1/classes")
            .json(&json!({ "name": "Dog" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert!(response.text().contains("already exists"));
    }

    #[tokio::test]
    async fn rename_onto_existing_class_is_rejected() {
        let server = setup();
        add_class(&server, "X").await;
        add_class(&server, "Y").await;

        server
            .put("/api/v1/classes/Y")
            .json(&json!({ "name": "X" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let names: Vec<String> = server.get("/api/v1/classes").await.json();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[tokio::test]
    async fn lists_sorted_on_request() {
        let server = setup();
        add_class(&server, "Zebra").await;
        add_class(&server, "Ant").await;

        let names: Vec<String> = server.get("/api/v1/classes?sorted=true").await.json();
        assert_eq!(names, vec!["Ant", "Zebra"]);
    }

    #[tokio::test]
    async fn get_missing_class_is_not_found() {
        let server = setup();
        server
            .get("/api/v1/classes/Ghost")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_cascades_to_relationships() {
        let server = setup();
        add_class(&server, "Animal").await;
        add_class(&server, "Dog").await;
        server
            .post("/api/v1/relationships")
            .json(&json!({ "source": "Dog", "destination": "Animal", "type": "inheritance" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.delete("/api/v1/classes/Animal").await;

        response.assert_status_ok();
        let snapshot: Snapshot = response.json();
        assert!(snapshot.relationships.is_empty());
    }
}

mod members {
    use super::*;

    #[tokio::test]
    async fn builds_fields_methods_and_parameters() {
        let server = setup();
        add_class(&server, "C").await;

        server
            .post("/api/v1/classes/C/fields")
            .json(&json!({ "name": "speed" }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/classes/C/methods")
            .json(&json!({ "name": "run" }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/v1/classes/C/methods/run/params")
            .json(&json!({ "name": "pace" }))
            .await
            .assert_status(StatusCode::CREATED);

        let class: Value = server.get("/api/v1/classes/C").await.json();
        assert_eq!(class["fields"][0]["name"], "speed");
        assert_eq!(class["methods"][0]["params"][0]["name"], "pace");
    }

    #[tokio::test]
    async fn duplicate_parameter_list_is_rejected() {
        let server = setup();
        add_class(&server, "C").await;
        server
            .post("/api/v1/classes/C/methods")
            .json(&json!({ "name": "run" }))
            .await;
        server
            .post("/api/v1/classes/C/methods/run/params")
            .json(&json!({ "name": "speed" }))
            .await;

        let response = server
            .put("/api/v1/classes/C/methods/run/params")
            .json(&json!({ "names": ["speed", "speed"] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("duplicate"));
        let snapshot: Snapshot = server.get("/api/v1/model").await.json();
        assert_eq!(snapshot.classes[0].methods[0].params.len(), 1);
    }

    #[tokio::test]
    async fn renames_and_deletes_members() {
        let server = setup();
        add_class(&server, "C").await;
        server
            .post("/api/v1/classes/C/methods")
            .json(&json!({ "name": "run" }))
            .await;
        server
            .post("/api/v1/classes/C/methods/run/params")
            .json(&json!({ "name": "speed" }))
            .await;

        server
            .put("/api/v1/classes/C/methods/run")
            .json(&json!({ "name": "sprint" }))
            .await
            .assert_status_ok();
        server
            .put("/api/v1/classes/C/methods/sprint/params/speed")
            .json(&json!({ "name": "pace" }))
            .await
            .assert_status_ok();

        let snapshot: Snapshot = server.get("/api/v1/model").await.json();
        assert_eq!(snapshot.classes[0].methods[0].name, "sprint");
        assert_eq!(snapshot.classes[0].methods[0].params[0].name, "pace");

        server
            .delete("/api/v1/classes/C/methods/sprint/params/pace")
            .await
            .assert_status_ok();
        server
            .delete("/api/v1/classes/C/methods/sprint")
            .await
            .assert_status_ok();
        server
            .delete("/api/v1/classes/C/fields/missing")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod relationships {
    use super::*;

    async fn setup_pair() -> TestServer {
        let server = setup();
        add_class(&server, "A").await;
        add_class(&server, "B").await;
        server
            .post("/api/v1/relationships")
            .json(&json!({ "source": "A", "destination": "B", "type": "aggregation" }))
            .await
            .assert_status(StatusCode::CREATED);
        server
    }

    #[tokio::test]
    async fn second_relationship_for_pair_is_a_conflict() {
        let server = setup_pair().await;

        server
            .post("/api/v1/relationships")
            .json(&json!({ "source": "A", "destination": "B", "type": "composition" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_type_is_a_bad_request() {
        let server = setup();
        add_class(&server, "A").await;
        add_class(&server, "B").await;

        let response = server
            .post("/api/v1/relationships")
            .json(&json!({ "source": "A", "destination": "B", "type": "friendship" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("friendship"));
    }

    #[tokio::test]
    async fn changes_type() {
        let server = setup_pair().await;

        server
            .put("/api/v1/relationships/A/B")
            .json(&json!({ "type": "composition" }))
            .await
            .assert_status_ok();
        let response = server
            .put("/api/v1/relationships/A/B")
            .json(&json!({ "type": "composition" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let relationships: Value = server.get("/api/v1/relationships").await.json();
        assert_eq!(relationships[0]["type"], "composition");
    }

    #[tokio::test]
    async fn deletes_relationship() {
        let server = setup_pair().await;

        server.delete("/api/v1/relationships/A/B").await.assert_status_ok();
        server
            .delete("/api/v1/relationships/A/B")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod model {
    use super::*;

    #[tokio::test]
    async fn imports_and_exports_the_snapshot() {
        let server = setup();
        let body = json!({
            "classes": [
                { "name": "Dog", "fields": [ { "name": "age" } ],
                  "methods": [ { "name": "bark", "params": [ { "name": "volume" } ] } ] },
                { "name": "Animal", "fields": [], "methods": [] }
            ],
            "relationships": [
                { "source": "Dog", "destination": "Animal", "type": "inheritance" }
            ]
        });

        server.put("/api/v1/model").json(&body).await.assert_status_ok();

        let exported: Value = server.get("/api/v1/model").await.json();
        assert_eq!(exported, body);
    }

    #[tokio::test]
    async fn malformed_snapshot_is_a_bad_request() {
        let server = setup();

        let response = server
            .put("/api/v1/model")
            .json(&json!({ "classes": [ { "name": "Dog" } ] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("malformed snapshot"));
    }

    #[tokio::test]
    async fn failed_import_keeps_the_working_model() {
        let server = setup();
        add_class(&server, "Keep1").await;
        add_class(&server, "Keep2").await;
        let before: Value = server.get("/api/v1/model").await.json();

        let response = server.put("/api/v1/model").json(&dangling_snapshot()).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("class 'Ghost' does not exist"));
        let after: Value = server.get("/api/v1/model").await.json();
        assert_eq!(after, before);

        let events: Vec<Value> = server.get("/api/v1/events").await.json();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn renders_text() {
        let server = setup();
        add_class(&server, "Dog").await;

        let text = server.get("/api/v1/model/render").await.text();
        assert_eq!(text, "Dog\n");
    }

    #[tokio::test]
    async fn clear_empties_the_model() {
        let server = setup();
        add_class(&server, "Dog").await;

        server
            .delete("/api/v1/model")
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let snapshot: Snapshot = server.get("/api/v1/model").await.json();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn records_events() {
        let server = setup();
        add_class(&server, "Dog").await;
        server
            .post("/api/v1/classes")
            .json(&json!({ "name": "Dog" }))
            .await;
        server
            .put("/api/v1/classes/Dog")
            .json(&json!({ "name": "Hound" }))
            .await;

        let events: Vec<Value> = server.get("/api/v1/events").await.json();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "add-class");
        assert_eq!(events[1]["event"], "rename-class");
        assert_eq!(events[1]["to"], "Hound");
        assert_eq!(events[1]["replay"], false);
    }
}

mod saves {
    use super::*;

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let server = setup();
        add_class(&server, "Dog").await;

        let response = server
            .post("/api/v1/saves")
            .json(&json!({ "name": "pets" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let saved: SavedModel = response.json();
        assert!(saved.active);

        server.delete("/api/v1/model").await;
        let snapshot: Snapshot = server.post("/api/v1/saves/pets/load").await.json();
        assert_eq!(snapshot.classes[0].name, "Dog");

        let saves: Vec<SavedModel> = server.get("/api/v1/saves").await.json();
        assert_eq!(saves.len(), 1);
        assert!(saves[0].active);
    }

    #[tokio::test]
    async fn reserved_name_is_rejected() {
        let server = setup();

        let response = server
            .post("/api/v1/saves")
            .json(&json!({ "name": "NAME_LIST" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("reserved"));
    }

    #[tokio::test]
    async fn failed_load_keeps_model_and_active_save() {
        let (server, db) = setup_with_db();
        let broken = Snapshot::from_value(dangling_snapshot()).expect("snapshot parses");
        db.save_snapshot("broken", &broken).expect("Failed to save");
        add_class(&server, "Keep").await;
        server
            .post("/api/v1/saves")
            .json(&json!({ "name": "good" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post("/api/v1/saves/broken/load").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let snapshot: Snapshot = server.get("/api/v1/model").await.json();
        assert_eq!(snapshot.classes.len(), 1);
        assert_eq!(snapshot.classes[0].name, "Keep");
        let active = db.active_save().expect("Failed to query").expect("one active save");
        assert_eq!(active.name, "good");
    }

    #[tokio::test]
    async fn loading_unknown_save_is_not_found() {
        let server = setup();
        server
            .post("/api/v1/saves/nothing/load")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deletes_a_save() {
        let server = setup();
        server
            .post("/api/v1/saves")
            .json(&json!({ "name": "empty" }))
            .await;

        server
            .delete("/api/v1/saves/empty")
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete("/api/v1/saves/empty")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let server = setup();
    let body: Value = server.get("/api/v1/health").await.json();
    assert_eq!(body["status"], "ok");
}
