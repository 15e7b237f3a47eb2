use speculate2::speculate;
use umlkit_core::db::Database;
use umlkit_core::models::{RelationshipType, RESERVED_SAVE_NAME};
use umlkit_core::{ModelError, Snapshot, Store};

fn sample_snapshot() -> Snapshot {
    let mut store = Store::new();
    store.add_class("Shape").unwrap();
    store.add_class("Circle").unwrap();
    store.add_field("Circle", "radius").unwrap();
    store.add_method("Circle", "scale").unwrap();
    store.add_parameter("Circle", "scale", "factor").unwrap();
    store.add_relationship("Circle", "Shape", RelationshipType::Realization).unwrap();
    store.export_snapshot()
}

fn reserved(err: anyhow::Error) -> bool {
    matches!(err.downcast_ref::<ModelError>(), Some(ModelError::ReservedName(_)))
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "save_snapshot" {
        it "stores a snapshot and marks it active" {
            let saved = db.save_snapshot("shapes", &sample_snapshot()).expect("Failed to save");

            assert_eq!(saved.name, "shapes");
            assert!(saved.active);
            assert_eq!(db.active_save().expect("Query failed").unwrap().name, "shapes");
        }

        it "keeps at most one active entry" {
            db.save_snapshot("first", &sample_snapshot()).expect("Failed to save");
            db.save_snapshot("second", &Snapshot::default()).expect("Failed to save");

            let saves = db.list_saves().expect("Query failed");
            assert_eq!(saves.len(), 2);
            assert_eq!(saves.iter().filter(|s| s.active).count(), 1);
            assert!(saves.iter().any(|s| s.name == "second" && s.active));
        }

        it "overwrites an existing save" {
            db.save_snapshot("shapes", &Snapshot::default()).expect("Failed to save");
            db.save_snapshot("shapes", &sample_snapshot()).expect("Failed to save");

            assert_eq!(db.list_saves().expect("Query failed").len(), 1);
            let loaded = db.get_snapshot("shapes").expect("Query failed").unwrap();
            assert_eq!(loaded, sample_snapshot());
        }

        it "rejects the reserved name" {
            let err = db.save_snapshot(RESERVED_SAVE_NAME, &sample_snapshot()).unwrap_err();
            assert!(reserved(err));
            assert!(db.list_saves().expect("Query failed").is_empty());
        }
    }

    describe "load_snapshot" {
        it "returns None for an unknown name" {
            assert!(db.load_snapshot("nothing").expect("Query failed").is_none());
        }

        it "returns the saved snapshot and makes it active" {
            db.save_snapshot("shapes", &sample_snapshot()).expect("Failed to save");
            db.save_snapshot("other", &Snapshot::default()).expect("Failed to save");

            let snapshot = db.load_snapshot("shapes").expect("Query failed").unwrap();

            assert_eq!(snapshot, sample_snapshot());
            assert_eq!(db.active_save().expect("Query failed").unwrap().name, "shapes");
        }

        it "restores an equal store" {
            db.save_snapshot("shapes", &sample_snapshot()).expect("Failed to save");
            let snapshot = db.load_snapshot("shapes").expect("Query failed").unwrap();

            let store = Store::from_snapshot(&snapshot).expect("Replay failed");
            assert_eq!(store.export_snapshot(), sample_snapshot());
        }

        it "rejects the reserved name" {
            assert!(reserved(db.load_snapshot(RESERVED_SAVE_NAME).unwrap_err()));
        }
    }

    describe "get_snapshot" {
        it "does not change the active entry" {
            db.save_snapshot("a", &Snapshot::default()).expect("Failed to save");
            db.save_snapshot("b", &Snapshot::default()).expect("Failed to save");

            db.get_snapshot("a").expect("Query failed");

            assert_eq!(db.active_save().expect("Query failed").unwrap().name, "b");
        }
    }

    describe "delete_snapshot" {
        it "removes the entry" {
            db.save_snapshot("shapes", &sample_snapshot()).expect("Failed to save");

            assert!(db.delete_snapshot("shapes").expect("Delete failed"));
            assert!(!db.delete_snapshot("shapes").expect("Delete failed"));
            assert!(db.active_save().expect("Query failed").is_none());
        }

        it "rejects the reserved name" {
            assert!(reserved(db.delete_snapshot(RESERVED_SAVE_NAME).unwrap_err()));
        }
    }

    describe "list_saves" {
        it "orders entries by name" {
            db.save_snapshot("zoo", &Snapshot::default()).expect("Failed to save");
            db.save_snapshot("art", &Snapshot::default()).expect("Failed to save");

            let names: Vec<String> = db
                .list_saves()
                .expect("Query failed")
                .into_iter()
                .map(|s| s.name)
                .collect();
            assert_eq!(names, vec!["art", "zoo"]);
        }
    }

    describe "deactivate_all" {
        it "leaves no active entry" {
            db.save_snapshot("shapes", &sample_snapshot()).expect("Failed to save");
            db.deactivate_all().expect("Update failed");
            assert!(db.active_save().expect("Query failed").is_none());
        }
    }
}

#[test]
fn persists_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("umlkit.db");

    {
        let db = Database::open(path.clone()).expect("Failed to open");
        db.migrate().expect("Failed to migrate");
        db.save_snapshot("shapes", &sample_snapshot()).expect("Failed to save");
    }

    let db = Database::open(path).expect("Failed to reopen");
    db.migrate().expect("Failed to migrate");
    let active = db.active_save().expect("Query failed").expect("active entry");
    assert_eq!(active.name, "shapes");
    assert_eq!(
        db.get_snapshot("shapes").expect("Query failed"),
        Some(sample_snapshot())
    );
}
