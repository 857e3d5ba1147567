use torah_tracker_core::{
    export_document, Category, Document, GatewayError, GatewayResult, LoadOrigin, MemoryGateway, PersistStatus,
    PersistenceGateway, StoreError, TaxonomyStore, Track, DOCUMENT_KEY,
};

fn store_with(raw: &str) -> TaxonomyStore<MemoryGateway> {
    TaxonomyStore::open(MemoryGateway::with_entry(DOCUMENT_KEY, raw))
}

fn empty_store() -> TaxonomyStore<MemoryGateway> {
    store_with(r#"{"categories":[]}"#)
}

fn assert_consistent(document: &Document) {
    for category in &document.categories {
        for track in &category.tracks {
            assert_eq!(
                track.completed.len(),
                track.units as usize,
                "track {}/{} is inconsistent",
                category.id,
                track.id
            );
        }
    }
}

/// Gateway whose reads always fail, e.g. storage disabled by the host.
struct UnreadableGateway {
    writes: usize,
}

impl PersistenceGateway for UnreadableGateway {
    fn get(&self, _key: &str) -> GatewayResult<Option<String>> {
        Err(rusqlite::Error::InvalidQuery.into())
    }

    fn set(&mut self, _key: &str, _value: &str) -> GatewayResult<()> {
        self.writes += 1;
        Ok(())
    }
}

#[test]
fn first_open_seeds_and_persists_defaults() {
    let store = TaxonomyStore::open(MemoryGateway::new());

    assert_eq!(store.origin(), &LoadOrigin::SeededEmpty);
    assert_eq!(store.categories().len(), 1);
    assert_eq!(store.categories()[0].tracks.len(), 39);
    assert_eq!(store.gateway().write_count(), 1);
    assert!(store.gateway().value(DOCUMENT_KEY).is_some());
    assert_consistent(store.document());
}

#[test]
fn malformed_blob_falls_back_to_defaults() {
    let store = store_with("{not json");

    assert!(matches!(store.origin(), LoadOrigin::SeededAfterError(_)));
    assert!(store.category("gemara").is_some());
    assert_eq!(store.gateway().write_count(), 1);
}

#[test]
fn unreadable_gateway_seeds_without_writing() {
    let store = TaxonomyStore::open(UnreadableGateway { writes: 0 });

    assert!(store.origin().is_seeded());
    assert!(store.category("gemara").is_some());
    assert_eq!(store.gateway().writes, 0);
}

#[test]
fn stored_inconsistent_tracks_are_reset_on_load() {
    let store = store_with(
        r##"{"categories":[{"id":"c","name":"C","color":"#111111","tracks":[
            {"id":"short","title":"Short","units":3,"completed":[true]},
            {"id":"ok","title":"Ok","units":2,"completed":[true,false]},
            {"id":"missing","title":"Missing","units":2}
        ]}]}"##,
    );

    assert_eq!(
        store.origin(),
        &LoadOrigin::Restored { repaired_tracks: 2 }
    );
    assert_eq!(
        store.track("c", "short").unwrap().completed,
        vec![false, false, false]
    );
    assert_eq!(store.track("c", "ok").unwrap().completed, vec![true, false]);
    assert_consistent(store.document());
    // Restored documents are not rewritten until the first mutation.
    assert_eq!(store.gateway().write_count(), 0);
}

#[test]
fn resize_grows_with_incomplete_units_and_shrinks_from_tail() {
    let mut store = empty_store();
    let category_id = store.add_category("Mishnah", "#00AA00").unwrap().value;
    let track_id = store.add_track(&category_id, "Berakhot", 5).unwrap().value;
    store
        .set_unit_completion(&category_id, &track_id, 1, true)
        .unwrap();
    store
        .set_unit_completion(&category_id, &track_id, 4, true)
        .unwrap();

    store.resize_track(&category_id, &track_id, 8).unwrap();
    assert_eq!(
        store.track(&category_id, &track_id).unwrap().completed,
        vec![false, true, false, false, true, false, false, false]
    );

    store.resize_track(&category_id, &track_id, 3).unwrap();
    let track = store.track(&category_id, &track_id).unwrap();
    assert_eq!(track.units, 3);
    assert_eq!(track.completed, vec![false, true, false]);
    assert_consistent(store.document());

    assert!(matches!(
        store.resize_track(&category_id, &track_id, 0),
        Err(StoreError::InvalidUnits(0))
    ));
}

#[test]
fn edit_track_retitles_and_keeps_surviving_units() {
    let mut store = empty_store();
    let category_id = store.add_category("Nach", "").unwrap().value;
    let track_id = store.add_track(&category_id, "Yehoshua", 24).unwrap().value;
    store.mark_all(&category_id, &track_id).unwrap();

    store
        .edit_track(&category_id, &track_id, "  Shoftim ", 21)
        .unwrap();

    let track = store.track(&category_id, &track_id).unwrap();
    assert_eq!(track.title, "Shoftim");
    assert_eq!(track.completed, vec![true; 21]);
}

#[test]
fn removing_category_drops_its_tracks() {
    let mut store = empty_store();
    let keep = store.add_category("Keep", "").unwrap().value;
    let drop = store.add_category("Drop", "").unwrap().value;
    let track_id = store.add_track(&drop, "Gone", 10).unwrap().value;

    store.remove_category(&drop).unwrap();

    assert!(store.category(&drop).is_none());
    assert!(store.track(&drop, &track_id).is_none());
    assert!(store.category(&keep).is_some());
    assert!(matches!(
        store.remove_category(&drop),
        Err(StoreError::CategoryNotFound(_))
    ));
}

#[test]
fn remove_track_reports_unknown_ids() {
    let mut store = empty_store();
    let category_id = store.add_category("Tanakh", "").unwrap().value;

    let err = store.remove_track(&category_id, "nope").unwrap_err();
    assert!(matches!(err, StoreError::TrackNotFound { .. }));
    let err = store.remove_track("nope", "nope").unwrap_err();
    assert!(matches!(err, StoreError::CategoryNotFound(_)));
}

#[test]
fn toggle_unit_flips_and_reports_new_state() {
    let mut store = empty_store();
    let category_id = store.add_category("Tanakh", "").unwrap().value;
    let track_id = store.add_track(&category_id, "Rut", 4).unwrap().value;

    assert!(store.toggle_unit(&category_id, &track_id, 2).unwrap().value);
    assert!(!store.toggle_unit(&category_id, &track_id, 2).unwrap().value);
    assert!(matches!(
        store.toggle_unit(&category_id, &track_id, 9),
        Err(StoreError::UnitOutOfRange { index: 9, units: 4 })
    ));
}

#[test]
fn every_mutation_writes_through_gateway() {
    let mut store = empty_store();
    let start = store.gateway().write_count();

    let category_id = store.add_category("Halacha", "").unwrap().value;
    let track_id = store.add_track(&category_id, "Orach Chaim", 697).unwrap().value;
    store.toggle_unit(&category_id, &track_id, 0).unwrap();
    store.mark_all(&category_id, &track_id).unwrap();
    store.clear_all(&category_id, &track_id).unwrap();

    assert_eq!(store.gateway().write_count(), start + 5);
    let saved = store.gateway().value(DOCUMENT_KEY).unwrap();
    assert!(saved.contains("Orach Chaim"));
}

#[test]
fn failed_write_keeps_in_memory_mutation() {
    let mut store = empty_store();
    let category_id = store.add_category("Tanakh", "").unwrap().value;
    let track_id = store.add_track(&category_id, "Esther", 10).unwrap().value;
    let saved_before = store.gateway().value(DOCUMENT_KEY).unwrap().to_string();

    store.gateway_mut().set_reject_writes(true);
    let commit = store.toggle_unit(&category_id, &track_id, 0).unwrap();

    assert!(commit.value);
    assert!(matches!(commit.persist, PersistStatus::Failed(_)));
    assert!(commit.warning().is_some());
    assert!(store.track(&category_id, &track_id).unwrap().completed[0]);
    assert_eq!(store.gateway().value(DOCUMENT_KEY).unwrap(), saved_before);

    store.gateway_mut().set_reject_writes(false);
    assert!(store.persist().is_saved());
}

#[test]
fn import_replaces_document_and_repairs_tracks() {
    let mut store = TaxonomyStore::open(MemoryGateway::new());

    let commit = store
        .import_document(
            r#"{"categories":[{"id":"x","name":"X","tracks":[
                {"id":"a","title":"A","units":2,"completed":[true,true]},
                {"id":"b","title":"B","units":3,"completed":[true]}
            ]}]}"#,
        )
        .unwrap();

    assert_eq!(commit.value.categories, 1);
    assert_eq!(commit.value.tracks, 2);
    assert_eq!(commit.value.repaired_tracks, 1);
    assert!(store.category("gemara").is_none());
    assert_eq!(store.category("x").unwrap().color, "#888888");
    assert_eq!(store.track("x", "b").unwrap().completed, vec![false; 3]);
    assert_consistent(store.document());
}

#[test]
fn rejected_import_leaves_document_untouched() {
    let mut store = TaxonomyStore::open(MemoryGateway::new());
    store.mark_all("gemara", "yoma").unwrap();
    let before = store.document().clone();
    let writes = store.gateway().write_count();

    for payload in [
        "not json",
        r#"{"tracks":[]}"#,
        r#"{"categories":"nope"}"#,
        r#"{"categories":[{"id":"x","name":"X","tracks":[{"id":"t","title":"T","units":0}]}]}"#,
    ] {
        let err = store.import_document(payload).unwrap_err();
        assert!(matches!(err, StoreError::Import(_)), "{payload}");
    }

    assert_eq!(store.document(), &before);
    assert_eq!(store.gateway().write_count(), writes);
}

#[test]
fn generated_ids_are_unique_per_scope() {
    let mut store = empty_store();
    let first = store.add_category("Daf Yomi", "").unwrap().value;
    let second = store.add_category("Daf Yomi", "").unwrap().value;

    assert_ne!(first, second);
    assert!(first.starts_with("daf-yomi-"));
    assert!(!first.contains('~'));
}

#[test]
fn unknown_gateway_error_is_displayable() {
    let err: GatewayError = rusqlite::Error::InvalidQuery.into();
    assert!(!err.to_string().is_empty());
}

fn track(id: &str, title: &str, completed: Vec<bool>) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        units: completed.len() as u32,
        completed,
    }
}

#[test]
fn import_of_export_reproduces_document_exactly() {
    let mut later = Category::new("z~b", "תנ\"ך", "#224488");
    later.tracks = vec![
        track("yonah", "יונה", vec![true, false, true]),
        track("amos", "עמוס", vec![false; 9]),
        track("rut", "רות", vec![true, true, true, true]),
    ];
    let mut earlier = Category::new("a", "Mishnah", "#00AA00");
    earlier.tracks = vec![track("m-2", "Peah", vec![false, true])];
    let empty = Category::new("0-empty", "Empty", "#888888");
    let document = Document {
        categories: vec![later, earlier, empty],
    };

    let mut store = empty_store();
    let exported = export_document(&document).unwrap();
    let summary = store.import_document(&exported).unwrap().value;

    assert_eq!(summary.categories, 3);
    assert_eq!(summary.tracks, 4);
    assert_eq!(summary.repaired_tracks, 0);
    assert_eq!(store.document(), &document);
    assert_eq!(store.export_document().unwrap(), exported);
}
