use torah_tracker_core::{
    default_document, export_document, LabelConventions, LoadOrigin, MemoryGateway,
    SqliteGateway, TrackerService,
};

fn memory_service() -> TrackerService<MemoryGateway> {
    TrackerService::open(MemoryGateway::new(), LabelConventions::builtin())
}

#[test]
fn home_screen_lists_categories_with_progress() {
    let mut service = memory_service();
    service.mark_all("gemara", "berakhot").unwrap();

    let home = service.home();
    assert_eq!(home.categories.len(), 1);
    let gemara = &home.categories[0];
    assert_eq!(gemara.id, "gemara");
    assert_eq!(gemara.color, "#A66E31");
    assert_eq!(gemara.progress.completed, 64);
    assert_eq!(gemara.ratio, format!("64/{}", gemara.progress.total));
    assert_eq!(home.overall, gemara.progress);
}

#[test]
fn track_screen_renders_labels_and_caption() {
    let mut service = memory_service();
    service.toggle_unit("gemara", "sukkah", 14).unwrap();

    let screen = service.track_screen("gemara", "sukkah").unwrap();
    assert_eq!(screen.units.len(), 56);
    assert_eq!(screen.units[0].label, "דף א");
    assert_eq!(screen.units[14].label, "דף טו");
    assert!(screen.units[14].completed);
    assert_eq!(screen.caption, "הושלמו 1 מתוך 56");
    assert_eq!(screen.percent, 1);
    assert_eq!(screen.color, "#A66E31");

    assert!(service.track_screen("gemara", "missing").is_none());
    assert!(service.category_screen("missing").is_none());
}

#[test]
fn category_screen_lists_track_cards_in_order() {
    let service = memory_service();
    let screen = service.category_screen("gemara").unwrap();

    assert_eq!(screen.tracks.len(), 39);
    assert_eq!(screen.tracks[0].id, "berakhot");
    assert_eq!(screen.tracks[0].ratio, "0/64");
    assert_eq!(screen.category.percent, 0);
}

#[test]
fn manage_screen_shows_title_and_unit_count() {
    let mut service = memory_service();
    let category_id = service.add_category("Tanakh", "#224488").unwrap().value;
    service.add_track(&category_id, "Bereshit", 50).unwrap();

    let managed = service.manage_screen();
    let tanakh = managed
        .iter()
        .find(|category| category.id == category_id)
        .unwrap();
    assert_eq!(tanakh.tracks[0].caption, "Bereshit (50)");
    assert_eq!(service.unit_label(&category_id, 0), "פרק 1");
}

#[test]
fn sqlite_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracker.sqlite3");

    {
        let mut service =
            TrackerService::open(SqliteGateway::open(&path).unwrap(), LabelConventions::builtin());
        assert_eq!(service.store().origin(), &LoadOrigin::SeededEmpty);
        service.toggle_unit("gemara", "yoma", 3).unwrap();
        let category_id = service.add_category("Mishnah", "").unwrap().value;
        service.add_track(&category_id, "Avot", 6).unwrap();
    }

    let service =
        TrackerService::open(SqliteGateway::open(&path).unwrap(), LabelConventions::builtin());
    assert_eq!(
        service.store().origin(),
        &LoadOrigin::Restored { repaired_tracks: 0 }
    );
    assert!(service.store().track("gemara", "yoma").unwrap().completed[3]);
    assert!(service
        .store()
        .categories()
        .iter()
        .any(|category| category.name == "Mishnah"));
}

#[test]
fn export_then_import_restores_state() {
    let mut service = memory_service();
    service.mark_all("gemara", "megillah").unwrap();
    let exported = service.export_json().unwrap();

    service.clear_all("gemara", "megillah").unwrap();
    let summary = service.import_json(&exported).unwrap().value;

    assert_eq!(summary.tracks, 39);
    assert_eq!(summary.repaired_tracks, 0);
    let track = service.store().track("gemara", "megillah").unwrap();
    assert!(track.completed.iter().all(|flag| *flag));
}

#[test]
fn exported_default_dataset_carries_completion_arrays() {
    let exported = export_document(&default_document()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();
    let first = &value["categories"][0]["tracks"][0];

    assert_eq!(first["id"], "berakhot");
    assert_eq!(first["units"], 64);
    assert_eq!(first["completed"].as_array().unwrap().len(), 64);
}
