use rusqlite::Connection;
use torah_tracker_core::gateway::sqlite::KV_STORE_VERSION;
use torah_tracker_core::{GatewayError, PersistenceGateway, SqliteGateway, DOCUMENT_KEY};

#[test]
fn reopening_a_file_keeps_stored_blob() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("torah_tracker.sqlite3");

    let mut first = SqliteGateway::open(&path).unwrap();
    first.set(DOCUMENT_KEY, r#"{"categories":[]}"#).unwrap();
    drop(first);

    let second = SqliteGateway::open(&path).unwrap();
    assert_eq!(
        second.get(DOCUMENT_KEY).unwrap().as_deref(),
        Some(r#"{"categories":[]}"#)
    );
    assert_eq!(stamped_version(second.connection()), KV_STORE_VERSION);
}

#[test]
fn file_from_newer_build_is_refused_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteGateway::open(&path).err().unwrap() {
        GatewayError::UnsupportedSchemaVersion { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, KV_STORE_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(stamped_version(&conn), 999);
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}

#[test]
fn writes_stamp_updated_at() {
    let mut gateway = SqliteGateway::open_in_memory().unwrap();
    gateway.set("k", "v").unwrap();

    let updated_at: i64 = gateway
        .connection()
        .query_row("SELECT updated_at FROM kv_store WHERE key = 'k';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert!(updated_at > 0);
}

fn stamped_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
