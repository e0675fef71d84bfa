use visio_db::{
    create_pool, insert_status_check, list_status_checks, run_migrations, DbRuntimeSettings,
    StatusError, MAX_STATUS_CHECKS,
};

fn migrated_conn() -> r2d2::PooledConnection<r2d2_sqlite::SqliteConnectionManager> {
    let settings = DbRuntimeSettings {
        pool_max_size: 1,
        ..DbRuntimeSettings::default()
    };
    let pool = create_pool(":memory:", settings).expect("failed to create pool");
    let conn = pool.get().expect("failed to get connection");
    run_migrations(&conn).expect("failed to run migrations");
    conn
}

#[test]
fn status_checks_round_trip_in_insert_order() {
    let conn = migrated_conn();

    let first = insert_status_check(&conn, "ios-app").unwrap();
    let second = insert_status_check(&conn, "  web  ").unwrap();
    assert_eq!(second.client_name, "web");
    assert_ne!(first.id, second.id);
    assert!(uuid::Uuid::parse_str(&first.id).is_ok());

    let listed = list_status_checks(&conn, MAX_STATUS_CHECKS).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[0].client_name, "ios-app");
    assert_eq!(listed[0].timestamp.timestamp_micros(), first.timestamp.timestamp_micros());
    assert_eq!(listed[1].id, second.id);
}

#[test]
fn empty_client_name_rejected() {
    let conn = migrated_conn();
    assert!(matches!(
        insert_status_check(&conn, "   "),
        Err(StatusError::EmptyClientName)
    ));
    assert!(list_status_checks(&conn, 10).unwrap().is_empty());
}

#[test]
fn list_respects_limit() {
    let conn = migrated_conn();
    for i in 0..5 {
        insert_status_check(&conn, &format!("client-{i}")).unwrap();
    }

    let listed = list_status_checks(&conn, 3).unwrap();
    assert_eq!(
        listed.iter().map(|c| c.client_name.as_str()).collect::<Vec<_>>(),
        vec!["client-0", "client-1", "client-2"]
    );
}

#[test]
fn status_checks_persist_across_pools() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.db");
    let path = path.to_str().unwrap();

    {
        let pool = create_pool(path, DbRuntimeSettings::default()).unwrap();
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
        insert_status_check(&conn, "desktop").unwrap();
    }

    let pool = create_pool(path, DbRuntimeSettings::default()).unwrap();
    let conn = pool.get().unwrap();
    assert_eq!(run_migrations(&conn).unwrap(), 0);
    let listed = list_status_checks(&conn, MAX_STATUS_CHECKS).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].client_name, "desktop");
}
