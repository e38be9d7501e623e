use sqlx::SqlitePool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: SqlitePool) {
    hookhub_db::health_check(&pool).await.unwrap();

    for table in ["events", "clients", "consumptions"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Every migration applies inside a transaction on a fresh database; the
/// journal mode is set by `create_pool`, not by a migration.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_migrations_apply_without_wal(pool: SqlitePool) {
    let versions: Vec<i64> = sqlx::query_scalar(
        "SELECT version FROM _sqlx_migrations WHERE success = 1 ORDER BY version",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(versions, vec![20260101000001, 20260101000002, 20260101000003]);
}

/// The immutability triggers are installed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_immutability_triggers_exist(pool: SqlitePool) {
    let triggers: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'trigger' ORDER BY name")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(
        triggers,
        vec![
            "trg_consumptions_no_delete",
            "trg_consumptions_no_update",
            "trg_events_no_delete",
            "trg_events_no_update",
        ]
    );
}

/// Pools created by `create_pool` create the database directory and run in
/// WAL mode with foreign keys on.
#[tokio::test]
async fn test_create_pool_settings() {
    let dir = std::env::temp_dir().join(format!("hookhub-db-test-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let url = format!("sqlite://{}", dir.join("nested").join("bootstrap.db").display());

    let pool = hookhub_db::create_pool(&url).await.unwrap();
    hookhub_db::run_migrations(&pool).await.unwrap();

    let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");

    let foreign_keys: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(foreign_keys, 1);

    // Migrations are idempotent.
    hookhub_db::run_migrations(&pool).await.unwrap();

    pool.close().await;
    let _ = std::fs::remove_dir_all(&dir);
}
