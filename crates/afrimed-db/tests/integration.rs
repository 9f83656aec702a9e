use afrimed_db::{create_pool, run_migrations, DbRuntimeSettings};

#[test]
fn db_initialization_works() {
    let pool = create_pool(":memory:", DbRuntimeSettings::default()).expect("failed to create pool");
    let conn = pool.get().expect("failed to get connection");
    let applied = run_migrations(&conn).expect("failed to run migrations");
    assert_eq!(applied, 1);

    // Exactly the migration tracking table and the users table.
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
        .expect("failed to prepare table list query");
    let tables: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .expect("failed to execute table list query")
        .map(|r| r.expect("failed to read table name"))
        .collect();

    assert_eq!(tables, vec!["_afrimed_migrations".to_string(), "users".to_string()]);
}

#[test]
fn file_backed_db_persists_across_pools() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join("afrimed.db");
    let db_path = db_path.to_str().expect("path should be utf-8");

    {
        let pool = create_pool(db_path, DbRuntimeSettings::default()).expect("failed to create pool");
        let conn = pool.get().expect("failed to get connection");
        run_migrations(&conn).expect("failed to run migrations");
        conn.execute(
            "INSERT INTO users (name, email) VALUES ('A B', 'a@x.com')",
            [],
        )
        .expect("insert should succeed");
    }

    let pool = create_pool(db_path, DbRuntimeSettings::default()).expect("failed to reopen pool");
    let conn = pool.get().expect("failed to get connection");
    let applied = run_migrations(&conn).expect("failed to re-run migrations");
    assert_eq!(applied, 0, "migrations already applied on disk");

    let name: String = conn
        .query_row("SELECT name FROM users WHERE email = 'a@x.com'", [], |row| {
            row.get(0)
        })
        .expect("row should survive pool recreation");
    assert_eq!(name, "A B");
}
