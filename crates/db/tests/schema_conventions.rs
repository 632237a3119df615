//! The provisioned schema is consumed by the web application; these tests
//! pin the parts of it that application depends on.

use gsp_db::schema::{self, TABLES};
use sqlx::PgPool;

/// Every table is keyed by a generated UUID.
#[sqlx::test(migrations = false)]
async fn test_all_pks_are_generated_uuids(pool: PgPool) {
    schema::ensure_schema(&pool).await.unwrap();

    for def in TABLES {
        let (data_type, default): (String, Option<String>) = sqlx::query_as(
            "SELECT data_type::TEXT, column_default::TEXT
             FROM information_schema.columns
             WHERE table_schema = current_schema()
               AND table_name = $1
               AND column_name = 'id'",
        )
        .bind(def.name)
        .fetch_one(&pool)
        .await
        .unwrap_or_else(|e| panic!("{} has no id column: {e}", def.name));

        assert_eq!(data_type, "uuid", "{}.id should be uuid", def.name);
        assert_eq!(
            default.as_deref(),
            Some("gen_random_uuid()"),
            "{}.id should default to gen_random_uuid()",
            def.name
        );
    }
}

/// Every table records when a row was created.
#[sqlx::test(migrations = false)]
async fn test_all_tables_have_created_at(pool: PgPool) {
    schema::ensure_schema(&pool).await.unwrap();

    for def in TABLES {
        let result: Option<(String, Option<String>)> = sqlx::query_as(
            "SELECT data_type::TEXT, column_default::TEXT
             FROM information_schema.columns
             WHERE table_schema = current_schema()
               AND table_name = $1
               AND column_name = 'created_at'",
        )
        .bind(def.name)
        .fetch_optional(&pool)
        .await
        .unwrap();

        let (data_type, default) =
            result.unwrap_or_else(|| panic!("Table {} is missing created_at", def.name));
        assert_eq!(data_type, "timestamp without time zone");
        assert!(
            default
                .as_deref()
                .is_some_and(|d| d.contains("CURRENT_TIMESTAMP")),
            "{}.created_at should default to CURRENT_TIMESTAMP, got {default:?}",
            def.name
        );
    }
}

/// Foreign keys point where the application expects them to.
#[sqlx::test(migrations = false)]
async fn test_foreign_keys(pool: PgPool) {
    schema::ensure_schema(&pool).await.unwrap();

    let mut fks: Vec<(String, String, String, String)> = sqlx::query_as(
        "SELECT tc.table_name::TEXT, kcu.column_name::TEXT,
                ccu.table_name::TEXT, rc.delete_rule::TEXT
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
             ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
         JOIN information_schema.constraint_column_usage ccu
             ON tc.constraint_name = ccu.constraint_name
             AND tc.table_schema = ccu.table_schema
         JOIN information_schema.referential_constraints rc
             ON tc.constraint_name = rc.constraint_name
             AND tc.table_schema = rc.constraint_schema
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND tc.table_schema = current_schema()",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    fks.sort();

    let expected = [
        ("analysis_history", "application_id", "applications", "NO ACTION"),
        ("applications", "grant_id", "grants", "SET NULL"),
        ("predictions", "user_id", "users", "NO ACTION"),
        ("subscriptions", "user_id", "users", "NO ACTION"),
    ];
    let expected: Vec<(String, String, String, String)> = expected
        .iter()
        .map(|(t, c, r, d)| (t.to_string(), c.to_string(), r.to_string(), d.to_string()))
        .collect();

    assert_eq!(fks, expected);
}

/// Columns with a declared width keep it.
#[sqlx::test(migrations = false)]
async fn test_varchar_widths(pool: PgPool) {
    schema::ensure_schema(&pool).await.unwrap();

    let cases = [
        ("grants", "title", 500),
        ("grants", "agency", 255),
        ("grants", "category", 100),
        ("grants", "source", 50),
        ("grants", "url", 500),
        ("users", "email", 255),
        ("users", "picture", 500),
        ("predictions", "confidence", 20),
        ("subscriptions", "stripe_subscription_id", 255),
    ];

    for (table, column, width) in cases {
        let (max_len,): (Option<i32>,) = sqlx::query_as(
            "SELECT character_maximum_length::INT4
             FROM information_schema.columns
             WHERE table_schema = current_schema()
               AND table_name = $1
               AND column_name = $2",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(max_len, Some(width), "{table}.{column}");
    }
}

/// Unique constraints the application relies on, plus the grant title key.
#[sqlx::test(migrations = false)]
async fn test_unique_columns(pool: PgPool) {
    schema::ensure_schema(&pool).await.unwrap();

    let cases = [
        ("grants", "title"),
        ("users", "email"),
        ("users", "google_id"),
        ("subscriptions", "stripe_subscription_id"),
    ];

    for (table, column) in cases {
        let (unique,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1
                FROM pg_index i
                JOIN pg_class c ON c.oid = i.indrelid
                JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = ANY(i.indkey)
                WHERE c.relname = $1
                  AND a.attname = $2
                  AND i.indisunique
                  AND i.indnatts = 1
            )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(unique, "{table}.{column} should be unique");
    }
}
