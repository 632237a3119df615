//! Table definitions and conditional creation.
//!
//! The six tables below are the contract with the web application that
//! reads this store. Column names, types and defaults must not drift.
//! Every statement is `IF NOT EXISTS`, so running [`ensure_schema`] against
//! a partially or fully provisioned store is a no-op for what is already
//! there.

use sqlx::PgPool;

use crate::repositories::StatusRepo;

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

/// One table of the provisioned schema.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    /// Tables this one declares a foreign key to.
    pub references: &'static [&'static str],
    pub ddl: &'static str,
}

pub const GRANTS: TableDef = TableDef {
    name: "grants",
    references: &[],
    ddl: "\
        CREATE TABLE IF NOT EXISTS grants (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(500) NOT NULL,
            agency VARCHAR(255),
            amount_min DECIMAL(15,2),
            amount_max DECIMAL(15,2),
            deadline DATE,
            description TEXT,
            category VARCHAR(100),
            keywords TEXT,
            eligibility TEXT,
            source VARCHAR(50),
            url VARCHAR(500),
            success_rate DECIMAL(5,2),
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
};

pub const USERS: TableDef = TableDef {
    name: "users",
    references: &[],
    ddl: "\
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) UNIQUE NOT NULL,
            name VARCHAR(255) NOT NULL,
            google_id VARCHAR(255) UNIQUE,
            picture VARCHAR(500),
            subscription_status VARCHAR(50) DEFAULT 'free',
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
};

pub const APPLICATIONS: TableDef = TableDef {
    name: "applications",
    references: &["grants"],
    ddl: "\
        CREATE TABLE IF NOT EXISTS applications (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_email VARCHAR(255),
            organization_name VARCHAR(255),
            grant_id UUID REFERENCES grants(id) ON DELETE SET NULL,
            proposal_file_name VARCHAR(255),
            proposal_text TEXT,
            success_probability DECIMAL(5,2),
            match_score DECIMAL(5,2),
            strengths TEXT,
            weaknesses TEXT,
            recommendations TEXT,
            ai_analysis JSONB,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
};

pub const ANALYSIS_HISTORY: TableDef = TableDef {
    name: "analysis_history",
    references: &["applications"],
    ddl: "\
        CREATE TABLE IF NOT EXISTS analysis_history (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            application_id UUID REFERENCES applications(id),
            openai_tokens_used INTEGER,
            analysis_cost DECIMAL(10,4),
            processing_time_seconds DECIMAL(10,2),
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
};

pub const PREDICTIONS: TableDef = TableDef {
    name: "predictions",
    references: &["users"],
    ddl: "\
        CREATE TABLE IF NOT EXISTS predictions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID REFERENCES users(id),
            organization_name VARCHAR(255) NOT NULL,
            organization_type VARCHAR(100) NOT NULL,
            funding_amount INTEGER NOT NULL,
            experience_level VARCHAR(50) NOT NULL,
            has_partnership BOOLEAN DEFAULT FALSE,
            has_previous_grants BOOLEAN DEFAULT FALSE,
            success_probability INTEGER NOT NULL,
            confidence VARCHAR(20) NOT NULL,
            ai_enhanced BOOLEAN DEFAULT FALSE,
            recommendations JSONB,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
};

pub const SUBSCRIPTIONS: TableDef = TableDef {
    name: "subscriptions",
    references: &["users"],
    ddl: "\
        CREATE TABLE IF NOT EXISTS subscriptions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID REFERENCES users(id),
            stripe_subscription_id VARCHAR(255) UNIQUE,
            status VARCHAR(50) NOT NULL,
            current_period_start TIMESTAMP,
            current_period_end TIMESTAMP,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
};

/// All tables in creation order. A table only references tables listed
/// before it.
pub const TABLES: [TableDef; 6] = [
    GRANTS,
    USERS,
    APPLICATIONS,
    ANALYSIS_HISTORY,
    PREDICTIONS,
    SUBSCRIPTIONS,
];

/// Name of the unique index on the grant natural key.
pub const GRANT_TITLE_INDEX: &str = "grants_title_key";

fn grant_title_index_ddl() -> String {
    format!("CREATE UNIQUE INDEX IF NOT EXISTS {GRANT_TITLE_INDEX} ON grants (title)")
}

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

// ---------------------------------------------------------------------------
// Errors and report
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A conditional `CREATE TABLE` was rejected.
    #[error("failed to create table {table}: {source}")]
    CreateTable {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A table was about to be created before a table it references.
    #[error("table {table} references {missing}, which does not exist")]
    MissingDependency {
        table: &'static str,
        missing: &'static str,
    },

    #[error("failed to create unique index {index}: {source}")]
    CreateIndex {
        index: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to inspect existing tables: {0}")]
    Inspect(#[source] sqlx::Error),
}

/// How seeding keeps grant titles unique.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitleGuard {
    /// `grants_title_key` is in place; inserts resolve conflicts on it.
    #[default]
    UniqueIndex,
    /// The store already holds duplicate titles, so the index cannot be
    /// built. Inserts look the title up first instead.
    PreCheck,
}

/// What a schema pass found and did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Tables created by this pass, in creation order.
    pub created: Vec<&'static str>,
    /// Tables that already existed and were left alone.
    pub existing: Vec<&'static str>,
    pub title_guard: TitleGuard,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Ensure all six tables and, where the data allows it, the grant title
/// index exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<SchemaReport, SchemaError> {
    let mut report = ensure_tables(pool, &TABLES).await?;
    report.title_guard = ensure_grant_title_index(pool).await?;
    Ok(report)
}

/// Conditionally create `defs` in order.
///
/// Refuses to create a table whose referenced tables are not present yet,
/// leaving it uncreated.
pub async fn ensure_tables(
    pool: &PgPool,
    defs: &[TableDef],
) -> Result<SchemaReport, SchemaError> {
    let mut report = SchemaReport::default();

    for def in defs {
        for &referenced in def.references {
            let present = StatusRepo::table_exists(pool, referenced)
                .await
                .map_err(SchemaError::Inspect)?;
            if !present {
                return Err(SchemaError::MissingDependency {
                    table: def.name,
                    missing: referenced,
                });
            }
        }

        let already = StatusRepo::table_exists(pool, def.name)
            .await
            .map_err(SchemaError::Inspect)?;

        sqlx::query(def.ddl)
            .execute(pool)
            .await
            .map_err(|source| SchemaError::CreateTable {
                table: def.name,
                source,
            })?;

        if already {
            tracing::debug!(table = def.name, "Table already present");
            report.existing.push(def.name);
        } else {
            tracing::info!(table = def.name, "Created table");
            report.created.push(def.name);
        }
    }

    Ok(report)
}

async fn ensure_grant_title_index(pool: &PgPool) -> Result<TitleGuard, SchemaError> {
    let Err(source) = sqlx::query(&grant_title_index_ddl()).execute(pool).await else {
        return Ok(TitleGuard::UniqueIndex);
    };

    let duplicate = source
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);
    if !duplicate {
        return Err(SchemaError::CreateIndex {
            index: GRANT_TITLE_INDEX,
            source,
        });
    }

    tracing::warn!(
        index = GRANT_TITLE_INDEX,
        error = %source,
        "Duplicate grant titles present, seeding will check titles before insert",
    );
    Ok(TitleGuard::PreCheck)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_distinct_tables() {
        let mut names: Vec<&str> = TABLES.iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn references_point_backwards() {
        for (i, def) in TABLES.iter().enumerate() {
            for referenced in def.references {
                let pos = TABLES
                    .iter()
                    .position(|t| t.name == *referenced)
                    .unwrap_or_else(|| panic!("{} references unknown {referenced}", def.name));
                assert!(
                    pos < i,
                    "{} is created before its referent {referenced}",
                    def.name
                );
            }
        }
    }

    #[test]
    fn declared_references_match_ddl() {
        for def in TABLES {
            let in_ddl = def.ddl.matches("REFERENCES").count();
            assert_eq!(
                in_ddl,
                def.references.len(),
                "{} DDL and declared references disagree",
                def.name
            );
            for referenced in def.references {
                assert!(def.ddl.contains(&format!("REFERENCES {referenced}(id)")));
            }
        }
    }

    #[test]
    fn every_statement_is_conditional() {
        for def in TABLES {
            assert!(
                def.ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", def.name)),
                "{} is not a conditional create",
                def.name
            );
        }
        assert!(grant_title_index_ddl().contains("IF NOT EXISTS grants_title_key"));
    }

    #[test]
    fn grants_and_users_come_first() {
        assert_eq!(TABLES[0].name, "grants");
        assert_eq!(TABLES[1].name, "users");
    }
}
