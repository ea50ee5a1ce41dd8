use crate::adapter::database_error::DatabaseError;
use sqlx::{MySql, Pool};

/// マイグレーション（ファイル名と SQL）
/// 各ファイルは単一の文で、何度実行しても結果が変わらない
const MIGRATIONS: [(&str, &str); 8] = [
    (
        "001_create_materials_table",
        include_str!("../../migrations/001_create_materials_table.sql"),
    ),
    (
        "002_create_cookies_table",
        include_str!("../../migrations/002_create_cookies_table.sql"),
    ),
    (
        "003_create_cookie_materials_table",
        include_str!("../../migrations/003_create_cookie_materials_table.sql"),
    ),
    (
        "004_create_orders_table",
        include_str!("../../migrations/004_create_orders_table.sql"),
    ),
    (
        "005_create_order_details_table",
        include_str!("../../migrations/005_create_order_details_table.sql"),
    ),
    (
        "006_create_batches_table",
        include_str!("../../migrations/006_create_batches_table.sql"),
    ),
    (
        "007_create_transactions_table",
        include_str!("../../migrations/007_create_transactions_table.sql"),
    ),
    (
        "008_seed_packaging_materials",
        include_str!("../../migrations/008_seed_packaging_materials.sql"),
    ),
];

/// データベースマイグレーションを管理する構造体
pub struct DatabaseMigration {
    pool: Pool<MySql>,
}

impl DatabaseMigration {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// マイグレーションを順番に実行
    /// べき等性を保証（CREATE TABLE IF NOT EXISTS / INSERT IGNORE）
    pub async fn run(&self) -> Result<(), DatabaseError> {
        for (name, migration_sql) in MIGRATIONS {
            tracing::debug!(migration = name, "running migration");
            sqlx::query(migration_sql)
                .execute(&self.pool)
                .await
                .map_err(|e| DatabaseError::MigrationError(format!("{} failed: {}", name, e)))?;
        }

        tracing::info!(count = MIGRATIONS.len(), "migrations applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_single_statements() {
        let names: Vec<&str> = MIGRATIONS.iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        for (name, sql) in MIGRATIONS {
            let statements = sql.split(';').filter(|s| !s.trim().is_empty()).count();
            assert_eq!(statements, 1, "{name}");
        }
    }

    #[test]
    fn test_packaging_seed_uses_canonical_names() {
        let (_, seed) = MIGRATIONS[7];
        for name in ["Small Bag", "Medium Bag", "Sticker"] {
            assert!(seed.contains(name), "{name}");
        }
    }
}
