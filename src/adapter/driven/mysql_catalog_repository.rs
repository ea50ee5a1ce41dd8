use super::mysql_rows::{
    batch_from_row, cookie_from_row, ledger_entry_from_row, material_from_row,
    recipe_line_from_row, COOKIE_COLUMNS, MATERIAL_COLUMNS, RECIPE_COLUMNS,
};
use crate::domain::model::{Batch, Cookie, CookieCode, LedgerEntry, Material, RecipeLine};
use crate::domain::port::{CatalogRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::{MySql, Pool};

/// MySQLカタログリポジトリ
/// 読み取り専用のため、トランザクションを使わずにプールから直接取得する
pub struct MySqlCatalogRepository {
    pool: Pool<MySql>,
}

impl MySqlCatalogRepository {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for MySqlCatalogRepository {
    async fn find_all_cookies(&self) -> Result<Vec<Cookie>, RepositoryError> {
        let sql = format!("SELECT {COOKIE_COLUMNS} FROM cookies ORDER BY code");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(cookie_from_row).collect()
    }

    async fn find_cookie(&self, code: &CookieCode) -> Result<Option<Cookie>, RepositoryError> {
        let sql = format!("SELECT {COOKIE_COLUMNS} FROM cookies WHERE code = ?");
        let row = sqlx::query(&sql)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(cookie_from_row).transpose()
    }

    async fn find_all_materials(&self) -> Result<Vec<Material>, RepositoryError> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials ORDER BY name");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(material_from_row).collect()
    }

    async fn find_recipe_lines(
        &self,
        code: &CookieCode,
    ) -> Result<Vec<RecipeLine>, RepositoryError> {
        let sql =
            format!("SELECT {RECIPE_COLUMNS} FROM cookie_materials WHERE cookie_code = ? ORDER BY id");
        let rows = sqlx::query(&sql)
            .bind(code.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(recipe_line_from_row).collect()
    }

    async fn find_batches(&self) -> Result<Vec<Batch>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, cookie_code, qty_made, total_cost, produced_at \
             FROM batches ORDER BY produced_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(batch_from_row).collect()
    }

    async fn find_ledger_entries(&self) -> Result<Vec<LedgerEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, transaction_type, amount, description, order_id, batch_id, material_id, created_at \
             FROM transactions ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(ledger_entry_from_row).collect()
    }
}
