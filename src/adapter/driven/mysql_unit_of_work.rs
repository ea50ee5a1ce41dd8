use super::mysql_rows::{
    cookie_from_row, material_from_row, order_from_row, order_line_from_row,
    recipe_line_from_row, COOKIE_COLUMNS, MATERIAL_COLUMNS, ORDER_COLUMNS, ORDER_LINE_COLUMNS,
    RECIPE_COLUMNS,
};
use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    Batch, BatchId, Cookie, CookieCode, LedgerEntry, LedgerEntryId, Material, MaterialId,
    NewBatch, NewLedgerEntry, Order, OrderId, RecipeLine,
};
use crate::domain::port::{RepositoryError, UnitOfWork, UnitOfWorkFactory};
use async_trait::async_trait;
use sqlx::{MySql, Pool, Transaction};

/// MySQLの作業単位の生成元
pub struct MySqlUnitOfWorkFactory {
    pool: Pool<MySql>,
}

impl MySqlUnitOfWorkFactory {
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for MySqlUnitOfWorkFactory {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;
        Ok(Box::new(MySqlUnitOfWork { tx }))
    }
}

/// MySQLトランザクション上の作業単位
/// 更新対象の行は `SELECT ... FOR UPDATE` で行ロックを取得する。
/// コミットされずに破棄された場合、sqlx がトランザクションをロールバックする。
pub struct MySqlUnitOfWork {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl UnitOfWork for MySqlUnitOfWork {
    async fn find_cookie_for_update(
        &mut self,
        code: &CookieCode,
    ) -> Result<Option<Cookie>, RepositoryError> {
        let sql = format!("SELECT {COOKIE_COLUMNS} FROM cookies WHERE code = ? FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(code.as_str())
            .fetch_optional(&mut *self.tx)
            .await?;
        row.as_ref().map(cookie_from_row).transpose()
    }

    async fn find_recipe_lines(
        &mut self,
        code: &CookieCode,
    ) -> Result<Vec<RecipeLine>, RepositoryError> {
        let sql =
            format!("SELECT {RECIPE_COLUMNS} FROM cookie_materials WHERE cookie_code = ? ORDER BY id");
        let rows = sqlx::query(&sql)
            .bind(code.as_str())
            .fetch_all(&mut *self.tx)
            .await?;
        rows.iter().map(recipe_line_from_row).collect()
    }

    async fn find_material_for_update(
        &mut self,
        id: MaterialId,
    ) -> Result<Option<Material>, RepositoryError> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = ? FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&mut *self.tx)
            .await?;
        row.as_ref().map(material_from_row).transpose()
    }

    async fn find_material_by_name_for_update(
        &mut self,
        name: &str,
    ) -> Result<Option<Material>, RepositoryError> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE name = ? FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await?;
        row.as_ref().map(material_from_row).transpose()
    }

    async fn find_order_for_update(
        &mut self,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? FOR UPDATE");
        let Some(row) = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&mut *self.tx)
            .await?
        else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {ORDER_LINE_COLUMNS} FROM order_details WHERE order_id = ? ORDER BY id"
        );
        let lines = sqlx::query(&sql)
            .bind(id.value())
            .fetch_all(&mut *self.tx)
            .await?
            .iter()
            .map(order_line_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        order_from_row(&row, lines).map(Some)
    }

    async fn save_cookie(&mut self, cookie: &Cookie) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE cookies SET stock = ? WHERE code = ?")
            .bind(cookie.stock())
            .bind(cookie.code().as_str())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn save_material(&mut self, material: &Material) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE materials SET stock = ? WHERE id = ?")
            .bind(material.stock())
            .bind(material.id().value())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn save_order(&mut self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE orders SET status = ?, bag = ?, sticker = ?, updated_at = ? WHERE id = ?",
        )
        .bind(order.status().as_str())
        .bind(order.bag().map(|bag| bag.as_str()))
        .bind(order.sticker())
        .bind(order.updated_at())
        .bind(order.id().value())
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn insert_batch(&mut self, batch: NewBatch) -> Result<Batch, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO batches (cookie_code, qty_made, total_cost, produced_at) VALUES (?, ?, ?, ?)",
        )
        .bind(batch.cookie_code.as_str())
        .bind(batch.quantity_made)
        .bind(batch.total_cost)
        .bind(batch.produced_at)
        .execute(&mut *self.tx)
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|e| RepositoryError::OperationFailed(e.to_string()))?;
        Ok(batch.into_batch(BatchId::new(id)))
    }

    async fn append_ledger_entry(
        &mut self,
        entry: NewLedgerEntry,
    ) -> Result<LedgerEntry, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO transactions \
             (transaction_type, amount, description, order_id, batch_id, material_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.kind.as_str())
        .bind(entry.amount)
        .bind(&entry.description)
        .bind(entry.order_id.map(|id| id.value()))
        .bind(entry.batch_id.map(|id| id.value()))
        .bind(entry.material_id.map(|id| id.value()))
        .bind(entry.created_at)
        .execute(&mut *self.tx)
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|e| RepositoryError::OperationFailed(e.to_string()))?;
        Ok(entry.into_entry(LedgerEntryId::new(id)))
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
