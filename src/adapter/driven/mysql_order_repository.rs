use super::mysql_rows::{order_from_row, order_line_from_row};
use crate::domain::model::{Order, OrderId, OrderStatus};
use crate::domain::port::{OrderRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Pool, Row};

const ORDER_WITH_LINES: &str = "SELECT o.id, o.customer_id, o.status, o.bag, o.sticker, \
     o.created_at, o.updated_at, d.cookie_code, d.qty, d.unit_price \
     FROM orders o INNER JOIN order_details d ON d.order_id = o.id";

/// MySQL注文リポジトリ
/// 注文と明細をJOINして取得する
pub struct MySqlOrderRepository {
    pool: Pool<MySql>,
}

impl MySqlOrderRepository {
    /// 新しいMySQL注文リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// JOINされた結果から注文を再構築する
    /// 行は注文ごとに連続している前提で、並び順を保ったままグループ化する
    fn build_orders_from_rows(rows: &[MySqlRow]) -> Result<Vec<Order>, RepositoryError> {
        let mut groups: Vec<(i64, Vec<&MySqlRow>)> = Vec::new();
        for row in rows {
            let order_id: i64 = row.try_get("id")?;
            match groups.last_mut() {
                Some((id, group)) if *id == order_id => group.push(row),
                _ => groups.push((order_id, vec![row])),
            }
        }

        groups
            .into_iter()
            .map(|(_, group)| {
                let lines = group
                    .iter()
                    .map(|row| order_line_from_row(row))
                    .collect::<Result<Vec<_>, _>>()?;
                order_from_row(group[0], lines)
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("{ORDER_WITH_LINES} WHERE o.id = ? ORDER BY d.id");
        let rows = sqlx::query(&sql)
            .bind(order_id.value())
            .fetch_all(&self.pool)
            .await?;
        Ok(Self::build_orders_from_rows(&rows)?.into_iter().next())
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!("{ORDER_WITH_LINES} ORDER BY o.created_at DESC, o.id DESC, d.id");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Self::build_orders_from_rows(&rows)
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "{ORDER_WITH_LINES} WHERE o.status = ? ORDER BY o.created_at DESC, o.id DESC, d.id"
        );
        let rows = sqlx::query(&sql)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;
        Self::build_orders_from_rows(&rows)
    }
}
