use crate::application::ApplicationError;
use crate::domain::error::EntityKind;
use crate::domain::model::{Order, OrderId, OrderStatus};
use crate::domain::port::OrderRepository;
use std::sync::Arc;

/// 注文クエリサービス
/// 読み取り専用の注文操作を提供する
pub struct OrderQueryService {
    order_repository: Arc<dyn OrderRepository>,
}

impl OrderQueryService {
    /// 新しい注文クエリサービスを作成
    ///
    /// # Arguments
    /// * `order_repository` - 注文リポジトリ
    pub fn new(order_repository: Arc<dyn OrderRepository>) -> Self {
        Self { order_repository }
    }

    /// 注文IDで注文を取得
    ///
    /// # Returns
    /// * `Ok(Order)` - 注文が見つかった
    /// * `Err(ApplicationError::NotFound)` - 注文が見つからなかった
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApplicationError> {
        self.order_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(EntityKind::Order, id))
    }

    /// 注文の一覧を取得
    /// ステータスが指定された場合はそのステータスの注文のみ、作成日時の降順で返す
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, ApplicationError> {
        let orders = match status {
            Some(status) => self.order_repository.find_by_status(status).await?,
            None => self.order_repository.find_all().await?,
        };
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CookieCode, CustomerId, OrderLine};
    use crate::domain::port::RepositoryError;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    struct MockOrderRepository {
        orders: Vec<Order>,
    }

    #[async_trait]
    impl OrderRepository for MockOrderRepository {
        async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
            Ok(self.orders.iter().find(|o| o.id() == order_id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
            let mut orders = self.orders.clone();
            orders.sort_by_key(|o| std::cmp::Reverse(o.created_at()));
            Ok(orders)
        }

        async fn find_by_status(
            &self,
            status: OrderStatus,
        ) -> Result<Vec<Order>, RepositoryError> {
            Ok(self
                .find_all()
                .await?
                .into_iter()
                .filter(|o| o.status() == status)
                .collect())
        }
    }

    fn order(id: i64, status: OrderStatus, minutes_ago: i64) -> Order {
        let placed_at = Utc::now() - Duration::minutes(minutes_ago);
        let mut order = Order::place(
            OrderId::new(id),
            CustomerId::new(1),
            vec![OrderLine::new(CookieCode::new("OREO").unwrap(), 1, dec!(389.20)).unwrap()],
            placed_at,
        )
        .unwrap();
        order.change_status(status, placed_at);
        order
    }

    fn service() -> OrderQueryService {
        OrderQueryService::new(Arc::new(MockOrderRepository {
            orders: vec![
                order(1, OrderStatus::Pending, 30),
                order(2, OrderStatus::Delivered, 20),
                order(3, OrderStatus::Pending, 10),
            ],
        }))
    }

    #[tokio::test]
    async fn test_get_order() {
        let found = service().get_order(OrderId::new(2)).await.unwrap();
        assert_eq!(found.status(), OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_get_missing_order_is_not_found() {
        let err = service().get_order(OrderId::new(9)).await.unwrap_err();
        assert_eq!(err, ApplicationError::NotFound("order 9".to_string()));
    }

    #[tokio::test]
    async fn test_list_orders_by_status_newest_first() {
        let pending = service()
            .list_orders(Some(OrderStatus::Pending))
            .await
            .unwrap();
        let ids: Vec<i64> = pending.iter().map(|o| o.id().value()).collect();
        assert_eq!(ids, vec![3, 1]);

        let all = service().list_orders(None).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
