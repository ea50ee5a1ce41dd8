use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{Batch, CookieCode, Material, MaterialId, Order, OrderId, OrderStatus};
use crate::domain::port::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::service::{
    BatchProductionService, MaterialRestockService, OrderFulfillmentService,
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

mod catalog_query_service;
mod order_query_service;

pub use catalog_query_service::{CatalogQueryService, RecipeView};
pub use order_query_service::OrderQueryService;

/// 作業単位の結果を確定する
/// 成功ならコミット、失敗ならロールバックしてドメインエラーを変換する
async fn finish<T>(
    uow: Box<dyn UnitOfWork>,
    result: Result<T, DomainError>,
) -> Result<T, ApplicationError> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            tracing::warn!(error = %err, "unit of work rolled back");
            Err(err.into())
        }
    }
}

/// バッチ生産アプリケーションサービス
pub struct ProductionApplicationService {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    production_service: BatchProductionService,
}

impl ProductionApplicationService {
    /// 新しいアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `uow_factory` - 作業単位の生成元
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self {
            uow_factory,
            production_service: BatchProductionService::new(),
        }
    }

    /// クッキーを1バッチ生産する
    ///
    /// # Arguments
    /// * `cookie_code` - クッキーコード
    ///
    /// # Returns
    /// * `Ok(Batch)` - 記録された生産バッチ
    /// * `Err(ApplicationError)` - 生産失敗（変更はすべてロールバックされる）
    pub async fn produce_batch(&self, cookie_code: &CookieCode) -> Result<Batch, ApplicationError> {
        let span = tracing::info_span!(
            "produce_batch",
            correlation_id = %Uuid::new_v4(),
            cookie_code = %cookie_code
        );

        async {
            let mut uow = self.uow_factory.begin().await?;
            let result = self
                .production_service
                .produce(uow.as_mut(), cookie_code, Utc::now())
                .await;
            let batch = finish(uow, result).await?;

            tracing::info!(
                batch_id = %batch.id(),
                quantity_made = batch.quantity_made(),
                total_cost = %batch.total_cost(),
                "batch produced"
            );
            Ok(batch)
        }
        .instrument(span)
        .await
    }
}

/// 注文フルフィルメントアプリケーションサービス
pub struct OrderFulfillmentApplicationService {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    fulfillment_service: OrderFulfillmentService,
}

impl OrderFulfillmentApplicationService {
    /// 新しいアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `uow_factory` - 作業単位の生成元
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self {
            uow_factory,
            fulfillment_service: OrderFulfillmentService::new(),
        }
    }

    /// 注文のステータスを変更する
    ///
    /// # Arguments
    /// * `order_id` - 注文ID
    /// * `status` - 変更後のステータス
    ///
    /// # Returns
    /// * `Ok(Order)` - 変更後の注文
    /// * `Err(ApplicationError)` - 変更失敗（在庫不足の場合、注文は pending のまま再試行できる）
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApplicationError> {
        let span = tracing::info_span!(
            "update_order_status",
            correlation_id = %Uuid::new_v4(),
            order_id = %order_id,
            status = %status
        );

        async {
            let mut uow = self.uow_factory.begin().await?;
            let result = self
                .fulfillment_service
                .update_status(uow.as_mut(), order_id, status, Utc::now())
                .await;
            let order = finish(uow, result).await?;

            tracing::info!(
                bag = order.bag().map(|bag| bag.as_str()),
                sticker = order.sticker(),
                "order status updated"
            );
            Ok(order)
        }
        .instrument(span)
        .await
    }
}

/// 原材料アプリケーションサービス
pub struct MaterialApplicationService {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    restock_service: MaterialRestockService,
}

impl MaterialApplicationService {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self {
            uow_factory,
            restock_service: MaterialRestockService::new(),
        }
    }

    /// 原材料を仕入れる
    pub async fn restock_material(
        &self,
        material_id: MaterialId,
        quantity: Decimal,
    ) -> Result<Material, ApplicationError> {
        let span = tracing::info_span!(
            "restock_material",
            correlation_id = %Uuid::new_v4(),
            material_id = %material_id,
            quantity = %quantity
        );

        async {
            let mut uow = self.uow_factory.begin().await?;
            let result = self
                .restock_service
                .restock(uow.as_mut(), material_id, quantity, Utc::now())
                .await;
            let material = finish(uow, result).await?;

            tracing::info!(stock = %material.stock(), "material restocked");
            Ok(material)
        }
        .instrument(span)
        .await
    }
}
