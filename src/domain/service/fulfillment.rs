use crate::domain::error::{DomainError, EntityKind};
use crate::domain::model::{
    derive_packaging, Cookie, CookieCode, NewLedgerEntry, Order, OrderId, OrderStatus,
    StatusTransition, STICKER_MATERIAL_NAME,
};
use crate::domain::port::UnitOfWork;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// 注文フルフィルメントサービス
/// 注文のステータス変更と、それに伴う在庫・包装資材の引当を担当
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderFulfillmentService;

impl OrderFulfillmentService {
    pub fn new() -> Self {
        Self
    }

    /// 注文のステータスを変更する
    ///
    /// pending → on_preparation の場合のみクッキー在庫と包装資材を引き当て、売上を台帳に記録する。
    /// それ以外の組み合わせはステータスの書き換えのみを行う（在庫の戻しは行わない）。
    ///
    /// # Arguments
    /// * `uow` - 作業単位
    /// * `order_id` - 注文ID
    /// * `target` - 変更後のステータス
    /// * `changed_at` - 変更日時
    ///
    /// # Returns
    /// * `Ok(Order)` - 変更後の注文
    /// * `Err(DomainError)` - 変更失敗（注文・クッキーの不在、在庫不足など）
    pub async fn update_status(
        &self,
        uow: &mut dyn UnitOfWork,
        order_id: OrderId,
        target: OrderStatus,
        changed_at: DateTime<Utc>,
    ) -> Result<Order, DomainError> {
        let mut order = uow
            .find_order_for_update(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Order, order_id))?;

        match order.transition_to(target) {
            StatusTransition::Fulfil => {
                self.fulfil(uow, &mut order, changed_at).await?;
            }
            StatusTransition::StatusOnly => {
                tracing::debug!(
                    order_id = %order_id,
                    from = %order.status(),
                    to = %target,
                    "status-only transition"
                );
            }
        }

        order.change_status(target, changed_at);
        uow.save_order(&order).await?;

        Ok(order)
    }

    /// クッキー在庫と包装資材を引き当てる
    async fn fulfil(
        &self,
        uow: &mut dyn UnitOfWork,
        order: &mut Order,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        // 同じクッキーの明細は合算し、コード順にロックする
        let mut quantities: BTreeMap<CookieCode, u32> = BTreeMap::new();
        for line in order.order_lines() {
            let quantity = quantities.entry(line.cookie_code().clone()).or_default();
            *quantity = quantity
                .checked_add(line.quantity())
                .ok_or(DomainError::InvalidQuantity)?;
        }

        // すべての明細を検証してから保存する
        let mut cookies: Vec<Cookie> = Vec::with_capacity(quantities.len());
        for (code, quantity) in &quantities {
            let mut cookie = uow
                .find_cookie_for_update(code)
                .await?
                .ok_or_else(|| DomainError::not_found(EntityKind::Cookie, code))?;
            cookie.take_stock(*quantity)?;
            cookies.push(cookie);
        }
        for cookie in &cookies {
            uow.save_cookie(cookie).await?;
        }

        let packaging = derive_packaging(order.total_quantity());

        if self
            .consume_packaging(uow, packaging.bag.material_name())
            .await?
        {
            order.assign_bag(packaging.bag);
        }
        if packaging.sticker && self.consume_packaging(uow, STICKER_MATERIAL_NAME).await? {
            order.attach_sticker();
        }

        uow.append_ledger_entry(NewLedgerEntry::sale(order, recorded_at))
            .await?;

        Ok(())
    }

    /// 包装資材を1つ消費する
    /// カタログに存在しない場合は何もせず false を返す
    async fn consume_packaging(
        &self,
        uow: &mut dyn UnitOfWork,
        material_name: &str,
    ) -> Result<bool, DomainError> {
        match uow.find_material_by_name_for_update(material_name).await? {
            Some(mut material) => {
                material.consume(Decimal::ONE)?;
                uow.save_material(&material).await?;
                Ok(true)
            }
            None => {
                tracing::warn!(material = material_name, "packaging material not in catalogue, skipped");
                Ok(false)
            }
        }
    }
}
