use crate::domain::error::DomainError;
use crate::domain::model::{
    ensure_storable, round_to_storage, Batch, BatchId, LedgerEntryId, Material, MaterialId, Order,
    OrderId,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 取引の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    /// 注文の準備開始による売上
    Sale,
    /// バッチ生産の原価
    Production,
    /// 原材料の仕入れ
    MaterialPurchase,
}

impl LedgerEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerEntryKind::Sale => "sale",
            LedgerEntryKind::Production => "production",
            LedgerEntryKind::MaterialPurchase => "material_purchase",
        }
    }
}

impl fmt::Display for LedgerEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LedgerEntryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(LedgerEntryKind::Sale),
            "production" => Ok(LedgerEntryKind::Production),
            "material_purchase" => Ok(LedgerEntryKind::MaterialPurchase),
            _ => Err(DomainError::InvalidValue(format!("無効な取引種別: {}", s))),
        }
    }
}

/// 追記前の台帳エントリ
#[derive(Debug, Clone, PartialEq)]
pub struct NewLedgerEntry {
    pub kind: LedgerEntryKind,
    pub amount: Decimal,
    pub description: String,
    pub order_id: Option<OrderId>,
    pub batch_id: Option<BatchId>,
    pub material_id: Option<MaterialId>,
    pub created_at: DateTime<Utc>,
}

impl NewLedgerEntry {
    /// バッチ生産の原価を記録
    pub fn production(batch: &Batch) -> Self {
        Self {
            kind: LedgerEntryKind::Production,
            amount: batch.total_cost(),
            description: format!(
                "Batch of {} x {}",
                batch.quantity_made(),
                batch.cookie_code()
            ),
            order_id: None,
            batch_id: Some(batch.id()),
            material_id: None,
            created_at: batch.produced_at(),
        }
    }

    /// 注文の売上を記録（明細の単価スナップショットから計算）
    pub fn sale(order: &Order, recorded_at: DateTime<Utc>) -> Self {
        Self {
            kind: LedgerEntryKind::Sale,
            amount: round_to_storage(order.total_amount()),
            description: format!(
                "Order #{} ({} cookies)",
                order.id(),
                order.total_quantity()
            ),
            order_id: Some(order.id()),
            batch_id: None,
            material_id: None,
            created_at: recorded_at,
        }
    }

    /// 原材料の仕入れを記録（数量 × 現在の単価、格納精度に丸める）
    pub fn material_purchase(
        material: &Material,
        quantity: Decimal,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let amount = ensure_storable(round_to_storage(material.cost_of(quantity)?))?;
        Ok(Self {
            kind: LedgerEntryKind::MaterialPurchase,
            amount,
            description: format!("Restock {} {} of {}", quantity, material.unit(), material.name()),
            order_id: None,
            batch_id: None,
            material_id: Some(material.id()),
            created_at: recorded_at,
        })
    }

    /// 採番されたIDでエントリを確定する
    pub fn into_entry(self, id: LedgerEntryId) -> LedgerEntry {
        LedgerEntry {
            id,
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            order_id: self.order_id,
            batch_id: self.batch_id,
            material_id: self.material_id,
            created_at: self.created_at,
        }
    }
}

/// 取引台帳のエントリ（追記専用）
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub kind: LedgerEntryKind,
    pub amount: Decimal,
    pub description: String,
    pub order_id: Option<OrderId>,
    pub batch_id: Option<BatchId>,
    pub material_id: Option<MaterialId>,
    pub created_at: DateTime<Utc>,
}
