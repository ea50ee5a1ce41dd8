use crate::domain::model::{BatchId, CookieCode};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// 1回の生産で焼き上がるクッキーの数
pub const FIXED_BATCH_SIZE: u32 = 20;

/// 永続化前の生産記録
/// IDは作業単位への挿入時に採番される
#[derive(Debug, Clone, PartialEq)]
pub struct NewBatch {
    pub cookie_code: CookieCode,
    pub quantity_made: u32,
    pub total_cost: Decimal,
    pub produced_at: DateTime<Utc>,
}

impl NewBatch {
    /// 固定バッチサイズの生産記録を作成
    pub fn new(cookie_code: CookieCode, total_cost: Decimal, produced_at: DateTime<Utc>) -> Self {
        Self {
            cookie_code,
            quantity_made: FIXED_BATCH_SIZE,
            total_cost,
            produced_at,
        }
    }

    /// 採番されたIDで生産記録を確定する
    pub fn into_batch(self, id: BatchId) -> Batch {
        Batch {
            id,
            cookie_code: self.cookie_code,
            quantity_made: self.quantity_made,
            total_cost: self.total_cost,
            produced_at: self.produced_at,
        }
    }
}

/// 生産バッチ
/// 作成後は変更されない（原価は生産時点の単価で確定）
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    id: BatchId,
    cookie_code: CookieCode,
    quantity_made: u32,
    total_cost: Decimal,
    produced_at: DateTime<Utc>,
}

impl Batch {
    /// データベースから取得したデータでバッチを再構築
    pub fn reconstruct(
        id: BatchId,
        cookie_code: CookieCode,
        quantity_made: u32,
        total_cost: Decimal,
        produced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            cookie_code,
            quantity_made,
            total_cost,
            produced_at,
        }
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn cookie_code(&self) -> &CookieCode {
        &self.cookie_code
    }

    pub fn quantity_made(&self) -> u32 {
        self.quantity_made
    }

    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    pub fn produced_at(&self) -> DateTime<Utc> {
        self.produced_at
    }
}
