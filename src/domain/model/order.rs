use crate::domain::error::DomainError;
use crate::domain::model::{BagSize, CookieCode, CustomerId, OrderId, OrderStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// 注文明細を表す値オブジェクト
/// 単価は注文時点の価格のスナップショットで、現在のクッキー価格を再読込しない
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    cookie_code: CookieCode,
    quantity: u32,
    unit_price: Decimal,
}

impl OrderLine {
    /// 新しい注文明細を作成
    /// 数量は1以上、単価は0以上である必要がある
    pub fn new(
        cookie_code: CookieCode,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        if unit_price < Decimal::ZERO {
            return Err(DomainError::InvalidValue(format!(
                "単価は0以上である必要があります: {}",
                unit_price
            )));
        }
        Ok(Self {
            cookie_code,
            quantity,
            unit_price,
        })
    }

    pub fn cookie_code(&self) -> &CookieCode {
        &self.cookie_code
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// 小計を計算（単価 × 数量）
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// ステータス変更の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// 在庫と包装資材の引当を伴う（pending → on_preparation のみ）
    Fulfil,
    /// ステータスの書き換えのみ
    StatusOnly,
}

/// Order集約
/// 明細は注文確定後に変更されない。ステータスは状態遷移操作でのみ変更される
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    order_lines: Vec<OrderLine>,
    status: OrderStatus,
    bag: Option<BagSize>,
    sticker: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// チェックアウトで作成される注文
    /// 初期ステータスはPending、包装は未決定
    pub fn place(
        id: OrderId,
        customer_id: CustomerId,
        order_lines: Vec<OrderLine>,
        placed_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if order_lines.is_empty() {
            return Err(DomainError::InvalidValue(
                "注文明細が空です".to_string(),
            ));
        }
        Ok(Self {
            id,
            customer_id,
            order_lines,
            status: OrderStatus::Pending,
            bag: None,
            sticker: false,
            created_at: placed_at,
            updated_at: placed_at,
        })
    }

    /// データベースから取得したデータで注文を再構築
    /// リポジトリでの使用を想定
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: OrderId,
        customer_id: CustomerId,
        order_lines: Vec<OrderLine>,
        status: OrderStatus,
        bag: Option<BagSize>,
        sticker: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id,
            order_lines,
            status,
            bag,
            sticker,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn order_lines(&self) -> &[OrderLine] {
        &self.order_lines
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn bag(&self) -> Option<BagSize> {
        self.bag
    }

    pub fn sticker(&self) -> bool {
        self.sticker
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 注文されたクッキーの合計数
    /// 明細ごとの数量はu32だが、合計はu32を超えうる
    pub fn total_quantity(&self) -> u64 {
        self.order_lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// 合計金額（明細の単価スナップショットから計算）
    pub fn total_amount(&self) -> Decimal {
        self.order_lines.iter().map(OrderLine::subtotal).sum()
    }

    /// 現在のステータスから指定ステータスへの変更の種類を判定する
    /// 在庫引当が発生するのは pending → on_preparation のみ
    pub fn transition_to(&self, target: OrderStatus) -> StatusTransition {
        use OrderStatus::*;

        match (self.status, target) {
            (Pending, OnPreparation) => StatusTransition::Fulfil,
            (Pending, Pending | Delivered | Cancelled)
            | (OnPreparation | Delivered | Cancelled, _) => StatusTransition::StatusOnly,
        }
    }

    /// 使用した袋を記録
    pub fn assign_bag(&mut self, bag: BagSize) {
        self.bag = Some(bag);
    }

    /// ステッカーの同梱を記録
    pub fn attach_sticker(&mut self) {
        self.sticker = true;
    }

    /// ステータスを書き換える
    /// 遷移の妥当性は検証しない（在庫への影響は transition_to で判定する）
    pub fn change_status(&mut self, status: OrderStatus, changed_at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = changed_at;
    }
}
