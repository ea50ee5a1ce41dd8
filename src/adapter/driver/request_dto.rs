use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// バッチ生産用のリクエストDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct ProduceBatchRequest {
    pub cookie_code: String,
}

/// 注文ステータス変更用のリクエストDTO
/// status は "pending" / "on_preparation" / "delivered" / "cancelled"
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// 原材料仕入れ用のリクエストDTO
/// 数量は JSON の数値・文字列のどちらでも受け付ける
#[derive(Debug, Serialize, Deserialize)]
pub struct RestockMaterialRequest {
    pub quantity: Decimal,
}

/// 注文一覧取得用のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct OrdersQueryParams {
    pub status: Option<String>,
}
