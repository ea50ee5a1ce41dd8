use crate::application::service::RecipeView;
use crate::domain::model::{Batch, Cookie, LedgerEntry, Material, Order, OrderLine};
use serde::{Deserialize, Serialize};

// 金額・数量は精度を保つため文字列で返す

/// クッキー用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct CookieResponse {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub category: String,
    pub stock: u32,
    pub is_active: bool,
}

impl CookieResponse {
    pub fn from_cookie(cookie: &Cookie) -> Self {
        Self {
            code: cookie.code().to_string(),
            name: cookie.name().to_string(),
            description: cookie.description().map(str::to_string),
            price: cookie.price().to_string(),
            category: cookie.category().to_string(),
            stock: cookie.stock(),
            is_active: cookie.is_active(),
        }
    }
}

/// 原材料用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct MaterialResponse {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub stock: String,
    pub unit_cost: String,
}

impl MaterialResponse {
    pub fn from_material(material: &Material) -> Self {
        Self {
            id: material.id().value(),
            name: material.name().to_string(),
            unit: material.unit().to_string(),
            stock: material.stock().normalize().to_string(),
            unit_cost: material.unit_cost().to_string(),
        }
    }
}

/// レシピ用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub cookie_code: String,
    pub cookie_name: String,
    pub lines: Vec<RecipeLineResponse>,
}

/// レシピ明細用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeLineResponse {
    pub material_id: i64,
    pub material_name: String,
    pub unit: String,
    pub consumption_per_batch: String,
}

impl RecipeResponse {
    pub fn from_recipe(recipe: &RecipeView) -> Self {
        Self {
            cookie_code: recipe.cookie.code().to_string(),
            cookie_name: recipe.cookie.name().to_string(),
            lines: recipe
                .lines
                .iter()
                .map(|(line, material)| RecipeLineResponse {
                    material_id: material.id().value(),
                    material_name: material.name().to_string(),
                    unit: material.unit().to_string(),
                    consumption_per_batch: line.consumption_per_batch().normalize().to_string(),
                })
                .collect(),
        }
    }
}

/// 生産バッチ用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    pub id: i64,
    pub cookie_code: String,
    pub quantity_made: u32,
    pub total_cost: String,
    pub produced_at: String,
}

impl BatchResponse {
    pub fn from_batch(batch: &Batch) -> Self {
        Self {
            id: batch.id().value(),
            cookie_code: batch.cookie_code().to_string(),
            quantity_made: batch.quantity_made(),
            total_cost: batch.total_cost().normalize().to_string(),
            produced_at: batch.produced_at().to_rfc3339(),
        }
    }
}

/// 注文用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: i64,
    pub customer_id: i64,
    pub status: String,
    pub bag: Option<String>,
    pub sticker: bool,
    pub order_lines: Vec<OrderLineResponse>,
    pub total_quantity: u64,
    pub total_amount: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 注文明細用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderLineResponse {
    pub cookie_code: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

impl OrderResponse {
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id().value(),
            customer_id: order.customer_id().value(),
            status: order.status().to_string(),
            bag: order.bag().map(|bag| bag.to_string()),
            sticker: order.sticker(),
            order_lines: order
                .order_lines()
                .iter()
                .map(OrderLineResponse::from_order_line)
                .collect(),
            total_quantity: order.total_quantity(),
            total_amount: order.total_amount().to_string(),
            created_at: order.created_at().to_rfc3339(),
            updated_at: order.updated_at().to_rfc3339(),
        }
    }
}

impl OrderLineResponse {
    fn from_order_line(line: &OrderLine) -> Self {
        Self {
            cookie_code: line.cookie_code().to_string(),
            quantity: line.quantity(),
            unit_price: line.unit_price().to_string(),
            subtotal: line.subtotal().to_string(),
        }
    }
}

/// 取引台帳用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerEntryResponse {
    pub id: i64,
    pub kind: String,
    pub amount: String,
    pub description: String,
    pub order_id: Option<i64>,
    pub batch_id: Option<i64>,
    pub material_id: Option<i64>,
    pub created_at: String,
}

impl LedgerEntryResponse {
    pub fn from_entry(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id.value(),
            kind: entry.kind.to_string(),
            amount: entry.amount.normalize().to_string(),
            description: entry.description.clone(),
            order_id: entry.order_id.map(|id| id.value()),
            batch_id: entry.batch_id.map(|id| id.value()),
            material_id: entry.material_id.map(|id| id.value()),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BagSize, CookieCode, CustomerId, MaterialId, OrderId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_response_carries_packaging_and_totals() {
        let mut order = Order::place(
            OrderId::new(4),
            CustomerId::new(2),
            vec![
                OrderLine::new(CookieCode::new("OREO").unwrap(), 3, dec!(389.20)).unwrap(),
                OrderLine::new(CookieCode::new("CHIPS").unwrap(), 1, dec!(350.00)).unwrap(),
            ],
            Utc::now(),
        )
        .unwrap();
        order.assign_bag(BagSize::Medium);
        order.attach_sticker();

        let response = OrderResponse::from_order(&order);

        assert_eq!(response.status, "pending");
        assert_eq!(response.bag.as_deref(), Some("medium"));
        assert!(response.sticker);
        assert_eq!(response.total_quantity, 4);
        assert_eq!(response.total_amount, "1517.60");
        assert_eq!(response.order_lines[0].subtotal, "1167.60");
    }

    #[test]
    fn test_order_response_total_quantity_beyond_u32() {
        let order = Order::place(
            OrderId::new(5),
            CustomerId::new(2),
            vec![
                OrderLine::new(CookieCode::new("OREO").unwrap(), u32::MAX, dec!(1)).unwrap(),
                OrderLine::new(CookieCode::new("OREO").unwrap(), 1, dec!(1)).unwrap(),
            ],
            Utc::now(),
        )
        .unwrap();

        let response = OrderResponse::from_order(&order);

        assert_eq!(response.total_quantity, 4_294_967_296);
    }

    #[test]
    fn test_material_stock_is_normalized() {
        let material =
            Material::new(MaterialId::new(1), "Harina", "g", dec!(500.0000), dec!(0.0180))
                .unwrap();
        let response = MaterialResponse::from_material(&material);
        assert_eq!(response.stock, "500");
        assert_eq!(response.unit_cost, "0.0180");
    }
}
