// MySQLの行からドメインオブジェクトを再構築するヘルパー

use crate::domain::model::{
    BagSize, Batch, BatchId, Cookie, CookieCategory, CookieCode, CustomerId, LedgerEntry,
    LedgerEntryId, LedgerEntryKind, Material, MaterialId, Order, OrderId, OrderLine, OrderStatus,
    RecipeLine,
};
use crate::domain::port::RepositoryError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use std::fmt::Display;

pub(super) const COOKIE_COLUMNS: &str =
    "code, name, description, price, category, stock, is_active";
pub(super) const MATERIAL_COLUMNS: &str = "id, name, unit, stock, unit_cost";
pub(super) const RECIPE_COLUMNS: &str = "cookie_code, material_id, consumption_per_batch";
pub(super) const ORDER_COLUMNS: &str = "id, customer_id, status, bag, sticker, created_at, updated_at";
pub(super) const ORDER_LINE_COLUMNS: &str = "cookie_code, qty, unit_price";

/// ドメインの検証エラーを取得失敗として扱う
fn invalid(what: &str, err: impl Display) -> RepositoryError {
    RepositoryError::FetchFailed(format!("{}の再構築に失敗しました: {}", what, err))
}

fn cookie_code(row: &MySqlRow, column: &str) -> Result<CookieCode, RepositoryError> {
    CookieCode::new(row.try_get::<String, _>(column)?).map_err(|e| invalid("クッキーコード", e))
}

pub(super) fn cookie_from_row(row: &MySqlRow) -> Result<Cookie, RepositoryError> {
    let category: CookieCategory = row
        .try_get::<String, _>("category")?
        .parse()
        .map_err(|e| invalid("カテゴリ", e))?;

    Cookie::reconstruct(
        cookie_code(row, "code")?,
        row.try_get("name")?,
        row.try_get("description")?,
        row.try_get("price")?,
        category,
        row.try_get("stock")?,
        row.try_get("is_active")?,
    )
    .map_err(|e| invalid("クッキー", e))
}

pub(super) fn material_from_row(row: &MySqlRow) -> Result<Material, RepositoryError> {
    Material::new(
        MaterialId::new(row.try_get("id")?),
        row.try_get::<String, _>("name")?,
        row.try_get::<String, _>("unit")?,
        row.try_get("stock")?,
        row.try_get("unit_cost")?,
    )
    .map_err(|e| invalid("原材料", e))
}

pub(super) fn recipe_line_from_row(row: &MySqlRow) -> Result<RecipeLine, RepositoryError> {
    RecipeLine::new(
        cookie_code(row, "cookie_code")?,
        MaterialId::new(row.try_get("material_id")?),
        row.try_get("consumption_per_batch")?,
    )
    .map_err(|e| invalid("レシピ明細", e))
}

pub(super) fn order_line_from_row(row: &MySqlRow) -> Result<OrderLine, RepositoryError> {
    OrderLine::new(
        cookie_code(row, "cookie_code")?,
        row.try_get("qty")?,
        row.try_get("unit_price")?,
    )
    .map_err(|e| invalid("注文明細", e))
}

/// 注文行と明細から注文を再構築する
pub(super) fn order_from_row(
    row: &MySqlRow,
    order_lines: Vec<OrderLine>,
) -> Result<Order, RepositoryError> {
    let status: OrderStatus = row
        .try_get::<String, _>("status")?
        .parse()
        .map_err(|e| invalid("注文ステータス", e))?;
    let bag = row
        .try_get::<Option<String>, _>("bag")?
        .map(|bag| bag.parse::<BagSize>())
        .transpose()
        .map_err(|e| invalid("袋サイズ", e))?;

    Ok(Order::reconstruct(
        OrderId::new(row.try_get("id")?),
        CustomerId::new(row.try_get("customer_id")?),
        order_lines,
        status,
        bag,
        row.try_get("sticker")?,
        row.try_get("created_at")?,
        row.try_get("updated_at")?,
    ))
}

pub(super) fn batch_from_row(row: &MySqlRow) -> Result<Batch, RepositoryError> {
    Ok(Batch::reconstruct(
        BatchId::new(row.try_get("id")?),
        cookie_code(row, "cookie_code")?,
        row.try_get("qty_made")?,
        row.try_get("total_cost")?,
        row.try_get("produced_at")?,
    ))
}

pub(super) fn ledger_entry_from_row(row: &MySqlRow) -> Result<LedgerEntry, RepositoryError> {
    let kind: LedgerEntryKind = row
        .try_get::<String, _>("transaction_type")?
        .parse()
        .map_err(|e| invalid("取引種別", e))?;
    let amount: Decimal = row.try_get("amount")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(LedgerEntry {
        id: LedgerEntryId::new(row.try_get("id")?),
        kind,
        amount,
        description: row
            .try_get::<Option<String>, _>("description")?
            .unwrap_or_default(),
        order_id: row.try_get::<Option<i64>, _>("order_id")?.map(OrderId::new),
        batch_id: row.try_get::<Option<i64>, _>("batch_id")?.map(BatchId::new),
        material_id: row
            .try_get::<Option<i64>, _>("material_id")?
            .map(MaterialId::new),
        created_at,
    })
}
