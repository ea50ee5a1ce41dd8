use crate::domain::error::DomainError;
use crate::domain::model::{ensure_scale, ensure_storable, validate_quantity, MaterialId};
use rust_decimal::Decimal;

/// 原材料エンティティ
/// 小麦粉・卵などの材料や、袋・ステッカーなどの包装資材の在庫を管理する
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    id: MaterialId,
    name: String,
    unit: String,
    stock: Decimal,
    unit_cost: Decimal,
}

impl Material {
    /// 原材料を作成
    ///
    /// # Arguments
    /// * `id` - 原材料ID
    /// * `name` - 名称（包装資材は名称で検索される）
    /// * `unit` - 単位（例: "g", "unidad"）
    /// * `stock` - 在庫量（0以上）
    /// * `unit_cost` - 単位あたりの原価（0以上）
    pub fn new(
        id: MaterialId,
        name: impl Into<String>,
        unit: impl Into<String>,
        stock: Decimal,
        unit_cost: Decimal,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "原材料名は空にできません".to_string(),
            ));
        }
        if stock < Decimal::ZERO {
            return Err(DomainError::InvalidValue(format!(
                "在庫量は0以上である必要があります: {}",
                stock
            )));
        }
        if unit_cost < Decimal::ZERO {
            return Err(DomainError::InvalidValue(format!(
                "単価は0以上である必要があります: {}",
                unit_cost
            )));
        }
        ensure_storable(ensure_scale(stock)?)?;
        ensure_storable(ensure_scale(unit_cost)?)?;
        Ok(Self {
            id,
            name,
            unit: unit.into(),
            stock,
            unit_cost,
        })
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn stock(&self) -> Decimal {
        self.stock
    }

    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    /// 指定量の原価を計算（数量 × 単価、丸めなし）
    pub fn cost_of(&self, quantity: Decimal) -> Result<Decimal, DomainError> {
        quantity
            .checked_mul(self.unit_cost)
            .ok_or(DomainError::InvalidQuantity)
    }

    /// 指定量の在庫が利用可能かチェック
    pub fn has_available_stock(&self, quantity: Decimal) -> bool {
        self.stock >= quantity
    }

    /// 在庫を消費する
    ///
    /// # Returns
    /// * `Ok(())` - 消費成功
    /// * `Err(DomainError::InsufficientStock)` - 在庫不足（在庫は変わらない）
    pub fn consume(&mut self, quantity: Decimal) -> Result<(), DomainError> {
        if quantity <= Decimal::ZERO {
            return Err(DomainError::InvalidQuantity);
        }
        if !self.has_available_stock(quantity) {
            return Err(DomainError::InsufficientStock {
                item: self.name.clone(),
                required: quantity,
                available: self.stock,
            });
        }
        self.stock -= quantity;
        Ok(())
    }

    /// 在庫を補充する（仕入れ時）
    /// 補充後の在庫が格納できる範囲を超える場合は在庫を変えずにエラーを返す
    pub fn restock(&mut self, quantity: Decimal) -> Result<(), DomainError> {
        let quantity = validate_quantity(quantity)?;
        let stock = self
            .stock
            .checked_add(quantity)
            .ok_or(DomainError::InvalidQuantity)?;
        self.stock = ensure_storable(stock)?;
        Ok(())
    }
}
