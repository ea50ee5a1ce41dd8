use crate::domain::error::DomainError;
use crate::domain::model::{validate_quantity, CookieCode, MaterialId};
use rust_decimal::Decimal;

/// レシピ明細を表す値オブジェクト
/// 1バッチの生産で消費する原材料とその量
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeLine {
    cookie_code: CookieCode,
    material_id: MaterialId,
    consumption_per_batch: Decimal,
}

impl RecipeLine {
    /// 新しいレシピ明細を作成
    /// 消費量は0より大きく、小数4桁以内である必要がある
    pub fn new(
        cookie_code: CookieCode,
        material_id: MaterialId,
        consumption_per_batch: Decimal,
    ) -> Result<Self, DomainError> {
        let consumption_per_batch = validate_quantity(consumption_per_batch)?;
        Ok(Self {
            cookie_code,
            material_id,
            consumption_per_batch,
        })
    }

    pub fn cookie_code(&self) -> &CookieCode {
        &self.cookie_code
    }

    pub fn material_id(&self) -> MaterialId {
        self.material_id
    }

    pub fn consumption_per_batch(&self) -> Decimal {
        self.consumption_per_batch
    }
}
