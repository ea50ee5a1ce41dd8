use crate::domain::error::DomainError;
use crate::domain::model::{CookieCategory, CookieCode};
use rust_decimal::Decimal;

/// クッキー（完成品）エンティティ
/// 在庫はバッチ生産で増加し、注文の準備開始で減少する
#[derive(Debug, Clone, PartialEq)]
pub struct Cookie {
    code: CookieCode,
    name: String,
    description: Option<String>,
    price: Decimal,
    category: CookieCategory,
    stock: u32,
    is_active: bool,
}

impl Cookie {
    /// 新しいクッキーを作成
    /// 初期在庫は0、販売中の状態で作成される
    pub fn new(
        code: CookieCode,
        name: impl Into<String>,
        price: Decimal,
        category: CookieCategory,
    ) -> Result<Self, DomainError> {
        Self::reconstruct(code, name.into(), None, price, category, 0, true)
    }

    /// データベースから取得したデータでクッキーを再構築
    pub fn reconstruct(
        code: CookieCode,
        name: String,
        description: Option<String>,
        price: Decimal,
        category: CookieCategory,
        stock: u32,
        is_active: bool,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "クッキー名は空にできません".to_string(),
            ));
        }
        if price <= Decimal::ZERO {
            return Err(DomainError::InvalidValue(format!(
                "価格は0より大きい必要があります: {}",
                price
            )));
        }
        Ok(Self {
            code,
            name,
            description,
            price,
            category,
            stock,
            is_active,
        })
    }

    /// 説明文を設定
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 在庫数を設定（カタログ登録時）
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn code(&self) -> &CookieCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn category(&self) -> CookieCategory {
        self.category
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// 指定された数量の在庫が利用可能かチェック
    pub fn has_available_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// 在庫を引き当てる（注文の準備開始時）
    ///
    /// # Returns
    /// * `Ok(())` - 引当成功
    /// * `Err(DomainError::InsufficientStock)` - 在庫不足（在庫は変わらない）
    pub fn take_stock(&mut self, quantity: u32) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        if !self.has_available_stock(quantity) {
            return Err(DomainError::InsufficientStock {
                item: self.name.clone(),
                required: Decimal::from(quantity),
                available: Decimal::from(self.stock),
            });
        }
        self.stock -= quantity;
        Ok(())
    }

    /// 生産されたクッキーを在庫に加える
    pub fn add_stock(&mut self, quantity: u32) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        self.stock = self
            .stock
            .checked_add(quantity)
            .ok_or(DomainError::InvalidQuantity)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn oreo(stock: u32) -> Cookie {
        Cookie::new(
            CookieCode::new("OREO").unwrap(),
            "Oreo",
            dec!(389.20),
            CookieCategory::Normal,
        )
        .unwrap()
        .with_stock(stock)
    }

    #[test]
    fn test_new_cookie_starts_empty_and_active() {
        let cookie = Cookie::new(
            CookieCode::new("SMORES").unwrap(),
            "S'mores",
            dec!(431.05),
            CookieCategory::Normal,
        )
        .unwrap();
        assert_eq!(cookie.stock(), 0);
        assert!(cookie.is_active());
        assert!(cookie.description().is_none());
    }

    #[test]
    fn test_price_must_be_positive() {
        let result = Cookie::new(
            CookieCode::new("FREE").unwrap(),
            "Free",
            Decimal::ZERO,
            CookieCategory::Seasonal,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_take_stock_success() {
        let mut cookie = oreo(10);
        cookie.take_stock(4).unwrap();
        assert_eq!(cookie.stock(), 6);
    }

    #[test]
    fn test_take_stock_insufficient() {
        let mut cookie = oreo(5);
        let result = cookie.take_stock(10);
        assert_eq!(
            result.unwrap_err(),
            DomainError::InsufficientStock {
                item: "Oreo".to_string(),
                required: dec!(10),
                available: dec!(5),
            }
        );
        assert_eq!(cookie.stock(), 5); // 在庫数は変わらない
    }

    #[test]
    fn test_take_stock_zero_is_invalid() {
        let mut cookie = oreo(5);
        assert!(cookie.take_stock(0).is_err());
    }

    #[test]
    fn test_add_stock() {
        let mut cookie = oreo(0);
        cookie.add_stock(20).unwrap();
        assert_eq!(cookie.stock(), 20);
    }

    #[test]
    fn test_add_stock_overflow_is_rejected() {
        let mut cookie = oreo(u32::MAX);
        assert!(cookie.add_stock(1).is_err());
        assert_eq!(cookie.stock(), u32::MAX);
    }
}
