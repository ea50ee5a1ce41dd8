use crate::domain::error::DomainError;
use rust_decimal::{Decimal, RoundingStrategy};

/// 原材料の数量・原価・台帳金額の小数点以下の桁数（DECIMAL(12, 4)）
pub const STORAGE_SCALE: u32 = 4;

/// DECIMAL(12, 4) に格納できる最大値（99999999.9999）
pub fn max_storable() -> Decimal {
    Decimal::new(999_999_999_999, STORAGE_SCALE)
}

/// 入力された数量を検証する
/// 0より大きく、小数4桁以内で、列に格納できる範囲であること
pub fn validate_quantity(quantity: Decimal) -> Result<Decimal, DomainError> {
    if quantity <= Decimal::ZERO {
        return Err(DomainError::InvalidQuantity);
    }
    ensure_scale(quantity)?;
    ensure_storable(quantity)
}

/// 小数点以下の桁数が格納精度を超えていないか検証する
pub fn ensure_scale(value: Decimal) -> Result<Decimal, DomainError> {
    if value.normalize().scale() > STORAGE_SCALE {
        return Err(DomainError::InvalidValue(format!(
            "小数点以下は{}桁までです: {}",
            STORAGE_SCALE, value
        )));
    }
    Ok(value)
}

/// 値が列に格納できる範囲か検証する
pub fn ensure_storable(value: Decimal) -> Result<Decimal, DomainError> {
    if value.abs() > max_storable() {
        return Err(DomainError::InvalidQuantity);
    }
    Ok(value)
}

/// 計算結果を格納精度に丸める
/// MySQLのDECIMALと同じく、ちょうど半分は0から遠い方へ丸める
pub fn round_to_storage(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(STORAGE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(dec!(12.5)), Ok(dec!(12.5)));
        assert_eq!(validate_quantity(dec!(0.0001)), Ok(dec!(0.0001)));
        assert_eq!(validate_quantity(dec!(0)), Err(DomainError::InvalidQuantity));
        assert_eq!(validate_quantity(dec!(-3)), Err(DomainError::InvalidQuantity));
    }

    #[test]
    fn test_more_than_four_decimals_is_rejected() {
        assert!(matches!(
            validate_quantity(dec!(0.00001)),
            Err(DomainError::InvalidValue(_))
        ));
        // 末尾の0は桁数に数えない
        assert_eq!(validate_quantity(dec!(1.500000)), Ok(dec!(1.500000)));
    }

    #[test]
    fn test_values_beyond_the_column_are_rejected() {
        assert!(validate_quantity(max_storable()).is_ok());
        assert_eq!(
            validate_quantity(dec!(100000000)),
            Err(DomainError::InvalidQuantity)
        );
        assert_eq!(
            validate_quantity(Decimal::MAX),
            Err(DomainError::InvalidQuantity)
        );
    }

    #[test]
    fn test_rounding_matches_mysql_decimal() {
        assert_eq!(round_to_storage(dec!(0.06166605)), dec!(0.0617));
        assert_eq!(round_to_storage(dec!(0.00005)), dec!(0.0001));
        assert_eq!(round_to_storage(dec!(0.00015)), dec!(0.0002));
        assert_eq!(round_to_storage(dec!(9.000)), dec!(9.000));
    }
}
