use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ステッカー資材のカタログ名
pub const STICKER_MATERIAL_NAME: &str = "Sticker";

/// 中袋とステッカーが必要になる合計数量
pub const MEDIUM_BAG_THRESHOLD: u64 = 3;

/// 袋のサイズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BagSize {
    Small,
    Medium,
}

impl BagSize {
    /// 注文に記録される値
    pub fn as_str(&self) -> &'static str {
        match self {
            BagSize::Small => "small",
            BagSize::Medium => "medium",
        }
    }

    /// 在庫から引き落とす包装資材のカタログ名
    pub fn material_name(&self) -> &'static str {
        match self {
            BagSize::Small => "Small Bag",
            BagSize::Medium => "Medium Bag",
        }
    }
}

impl fmt::Display for BagSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BagSize {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(BagSize::Small),
            "medium" => Ok(BagSize::Medium),
            _ => Err(DomainError::InvalidValue(format!("無効な袋サイズ: {}", s))),
        }
    }
}

/// 注文に必要な包装
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packaging {
    pub bag: BagSize,
    pub sticker: bool,
}

/// 注文の合計数量から包装を決定する
/// 2個以下は小袋のみ、3個以上は中袋とステッカー
pub fn derive_packaging(total_quantity: u64) -> Packaging {
    if total_quantity >= MEDIUM_BAG_THRESHOLD {
        Packaging {
            bag: BagSize::Medium,
            sticker: true,
        }
    } else {
        Packaging {
            bag: BagSize::Small,
            sticker: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_cookies_get_small_bag_without_sticker() {
        assert_eq!(
            derive_packaging(2),
            Packaging {
                bag: BagSize::Small,
                sticker: false
            }
        );
    }

    #[test]
    fn test_three_cookies_get_medium_bag_with_sticker() {
        assert_eq!(
            derive_packaging(3),
            Packaging {
                bag: BagSize::Medium,
                sticker: true
            }
        );
    }

    #[test]
    fn test_single_cookie_and_large_order() {
        assert_eq!(derive_packaging(1).bag, BagSize::Small);
        assert_eq!(derive_packaging(48).bag, BagSize::Medium);
        assert!(derive_packaging(48).sticker);
    }

    #[test]
    fn test_bag_material_names() {
        assert_eq!(BagSize::Small.material_name(), "Small Bag");
        assert_eq!(BagSize::Medium.material_name(), "Medium Bag");
    }

    #[test]
    fn test_bag_size_from_str() {
        assert_eq!("medium".parse::<BagSize>().unwrap(), BagSize::Medium);
        assert!("Medium Bag".parse::<BagSize>().is_err());
    }
}
