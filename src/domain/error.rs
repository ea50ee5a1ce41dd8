use crate::domain::port::RepositoryError;
use rust_decimal::Decimal;
use std::fmt;

/// 参照先のエンティティ種別
/// NotFoundエラーの対象を区別するために使用する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Cookie,
    Material,
    Order,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Cookie => "cookie",
            EntityKind::Material => "material",
            EntityKind::Order => "order",
        };
        write!(f, "{}", name)
    }
}

/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// 参照されたエンティティが存在しない
    #[error("{entity} not found: {key}")]
    NotFound { entity: EntityKind, key: String },
    /// クッキーにレシピが定義されていない
    #[error("cookie '{0}' has no recipe defined")]
    NoRecipe(String),
    /// 在庫不足（品目名、必要数、現在庫）
    #[error("insufficient stock of {item}: required {required}, available {available}")]
    InsufficientStock {
        item: String,
        required: Decimal,
        available: Decimal,
    },
    /// 無効な数量（例: 0以下の数量）
    #[error("invalid quantity")]
    InvalidQuantity,
    /// 無効な値
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// 作業単位内での永続化の失敗
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl DomainError {
    /// NotFoundエラーを作成
    pub fn not_found(entity: EntityKind, key: impl fmt::Display) -> Self {
        DomainError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}
