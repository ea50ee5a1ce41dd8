use crate::domain::error::{DomainError, EntityKind};
use crate::domain::port::RepositoryError;
use rust_decimal::Decimal;

/// アプリケーション層のエラー型
/// 呼び出し側が区別して扱えるようにドメインエラーとリポジトリエラーを分類する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplicationError {
    /// エンティティが見つからない
    #[error("Not found: {0}")]
    NotFound(String),
    /// クッキーにレシピが定義されていない
    #[error("No recipe: cookie '{0}' has no recipe defined")]
    NoRecipe(String),
    /// 在庫不足（在庫を補充してから同じ操作を再試行できる）
    #[error("Insufficient stock of {item}: required {required}, available {available}")]
    InsufficientStock {
        item: String,
        required: Decimal,
        available: Decimal,
    },
    /// 入力値が不正
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// 永続化の失敗（作業単位はロールバック済み）
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

impl ApplicationError {
    /// 利用者に表示して操作を続けられる業務上のエラーか
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ApplicationError::InsufficientStock { .. })
    }

    /// 同じ操作をそのまま再試行してよいか
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::InsufficientStock { .. } | ApplicationError::TransactionFailed(_)
        )
    }
}

// From実装でエラー変換を簡潔に
impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity, key } => {
                ApplicationError::NotFound(format!("{} {}", entity, key))
            }
            DomainError::NoRecipe(code) => ApplicationError::NoRecipe(code),
            DomainError::InsufficientStock {
                item,
                required,
                available,
            } => ApplicationError::InsufficientStock {
                item,
                required,
                available,
            },
            DomainError::InvalidQuantity => {
                ApplicationError::InvalidInput("quantity must be greater than zero".to_string())
            }
            DomainError::InvalidValue(msg) => ApplicationError::InvalidInput(msg),
            DomainError::Repository(err) => err.into(),
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        ApplicationError::TransactionFailed(err.to_string())
    }
}

impl ApplicationError {
    /// エンティティ不在のエラーを作成
    pub(crate) fn not_found(entity: EntityKind, key: impl std::fmt::Display) -> Self {
        DomainError::not_found(entity, key).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_stock_is_recoverable_and_retryable() {
        let err: ApplicationError = DomainError::InsufficientStock {
            item: "Oreo".to_string(),
            required: dec!(10),
            available: dec!(5),
        }
        .into();
        assert!(err.is_recoverable());
        assert!(err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Insufficient stock of Oreo: required 10, available 5"
        );
    }

    #[test]
    fn test_repository_error_becomes_transaction_failure() {
        let err: ApplicationError =
            DomainError::Repository(RepositoryError::OperationFailed("deadlock".to_string()))
                .into();
        assert!(matches!(err, ApplicationError::TransactionFailed(_)));
        assert!(!err.is_recoverable());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_not_found_and_no_recipe_are_not_retryable() {
        let not_found = ApplicationError::not_found(EntityKind::Order, 7);
        assert_eq!(not_found, ApplicationError::NotFound("order 7".to_string()));
        assert!(!not_found.is_retryable());

        let no_recipe: ApplicationError = DomainError::NoRecipe("OREO".to_string()).into();
        assert!(!no_recipe.is_retryable());
        assert!(!no_recipe.is_recoverable());
    }
}
