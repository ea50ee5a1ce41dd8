use crate::domain::port::RepositoryError;

/// データベースエラー型
/// sqlx のエラーをアダプター層で分類する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatabaseError {
    /// データベース接続エラー（プール取得・トランザクション開始を含む）
    #[error("Database connection error: {0}")]
    ConnectionError(String),
    /// SQLクエリエラー
    #[error("Database query error: {0}")]
    QueryError(String),
    /// 行のデコード・変換エラー
    #[error("Row decode error: {0}")]
    DecodeError(String),
    /// マイグレーションエラー
    #[error("Migration error: {0}")]
    MigrationError(String),
}

impl DatabaseError {
    /// クエリ実行時の sqlx エラーを分類する
    pub fn from_query(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionError(err.to_string())
            }
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => DatabaseError::DecodeError(err.to_string()),
            _ => DatabaseError::QueryError(err.to_string()),
        }
    }
}

impl From<DatabaseError> for RepositoryError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConnectionError(msg) => RepositoryError::ConnectionFailed(msg),
            DatabaseError::QueryError(msg) | DatabaseError::MigrationError(msg) => {
                RepositoryError::OperationFailed(msg)
            }
            DatabaseError::DecodeError(msg) => RepositoryError::FetchFailed(msg),
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::from_query(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_connection_failure() {
        let err: RepositoryError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, RepositoryError::ConnectionFailed(_)));
    }

    #[test]
    fn test_missing_column_is_fetch_failure() {
        let err: RepositoryError = sqlx::Error::ColumnNotFound("stock".to_string()).into();
        assert!(matches!(err, RepositoryError::FetchFailed(_)));
    }

    #[test]
    fn test_row_not_found_is_operation_failure() {
        let err: RepositoryError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, RepositoryError::OperationFailed(_)));
    }
}
