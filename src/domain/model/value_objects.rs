use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// データベースの自動採番キーをラップする識別子を定義する
macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(i64);

        impl $name {
            /// 整数値から作成
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// 内部の整数値を取得
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// 原材料の一意識別子
    MaterialId
);
integer_id!(
    /// 注文の一意識別子
    OrderId
);
integer_id!(
    /// 顧客の一意識別子
    CustomerId
);
integer_id!(
    /// 生産バッチの一意識別子
    BatchId
);
integer_id!(
    /// 取引台帳エントリの一意識別子
    LedgerEntryId
);

/// クッキーコード
/// 商品の安定した識別子（1〜10文字、英数字と記号）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CookieCode(String);

impl CookieCode {
    /// コードの最大長（cookies.codeの列長）
    pub const MAX_LENGTH: usize = 10;

    /// 文字列からクッキーコードを作成
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidValue(
                "クッキーコードは空にできません".to_string(),
            ));
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidValue(format!(
                "クッキーコードは{}文字以内である必要があります: {}",
                Self::MAX_LENGTH,
                trimmed
            )));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidValue(format!(
                "クッキーコードに空白は使用できません: {}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 文字列として取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CookieCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CookieCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CookieCode> for String {
    fn from(code: CookieCode) -> Self {
        code.0
    }
}

/// クッキーのカテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookieCategory {
    /// 通年商品
    Normal,
    /// 季節限定商品
    Seasonal,
}

impl CookieCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookieCategory::Normal => "normal",
            CookieCategory::Seasonal => "seasonal",
        }
    }
}

impl fmt::Display for CookieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CookieCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(CookieCategory::Normal),
            "seasonal" => Ok(CookieCategory::Seasonal),
            _ => Err(DomainError::InvalidValue(format!(
                "無効なクッキーカテゴリ: {}",
                s
            ))),
        }
    }
}

/// 注文のステータス
/// 外部表現は pending / on_preparation / delivered / cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// 保留中（チェックアウト直後）
    Pending,
    /// 準備中（在庫引当済み）
    OnPreparation,
    /// 配達完了
    Delivered,
    /// キャンセル済み
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::OnPreparation => "on_preparation",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "on_preparation" => Ok(OrderStatus::OnPreparation),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(DomainError::InvalidValue(format!(
                "無効な注文ステータス: {}",
                s
            ))),
        }
    }
}
