// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{
    Batch, Cookie, CookieCode, LedgerEntry, Material, MaterialId, NewBatch, NewLedgerEntry,
    Order, OrderId, OrderStatus, RecipeLine,
};
use async_trait::async_trait;

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続やトランザクション開始に失敗
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// 操作に失敗
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    /// データの取得に失敗
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
}

/// 作業単位
/// 1回のエンジン操作の読み書きをすべて1つのトランザクションで行う
///
/// `*_for_update` で読み込んだ行はコミットまたはロールバックまで他の作業単位から保護される。
/// コミットせずに破棄された作業単位の変更は反映されない。
#[async_trait]
pub trait UnitOfWork: Send {
    /// クッキーを更新用に取得する
    async fn find_cookie_for_update(
        &mut self,
        code: &CookieCode,
    ) -> Result<Option<Cookie>, RepositoryError>;

    /// クッキーのレシピ明細を取得する
    async fn find_recipe_lines(
        &mut self,
        code: &CookieCode,
    ) -> Result<Vec<RecipeLine>, RepositoryError>;

    /// 原材料をIDで更新用に取得する
    async fn find_material_for_update(
        &mut self,
        id: MaterialId,
    ) -> Result<Option<Material>, RepositoryError>;

    /// 原材料を名称で更新用に取得する（包装資材の検索に使用）
    async fn find_material_by_name_for_update(
        &mut self,
        name: &str,
    ) -> Result<Option<Material>, RepositoryError>;

    /// 注文を明細とともに更新用に取得する
    async fn find_order_for_update(
        &mut self,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError>;

    /// クッキーの在庫を保存する
    async fn save_cookie(&mut self, cookie: &Cookie) -> Result<(), RepositoryError>;

    /// 原材料の在庫を保存する
    async fn save_material(&mut self, material: &Material) -> Result<(), RepositoryError>;

    /// 注文のステータスと包装を保存する（明細は変更しない）
    async fn save_order(&mut self, order: &Order) -> Result<(), RepositoryError>;

    /// 生産記録を挿入し、採番されたバッチを返す
    async fn insert_batch(&mut self, batch: NewBatch) -> Result<Batch, RepositoryError>;

    /// 取引台帳にエントリを追記する
    async fn append_ledger_entry(
        &mut self,
        entry: NewLedgerEntry,
    ) -> Result<LedgerEntry, RepositoryError>;

    /// すべての変更を確定する
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    /// すべての変更を破棄する
    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}

/// 作業単位の生成
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 新しいトランザクションを開始する
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError>;
}

/// カタログリポジトリトレイト
/// クッキー・原材料・レシピ・生産履歴・台帳の読み取り専用クエリ
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// すべてのクッキーをコードの昇順で取得する
    async fn find_all_cookies(&self) -> Result<Vec<Cookie>, RepositoryError>;

    /// コードでクッキーを検索する
    async fn find_cookie(&self, code: &CookieCode) -> Result<Option<Cookie>, RepositoryError>;

    /// すべての原材料を名称の昇順で取得する
    async fn find_all_materials(&self) -> Result<Vec<Material>, RepositoryError>;

    /// クッキーのレシピ明細を取得する
    async fn find_recipe_lines(
        &self,
        code: &CookieCode,
    ) -> Result<Vec<RecipeLine>, RepositoryError>;

    /// 生産履歴を生産日時の降順で取得する
    async fn find_batches(&self) -> Result<Vec<Batch>, RepositoryError>;

    /// 取引台帳を新しい順に取得する
    async fn find_ledger_entries(&self) -> Result<Vec<LedgerEntry>, RepositoryError>;
}

/// 注文リポジトリトレイト
/// 注文の読み取り専用クエリ（作成はチェックアウト側の責務）
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 注文IDで注文を検索する
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// すべての注文を作成日時の降順で取得する
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// 指定されたステータスの注文を作成日時の降順で取得する
    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, RepositoryError>;
}
