// ドメインサービス
// 複数の集約にまたがるビジネスロジックを実装
// すべての読み書きは呼び出し側が渡す作業単位の中で行い、コミットは呼び出し側の責務

mod fulfillment;
mod production;
mod restock;

pub use fulfillment::OrderFulfillmentService;
pub use production::BatchProductionService;
pub use restock::MaterialRestockService;
