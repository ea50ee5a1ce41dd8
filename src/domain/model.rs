// ドメインモデル（エンティティと値オブジェクト）

mod batch;
mod cookie;
mod ledger;
mod material;
mod order;
mod packaging;
mod quantity;
mod recipe;
mod value_objects;

pub use value_objects::{
    BatchId, CookieCategory, CookieCode, CustomerId, LedgerEntryId, MaterialId, OrderId,
    OrderStatus,
};

pub use batch::{Batch, NewBatch, FIXED_BATCH_SIZE};
pub use cookie::Cookie;
pub use ledger::{LedgerEntry, LedgerEntryKind, NewLedgerEntry};
pub use material::Material;
pub use order::{Order, OrderLine, StatusTransition};
pub use packaging::{derive_packaging, BagSize, Packaging, MEDIUM_BAG_THRESHOLD, STICKER_MATERIAL_NAME};
pub use quantity::{
    ensure_scale, ensure_storable, max_storable, round_to_storage, validate_quantity,
    STORAGE_SCALE,
};
pub use recipe::RecipeLine;
