// 駆動される側アダプター（作業単位・リポジトリ実装）

mod in_memory_store;
mod mysql_catalog_repository;
mod mysql_order_repository;
mod mysql_rows;
mod mysql_unit_of_work;

pub use in_memory_store::InMemoryInventoryStore;
pub use mysql_catalog_repository::MySqlCatalogRepository;
pub use mysql_order_repository::MySqlOrderRepository;
pub use mysql_unit_of_work::{MySqlUnitOfWork, MySqlUnitOfWorkFactory};
