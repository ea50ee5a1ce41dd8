use crate::domain::error::DomainError;
use crate::domain::model::{
    Batch, BatchId, Cookie, CookieCode, CustomerId, LedgerEntry, LedgerEntryId, Material,
    MaterialId, NewBatch, NewLedgerEntry, Order, OrderId, OrderLine, OrderStatus, RecipeLine,
};
use crate::domain::port::{
    CatalogRepository, OrderRepository, RepositoryError, UnitOfWork, UnitOfWorkFactory,
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 在庫ストアの状態
#[derive(Debug, Clone, Default)]
struct StoreState {
    cookies: BTreeMap<CookieCode, Cookie>,
    materials: BTreeMap<MaterialId, Material>,
    recipe_lines: Vec<RecipeLine>,
    orders: BTreeMap<OrderId, Order>,
    batches: Vec<Batch>,
    ledger: Vec<LedgerEntry>,
    last_id: i64,
}

impl StoreState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// インメモリ在庫ストア
///
/// MySQLアダプターと同じポートを実装する。作業単位はストア全体のロックを保持し、
/// 状態のコピーに対して変更を行う。コミットでコピーを書き戻し、破棄すると変更は失われる。
/// テストやローカル実行では、カタログ管理・チェックアウトの代わりに挿入ヘルパーを使う。
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 原材料を登録する
    pub async fn insert_material(
        &self,
        name: &str,
        unit: &str,
        stock: Decimal,
        unit_cost: Decimal,
    ) -> Result<Material, DomainError> {
        let mut state = self.state.lock().await;
        if state.materials.values().any(|m| m.name() == name) {
            return Err(DomainError::InvalidValue(format!(
                "原材料名が重複しています: {}",
                name
            )));
        }
        let id = MaterialId::new(state.next_id());
        let material = Material::new(id, name, unit, stock, unit_cost)?;
        state.materials.insert(id, material.clone());
        Ok(material)
    }

    /// クッキーを登録する（同じコードは上書き）
    pub async fn insert_cookie(&self, cookie: Cookie) {
        let mut state = self.state.lock().await;
        state.cookies.insert(cookie.code().clone(), cookie);
    }

    /// レシピ明細を登録する
    pub async fn insert_recipe_line(
        &self,
        cookie_code: &CookieCode,
        material_id: MaterialId,
        consumption_per_batch: Decimal,
    ) -> Result<RecipeLine, DomainError> {
        let line = RecipeLine::new(cookie_code.clone(), material_id, consumption_per_batch)?;
        self.state.lock().await.recipe_lines.push(line.clone());
        Ok(line)
    }

    /// pending の注文を作成する（チェックアウトの代わり）
    pub async fn place_order(
        &self,
        customer_id: CustomerId,
        order_lines: Vec<OrderLine>,
    ) -> Result<Order, DomainError> {
        let mut state = self.state.lock().await;
        let id = OrderId::new(state.next_id());
        let order = Order::place(id, customer_id, order_lines, Utc::now())?;
        state.orders.insert(id, order.clone());
        Ok(order)
    }

    pub async fn cookie(&self, code: &CookieCode) -> Option<Cookie> {
        self.state.lock().await.cookies.get(code).cloned()
    }

    pub async fn material(&self, id: MaterialId) -> Option<Material> {
        self.state.lock().await.materials.get(&id).cloned()
    }

    pub async fn order(&self, id: OrderId) -> Option<Order> {
        self.state.lock().await.orders.get(&id).cloned()
    }

    pub async fn batches(&self) -> Vec<Batch> {
        self.state.lock().await.batches.clone()
    }

    /// 台帳エントリ（追記順）
    pub async fn ledger_entries(&self) -> Vec<LedgerEntry> {
        self.state.lock().await.ledger.clone()
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryInventoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork { guard, working }))
    }
}

/// インメモリの作業単位
struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn find_cookie_for_update(
        &mut self,
        code: &CookieCode,
    ) -> Result<Option<Cookie>, RepositoryError> {
        Ok(self.working.cookies.get(code).cloned())
    }

    async fn find_recipe_lines(
        &mut self,
        code: &CookieCode,
    ) -> Result<Vec<RecipeLine>, RepositoryError> {
        Ok(self
            .working
            .recipe_lines
            .iter()
            .filter(|line| line.cookie_code() == code)
            .cloned()
            .collect())
    }

    async fn find_material_for_update(
        &mut self,
        id: MaterialId,
    ) -> Result<Option<Material>, RepositoryError> {
        Ok(self.working.materials.get(&id).cloned())
    }

    async fn find_material_by_name_for_update(
        &mut self,
        name: &str,
    ) -> Result<Option<Material>, RepositoryError> {
        Ok(self
            .working
            .materials
            .values()
            .find(|m| m.name() == name)
            .cloned())
    }

    async fn find_order_for_update(
        &mut self,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        Ok(self.working.orders.get(&id).cloned())
    }

    async fn save_cookie(&mut self, cookie: &Cookie) -> Result<(), RepositoryError> {
        match self.working.cookies.get_mut(cookie.code()) {
            Some(stored) => {
                *stored = cookie.clone();
                Ok(())
            }
            None => Err(RepositoryError::OperationFailed(format!(
                "cookie {} does not exist",
                cookie.code()
            ))),
        }
    }

    async fn save_material(&mut self, material: &Material) -> Result<(), RepositoryError> {
        match self.working.materials.get_mut(&material.id()) {
            Some(stored) => {
                *stored = material.clone();
                Ok(())
            }
            None => Err(RepositoryError::OperationFailed(format!(
                "material {} does not exist",
                material.id()
            ))),
        }
    }

    async fn save_order(&mut self, order: &Order) -> Result<(), RepositoryError> {
        match self.working.orders.get_mut(&order.id()) {
            Some(stored) => {
                *stored = order.clone();
                Ok(())
            }
            None => Err(RepositoryError::OperationFailed(format!(
                "order {} does not exist",
                order.id()
            ))),
        }
    }

    async fn insert_batch(&mut self, batch: NewBatch) -> Result<Batch, RepositoryError> {
        let batch = batch.into_batch(BatchId::new(self.working.next_id()));
        self.working.batches.push(batch.clone());
        Ok(batch)
    }

    async fn append_ledger_entry(
        &mut self,
        entry: NewLedgerEntry,
    ) -> Result<LedgerEntry, RepositoryError> {
        let entry = entry.into_entry(LedgerEntryId::new(self.working.next_id()));
        self.working.ledger.push(entry.clone());
        Ok(entry)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let InMemoryUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryInventoryStore {
    async fn find_all_cookies(&self) -> Result<Vec<Cookie>, RepositoryError> {
        Ok(self.state.lock().await.cookies.values().cloned().collect())
    }

    async fn find_cookie(&self, code: &CookieCode) -> Result<Option<Cookie>, RepositoryError> {
        Ok(self.cookie(code).await)
    }

    async fn find_all_materials(&self) -> Result<Vec<Material>, RepositoryError> {
        let mut materials: Vec<Material> =
            self.state.lock().await.materials.values().cloned().collect();
        materials.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(materials)
    }

    async fn find_recipe_lines(
        &self,
        code: &CookieCode,
    ) -> Result<Vec<RecipeLine>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .recipe_lines
            .iter()
            .filter(|line| line.cookie_code() == code)
            .cloned()
            .collect())
    }

    async fn find_batches(&self) -> Result<Vec<Batch>, RepositoryError> {
        let mut batches = self.batches().await;
        batches.reverse();
        Ok(batches)
    }

    async fn find_ledger_entries(&self) -> Result<Vec<LedgerEntry>, RepositoryError> {
        let mut ledger = self.ledger_entries().await;
        ledger.reverse();
        Ok(ledger)
    }
}

#[async_trait]
impl OrderRepository for InMemoryInventoryStore {
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.order(order_id).await)
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self.state.lock().await.orders.values().cloned().collect();
        orders.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(orders)
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|order| order.status() == status)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CookieCategory;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_dropped_unit_of_work_discards_changes() {
        let store = InMemoryInventoryStore::new();
        let flour = store
            .insert_material("Harina", "g", dec!(1000), dec!(0.02))
            .await
            .unwrap();

        {
            let mut uow = store.begin().await.unwrap();
            let mut material = uow.find_material_for_update(flour.id()).await.unwrap().unwrap();
            material.consume(dec!(400)).unwrap();
            uow.save_material(&material).await.unwrap();
        }

        assert_eq!(store.material(flour.id()).await.unwrap().stock(), dec!(1000));
    }

    #[tokio::test]
    async fn test_commit_publishes_changes() {
        let store = InMemoryInventoryStore::new();
        let code = CookieCode::new("OREO").unwrap();
        store
            .insert_cookie(Cookie::new(code.clone(), "Oreo", dec!(389.20), CookieCategory::Normal).unwrap())
            .await;

        let mut uow = store.begin().await.unwrap();
        let mut cookie = uow.find_cookie_for_update(&code).await.unwrap().unwrap();
        cookie.add_stock(20).unwrap();
        uow.save_cookie(&cookie).await.unwrap();
        uow.commit().await.unwrap();

        assert_eq!(store.cookie(&code).await.unwrap().stock(), 20);
    }

    #[tokio::test]
    async fn test_duplicate_material_name_is_rejected() {
        let store = InMemoryInventoryStore::new();
        store
            .insert_material("Sticker", "unidad", dec!(5), dec!(0.60))
            .await
            .unwrap();
        let result = store
            .insert_material("Sticker", "unidad", dec!(5), dec!(0.60))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_saving_unknown_material_fails() {
        let store = InMemoryInventoryStore::new();
        let ghost = Material::new(MaterialId::new(77), "Ghost", "g", dec!(1), dec!(1)).unwrap();

        let mut uow = store.begin().await.unwrap();
        let result = uow.save_material(&ghost).await;

        assert!(matches!(result, Err(RepositoryError::OperationFailed(_))));
    }
}
