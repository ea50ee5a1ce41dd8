use crate::domain::error::{DomainError, EntityKind};
use crate::domain::model::{
    ensure_storable, round_to_storage, Batch, CookieCode, Material, MaterialId, NewBatch,
    NewLedgerEntry, FIXED_BATCH_SIZE,
};
use crate::domain::port::UnitOfWork;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// バッチ生産サービス
/// レシピに従って原材料を消費し、クッキーの在庫を増やす
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchProductionService;

impl BatchProductionService {
    pub fn new() -> Self {
        Self
    }

    /// 1バッチ分のクッキーを生産する
    ///
    /// 検証の順序: クッキーの存在 → レシピの存在 → すべての原材料の在庫。
    /// いずれかの検証に失敗した場合は何も保存せずにエラーを返す。
    ///
    /// # Arguments
    /// * `uow` - 作業単位
    /// * `cookie_code` - 生産するクッキーのコード
    /// * `produced_at` - 生産日時
    ///
    /// # Returns
    /// * `Ok(Batch)` - 記録された生産バッチ
    /// * `Err(DomainError)` - 生産失敗（クッキー不在、レシピ未定義、在庫不足など）
    pub async fn produce(
        &self,
        uow: &mut dyn UnitOfWork,
        cookie_code: &CookieCode,
        produced_at: DateTime<Utc>,
    ) -> Result<Batch, DomainError> {
        let mut cookie = uow
            .find_cookie_for_update(cookie_code)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Cookie, cookie_code))?;

        let recipe_lines = uow.find_recipe_lines(cookie_code).await?;
        if recipe_lines.is_empty() {
            return Err(DomainError::NoRecipe(cookie_code.to_string()));
        }

        // 同じ原材料が複数行に現れる場合は合算し、ID順にロックする
        let mut requirements: BTreeMap<MaterialId, Decimal> = BTreeMap::new();
        for line in &recipe_lines {
            let required = requirements.entry(line.material_id()).or_default();
            *required = required
                .checked_add(line.consumption_per_batch())
                .ok_or(DomainError::InvalidQuantity)?;
        }

        let mut materials: Vec<Material> = Vec::with_capacity(requirements.len());
        let mut total_cost = Decimal::ZERO;
        for (material_id, required) in &requirements {
            let mut material = uow
                .find_material_for_update(*material_id)
                .await?
                .ok_or_else(|| DomainError::not_found(EntityKind::Material, material_id))?;

            // 原価は消費前の単価で計算する
            total_cost = total_cost
                .checked_add(material.cost_of(*required)?)
                .ok_or(DomainError::InvalidQuantity)?;
            material.consume(*required)?;
            materials.push(material);
        }
        // 保存される原価と同じ精度に丸める
        let total_cost = ensure_storable(round_to_storage(total_cost))?;

        cookie.add_stock(FIXED_BATCH_SIZE)?;

        for material in &materials {
            uow.save_material(material).await?;
        }
        uow.save_cookie(&cookie).await?;

        let batch = uow
            .insert_batch(NewBatch::new(cookie_code.clone(), total_cost, produced_at))
            .await?;
        uow.append_ledger_entry(NewLedgerEntry::production(&batch))
            .await?;

        tracing::debug!(
            batch_id = %batch.id(),
            cookie_code = %cookie_code,
            total_cost = %total_cost,
            "batch produced"
        );

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::driven::InMemoryInventoryStore;
    use crate::domain::model::{Cookie, CookieCategory};
    use crate::domain::port::UnitOfWorkFactory;
    use rust_decimal_macros::dec;

    async fn store_with_cookie(code: &str) -> (InMemoryInventoryStore, CookieCode) {
        let store = InMemoryInventoryStore::new();
        let code = CookieCode::new(code).unwrap();
        store
            .insert_cookie(
                Cookie::new(code.clone(), "Chips Ahoy", dec!(350), CookieCategory::Normal)
                    .unwrap(),
            )
            .await;
        (store, code)
    }

    #[tokio::test]
    async fn test_unknown_cookie_is_not_found() {
        let store = InMemoryInventoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let code = CookieCode::new("NOPE").unwrap();

        let result = BatchProductionService::new()
            .produce(uow.as_mut(), &code, Utc::now())
            .await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                entity: EntityKind::Cookie,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_cookie_without_recipe_fails() {
        let (store, code) = store_with_cookie("CHIPS").await;
        let mut uow = store.begin().await.unwrap();

        let result = BatchProductionService::new()
            .produce(uow.as_mut(), &code, Utc::now())
            .await;

        assert_eq!(result.unwrap_err(), DomainError::NoRecipe("CHIPS".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_recipe_lines_are_aggregated() {
        let (store, code) = store_with_cookie("CHIPS").await;
        let butter = store
            .insert_material("Mantequilla", "g", dec!(100), dec!(0.1))
            .await
            .unwrap();
        store
            .insert_recipe_line(&code, butter.id(), dec!(40))
            .await
            .unwrap();
        store
            .insert_recipe_line(&code, butter.id(), dec!(40))
            .await
            .unwrap();

        let mut uow = store.begin().await.unwrap();
        let batch = BatchProductionService::new()
            .produce(uow.as_mut(), &code, Utc::now())
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(batch.total_cost(), dec!(8.0));
        let butter = store.material(butter.id()).await.unwrap();
        assert_eq!(butter.stock(), dec!(20));
    }

    #[tokio::test]
    async fn test_batch_cost_is_rounded_to_stored_precision() {
        let (store, code) = store_with_cookie("CHIPS").await;
        let vanilla = store
            .insert_material("Vainilla", "ml", dec!(100), dec!(0.0185))
            .await
            .unwrap();
        let salt = store
            .insert_material("Sal", "g", dec!(100), dec!(0.0001))
            .await
            .unwrap();
        store
            .insert_recipe_line(&code, vanilla.id(), dec!(3.3333))
            .await
            .unwrap();
        store
            .insert_recipe_line(&code, salt.id(), dec!(0.5))
            .await
            .unwrap();

        let mut uow = store.begin().await.unwrap();
        let batch = BatchProductionService::new()
            .produce(uow.as_mut(), &code, Utc::now())
            .await
            .unwrap();
        uow.commit().await.unwrap();

        // 0.06166605 + 0.00005 = 0.06171605
        assert_eq!(batch.total_cost(), dec!(0.0617));
        assert!(batch.total_cost().scale() <= 4);
        let ledger = store.ledger_entries().await;
        assert_eq!(ledger[0].amount, batch.total_cost());
        let history = store.batches().await;
        assert_eq!(history[0].total_cost(), batch.total_cost());
    }

    #[tokio::test]
    async fn test_production_appends_ledger_entry() {
        let (store, code) = store_with_cookie("CHIPS").await;
        let flour = store
            .insert_material("Harina", "g", dec!(1000), dec!(0.02))
            .await
            .unwrap();
        store
            .insert_recipe_line(&code, flour.id(), dec!(250))
            .await
            .unwrap();

        let mut uow = store.begin().await.unwrap();
        let batch = BatchProductionService::new()
            .produce(uow.as_mut(), &code, Utc::now())
            .await
            .unwrap();
        uow.commit().await.unwrap();

        let ledger = store.ledger_entries().await;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].batch_id, Some(batch.id()));
        assert_eq!(ledger[0].amount, dec!(5.00));
    }
}
