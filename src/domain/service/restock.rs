use crate::domain::error::{DomainError, EntityKind};
use crate::domain::model::{validate_quantity, Material, MaterialId, NewLedgerEntry};
use crate::domain::port::UnitOfWork;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// 原材料の仕入れサービス
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialRestockService;

impl MaterialRestockService {
    pub fn new() -> Self {
        Self
    }

    /// 原材料の在庫を補充し、仕入れを台帳に記録する
    /// 数量は0より大きく小数4桁以内、補充後の在庫と仕入れ金額は格納できる範囲であること
    pub async fn restock(
        &self,
        uow: &mut dyn UnitOfWork,
        material_id: MaterialId,
        quantity: Decimal,
        restocked_at: DateTime<Utc>,
    ) -> Result<Material, DomainError> {
        let quantity = validate_quantity(quantity)?;

        let mut material = uow
            .find_material_for_update(material_id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Material, material_id))?;

        material.restock(quantity)?;
        let purchase = NewLedgerEntry::material_purchase(&material, quantity, restocked_at)?;
        uow.save_material(&material).await?;
        uow.append_ledger_entry(purchase).await?;

        Ok(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::driven::InMemoryInventoryStore;
    use crate::domain::model::LedgerEntryKind;
    use crate::domain::port::UnitOfWorkFactory;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_restock_adds_stock_and_records_purchase() {
        let store = InMemoryInventoryStore::new();
        let eggs = store
            .insert_material("Huevo", "unidad", dec!(2), dec!(5.5))
            .await
            .unwrap();

        let mut uow = store.begin().await.unwrap();
        let restocked = MaterialRestockService::new()
            .restock(uow.as_mut(), eggs.id(), dec!(12), Utc::now())
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(restocked.stock(), dec!(14));
        let ledger = store.ledger_entries().await;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].kind, LedgerEntryKind::MaterialPurchase);
        assert_eq!(ledger[0].amount, dec!(66.0));
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected() {
        let store = InMemoryInventoryStore::new();
        let eggs = store
            .insert_material("Huevo", "unidad", dec!(2), dec!(5.5))
            .await
            .unwrap();

        let mut uow = store.begin().await.unwrap();
        let result = MaterialRestockService::new()
            .restock(uow.as_mut(), eggs.id(), dec!(0), Utc::now())
            .await;

        assert_eq!(result.unwrap_err(), DomainError::InvalidQuantity);
    }

    #[tokio::test]
    async fn test_overflowing_quantity_is_rejected() {
        let store = InMemoryInventoryStore::new();
        let bag = store
            .insert_material("Small Bag", "unidad", dec!(5), dec!(1.50))
            .await
            .unwrap();

        let mut uow = store.begin().await.unwrap();
        let result = MaterialRestockService::new()
            .restock(uow.as_mut(), bag.id(), Decimal::MAX, Utc::now())
            .await;

        assert_eq!(result.unwrap_err(), DomainError::InvalidQuantity);
    }

    #[tokio::test]
    async fn test_quantity_finer_than_stored_precision_is_rejected() {
        let store = InMemoryInventoryStore::new();
        let flour = store
            .insert_material("Harina", "g", dec!(1000), dec!(0.0185))
            .await
            .unwrap();

        let mut uow = store.begin().await.unwrap();
        let result = MaterialRestockService::new()
            .restock(uow.as_mut(), flour.id(), dec!(0.00001), Utc::now())
            .await;

        assert!(matches!(result, Err(DomainError::InvalidValue(_))));
    }

    #[tokio::test]
    async fn test_purchase_amount_matches_stored_precision() {
        let store = InMemoryInventoryStore::new();
        let flour = store
            .insert_material("Harina", "g", dec!(1000), dec!(0.0185))
            .await
            .unwrap();

        let mut uow = store.begin().await.unwrap();
        let restocked = MaterialRestockService::new()
            .restock(uow.as_mut(), flour.id(), dec!(0.3333), Utc::now())
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(restocked.stock(), dec!(1000.3333));
        assert_eq!(store.ledger_entries().await[0].amount, dec!(0.0062));
    }

    #[tokio::test]
    async fn test_unknown_material_is_not_found() {
        let store = InMemoryInventoryStore::new();
        let mut uow = store.begin().await.unwrap();

        let result = MaterialRestockService::new()
            .restock(uow.as_mut(), MaterialId::new(42), dec!(1), Utc::now())
            .await;

        assert_eq!(
            result.unwrap_err(),
            DomainError::not_found(EntityKind::Material, 42)
        );
    }
}
