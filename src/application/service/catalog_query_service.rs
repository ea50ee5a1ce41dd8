use crate::application::ApplicationError;
use crate::domain::error::EntityKind;
use crate::domain::model::{Batch, Cookie, CookieCode, LedgerEntry, Material, RecipeLine};
use crate::domain::port::CatalogRepository;
use std::sync::Arc;

/// クッキーとそのレシピ
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeView {
    pub cookie: Cookie,
    pub lines: Vec<(RecipeLine, Material)>,
}

/// カタログクエリサービス
/// クッキー・原材料・生産履歴・取引台帳の参照
pub struct CatalogQueryService {
    catalog_repository: Arc<dyn CatalogRepository>,
}

impl CatalogQueryService {
    pub fn new(catalog_repository: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog_repository }
    }

    /// すべてのクッキー（コード順）
    pub async fn list_cookies(&self) -> Result<Vec<Cookie>, ApplicationError> {
        Ok(self.catalog_repository.find_all_cookies().await?)
    }

    /// すべての原材料（名称順）
    pub async fn list_materials(&self) -> Result<Vec<Material>, ApplicationError> {
        Ok(self.catalog_repository.find_all_materials().await?)
    }

    /// クッキーのレシピを原材料とともに取得
    ///
    /// # Returns
    /// * `Ok(RecipeView)` - レシピ（明細がない場合は空）
    /// * `Err(ApplicationError::NotFound)` - クッキーが存在しない
    pub async fn get_recipe(&self, code: &CookieCode) -> Result<RecipeView, ApplicationError> {
        let cookie = self
            .catalog_repository
            .find_cookie(code)
            .await?
            .ok_or_else(|| ApplicationError::not_found(EntityKind::Cookie, code))?;

        let materials = self.catalog_repository.find_all_materials().await?;
        let lines = self
            .catalog_repository
            .find_recipe_lines(code)
            .await?
            .into_iter()
            .map(|line| {
                materials
                    .iter()
                    .find(|m| m.id() == line.material_id())
                    .cloned()
                    .map(|material| (line.clone(), material))
                    .ok_or_else(|| {
                        ApplicationError::not_found(EntityKind::Material, line.material_id())
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RecipeView { cookie, lines })
    }

    /// 生産履歴（新しい順）
    pub async fn list_batches(&self) -> Result<Vec<Batch>, ApplicationError> {
        Ok(self.catalog_repository.find_batches().await?)
    }

    /// 取引台帳（新しい順）
    pub async fn list_ledger_entries(&self) -> Result<Vec<LedgerEntry>, ApplicationError> {
        Ok(self.catalog_repository.find_ledger_entries().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::driven::InMemoryInventoryStore;
    use crate::domain::model::CookieCategory;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_recipe_is_joined_with_materials() {
        let store = InMemoryInventoryStore::new();
        let code = CookieCode::new("OREO").unwrap();
        store
            .insert_cookie(Cookie::new(code.clone(), "Oreo", dec!(389.20), CookieCategory::Normal).unwrap())
            .await;
        let flour = store
            .insert_material("Harina", "g", dec!(1000), dec!(0.02))
            .await
            .unwrap();
        store.insert_recipe_line(&code, flour.id(), dec!(500)).await.unwrap();

        let recipe = CatalogQueryService::new(Arc::new(store))
            .get_recipe(&code)
            .await
            .unwrap();

        assert_eq!(recipe.cookie.code(), &code);
        assert_eq!(recipe.lines.len(), 1);
        assert_eq!(recipe.lines[0].1.name(), "Harina");
        assert_eq!(recipe.lines[0].0.consumption_per_batch(), dec!(500));
    }

    #[tokio::test]
    async fn test_recipe_of_unknown_cookie_is_not_found() {
        let service = CatalogQueryService::new(Arc::new(InMemoryInventoryStore::new()));
        let err = service
            .get_recipe(&CookieCode::new("NOPE").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, ApplicationError::NotFound("cookie NOPE".to_string()));
    }

    #[tokio::test]
    async fn test_materials_are_listed_by_name() {
        let store = InMemoryInventoryStore::new();
        store.insert_material("Sticker", "unidad", dec!(100), dec!(0.60)).await.unwrap();
        store.insert_material("Harina", "g", dec!(1000), dec!(0.02)).await.unwrap();

        let materials = CatalogQueryService::new(Arc::new(store))
            .list_materials()
            .await
            .unwrap();
        let names: Vec<&str> = materials.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Harina", "Sticker"]);
    }
}
