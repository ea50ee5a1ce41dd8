use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapter::driver::request_dto::{
    OrdersQueryParams, ProduceBatchRequest, RestockMaterialRequest, UpdateOrderStatusRequest,
};
use crate::adapter::driver::response_dto::{
    BatchResponse, CookieResponse, LedgerEntryResponse, MaterialResponse, OrderResponse,
    RecipeResponse,
};
use crate::application::service::{
    CatalogQueryService, MaterialApplicationService, OrderFulfillmentApplicationService,
    OrderQueryService, ProductionApplicationService,
};
use crate::application::ApplicationError;
use crate::domain::model::{CookieCode, MaterialId, OrderId, OrderStatus};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

type ApiFailure = (StatusCode, Json<ApiError>);
type ApiResult<T> = Result<Json<T>, ApiFailure>;

// アプリケーションサービスを含む状態
#[derive(Clone)]
pub struct AppState {
    pub production_service: Arc<ProductionApplicationService>,
    pub fulfillment_service: Arc<OrderFulfillmentApplicationService>,
    pub material_service: Arc<MaterialApplicationService>,
    pub catalog_query_service: Arc<CatalogQueryService>,
    pub order_query_service: Arc<OrderQueryService>,
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/cookies", get(get_cookies))
        .route("/cookies/:code/recipe", get(get_recipe))
        .route("/materials", get(get_materials))
        .route("/materials/:material_id/restock", post(restock_material))
        .route("/batches", get(get_batches).post(produce_batch))
        .route("/orders", get(get_orders))
        .route("/orders/:order_id", get(get_order_by_id))
        .route("/orders/:order_id/status", put(update_order_status))
        .route("/ledger", get(get_ledger))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bakery-fulfillment",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// クッキー一覧取得エンドポイント
async fn get_cookies(State(state): State<AppState>) -> ApiResult<Vec<CookieResponse>> {
    let cookies = state
        .catalog_query_service
        .list_cookies()
        .await
        .map_err(map_application_error)?;
    Ok(Json(cookies.iter().map(CookieResponse::from_cookie).collect()))
}

// レシピ取得エンドポイント
async fn get_recipe(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<RecipeResponse> {
    let code = parse_cookie_code(code)?;
    let recipe = state
        .catalog_query_service
        .get_recipe(&code)
        .await
        .map_err(map_application_error)?;
    Ok(Json(RecipeResponse::from_recipe(&recipe)))
}

// 原材料一覧取得エンドポイント
async fn get_materials(State(state): State<AppState>) -> ApiResult<Vec<MaterialResponse>> {
    let materials = state
        .catalog_query_service
        .list_materials()
        .await
        .map_err(map_application_error)?;
    Ok(Json(
        materials.iter().map(MaterialResponse::from_material).collect(),
    ))
}

// 原材料仕入れエンドポイント
async fn restock_material(
    State(state): State<AppState>,
    material_id: Result<Path<i64>, PathRejection>,
    request: Result<Json<RestockMaterialRequest>, JsonRejection>,
) -> ApiResult<MaterialResponse> {
    let Path(material_id) = material_id.map_err(|e| invalid_request(e.body_text()))?;
    let Json(request) = request.map_err(|e| invalid_request(e.body_text()))?;

    let material = state
        .material_service
        .restock_material(MaterialId::new(material_id), request.quantity)
        .await
        .map_err(map_application_error)?;
    Ok(Json(MaterialResponse::from_material(&material)))
}

// 生産履歴取得エンドポイント
async fn get_batches(State(state): State<AppState>) -> ApiResult<Vec<BatchResponse>> {
    let batches = state
        .catalog_query_service
        .list_batches()
        .await
        .map_err(map_application_error)?;
    Ok(Json(batches.iter().map(BatchResponse::from_batch).collect()))
}

// バッチ生産エンドポイント
async fn produce_batch(
    State(state): State<AppState>,
    request: Result<Json<ProduceBatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiFailure> {
    let Json(request) = request.map_err(|e| invalid_request(e.body_text()))?;
    let code = parse_cookie_code(request.cookie_code)?;

    let batch = state
        .production_service
        .produce_batch(&code)
        .await
        .map_err(map_application_error)?;
    Ok((StatusCode::CREATED, Json(BatchResponse::from_batch(&batch))))
}

// 注文一覧取得エンドポイント
async fn get_orders(
    State(state): State<AppState>,
    query: Result<Query<OrdersQueryParams>, QueryRejection>,
) -> ApiResult<Vec<OrderResponse>> {
    let Query(params) = query.map_err(|_| invalid_request("無効なクエリパラメータです"))?;
    let status = params.status.as_deref().map(parse_status).transpose()?;

    let orders = state
        .order_query_service
        .list_orders(status)
        .await
        .map_err(map_application_error)?;
    Ok(Json(orders.iter().map(OrderResponse::from_order).collect()))
}

// 注文詳細取得エンドポイント
async fn get_order_by_id(
    State(state): State<AppState>,
    order_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<OrderResponse> {
    let Path(order_id) = order_id.map_err(|_| invalid_request("無効な注文ID形式です"))?;

    let order = state
        .order_query_service
        .get_order(OrderId::new(order_id))
        .await
        .map_err(map_application_error)?;
    Ok(Json(OrderResponse::from_order(&order)))
}

// 注文ステータス変更エンドポイント
async fn update_order_status(
    State(state): State<AppState>,
    order_id: Result<Path<i64>, PathRejection>,
    request: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
) -> ApiResult<OrderResponse> {
    let Path(order_id) = order_id.map_err(|_| invalid_request("無効な注文ID形式です"))?;
    let Json(request) = request.map_err(|e| invalid_request(e.body_text()))?;
    let status = parse_status(&request.status)?;

    let order = state
        .fulfillment_service
        .update_order_status(OrderId::new(order_id), status)
        .await
        .map_err(map_application_error)?;
    Ok(Json(OrderResponse::from_order(&order)))
}

// 取引台帳取得エンドポイント
async fn get_ledger(State(state): State<AppState>) -> ApiResult<Vec<LedgerEntryResponse>> {
    let entries = state
        .catalog_query_service
        .list_ledger_entries()
        .await
        .map_err(map_application_error)?;
    Ok(Json(entries.iter().map(LedgerEntryResponse::from_entry).collect()))
}

fn parse_cookie_code(code: String) -> Result<CookieCode, ApiFailure> {
    CookieCode::new(code)
        .map_err(|e| map_application_error(ApplicationError::from(e)))
}

fn parse_status(status: &str) -> Result<OrderStatus, ApiFailure> {
    status
        .parse::<OrderStatus>()
        .map_err(|_| invalid_request(format!("無効なステータス値: {}", status)))
}

fn invalid_request(message: impl Into<String>) -> ApiFailure {
    map_application_error(ApplicationError::InvalidInput(message.into()))
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> ApiFailure {
    let (status, code) = match &err {
        ApplicationError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ApplicationError::NoRecipe(_) => (StatusCode::UNPROCESSABLE_ENTITY, "NO_RECIPE"),
        ApplicationError::InsufficientStock { .. } => {
            (StatusCode::CONFLICT, "INSUFFICIENT_STOCK")
        }
        ApplicationError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        ApplicationError::TransactionFailed(_) => {
            tracing::error!(error = %err, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "TRANSACTION_FAILED")
        }
    };

    (
        status,
        Json(ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_mapping() {
        let cases = [
            (
                ApplicationError::NotFound("order 1".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApplicationError::NoRecipe("OREO".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApplicationError::InsufficientStock {
                    item: "Oreo".to_string(),
                    required: dec!(10),
                    available: dec!(5),
                },
                StatusCode::CONFLICT,
            ),
            (
                ApplicationError::InvalidInput("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApplicationError::TransactionFailed("deadlock".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = map_application_error(err);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_invalid_status_is_bad_request() {
        let (status, Json(body)) = parse_status("shipped").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_INPUT");
    }
}
