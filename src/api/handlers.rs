use super::auth::OwnerId;
use super::params::{BillListQuery, CategoryStatisticsQuery, StatisticsQuery};
use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::category::{EXPENSE_CATEGORIES, INCOME_CATEGORIES};
use crate::models::currency::CURRENCY_CONFIGS;
use crate::models::{
    Bill, CategoryData, CategoryInfo, NewBillRequest, Paginated, SummaryData, TrendData,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

/// 类别参考数据
#[derive(Debug, Serialize)]
pub struct BillTypesResponse {
    pub expense: &'static [CategoryInfo],
    pub income: &'static [CategoryInfo],
}

/// 货币参考数据
#[derive(Debug, Serialize)]
pub struct CurrencyResponse {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

// 提取器拒绝统一转为 400
fn body(payload: Result<Json<NewBillRequest>, JsonRejection>) -> AppResult<NewBillRequest> {
    payload
        .map(|Json(req)| req)
        .map_err(|e| AppError::validation(format!("请求体格式不正确: {}", e.body_text())))
}

fn bill_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::validation("账单ID不正确"))
}

fn query<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(q)| q)
        .map_err(|e| AppError::validation(e.body_text()))
}

pub async fn create_bill(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    payload: Result<Json<NewBillRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let new_bill = body(payload)?.validate()?;
    let bill = state.bills.create(owner_id, new_bill).await?;
    Ok((StatusCode::CREATED, Json(bill)))
}

pub async fn list_bills(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    params: Result<Query<BillListQuery>, QueryRejection>,
) -> AppResult<Json<Paginated<Bill>>> {
    let params = query(params)?;
    let page = params.page()?;
    let filter = params.to_filter(owner_id)?;
    Ok(Json(state.bills.list(&filter, page).await?))
}

pub async fn get_bill(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Bill>> {
    let id = bill_id(path)?;
    Ok(Json(state.bills.get(owner_id, id).await?))
}

pub async fn update_bill(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewBillRequest>, JsonRejection>,
) -> AppResult<Json<Bill>> {
    let id = bill_id(path)?;
    let new_bill = body(payload)?.validate()?;
    Ok(Json(state.bills.update(owner_id, id, new_bill).await?))
}

pub async fn delete_bill(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = bill_id(path)?;
    state.bills.soft_delete(owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bill_types(_owner: OwnerId) -> Json<BillTypesResponse> {
    Json(BillTypesResponse {
        expense: EXPENSE_CATEGORIES,
        income: INCOME_CATEGORIES,
    })
}

pub async fn currencies(_owner: OwnerId) -> Json<Vec<CurrencyResponse>> {
    let list = CURRENCY_CONFIGS
        .iter()
        .map(|c| CurrencyResponse {
            code: c.code.as_str(),
            name: c.name,
            symbol: c.symbol,
        })
        .collect();
    Json(list)
}

/// 收支汇总
pub async fn statistics_summary(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    params: Result<Query<StatisticsQuery>, QueryRejection>,
) -> AppResult<Json<Vec<SummaryData>>> {
    let filter = query(params)?.to_filter()?;
    Ok(Json(state.statistics.summary(owner_id, &filter).await?))
}

/// 分类统计
pub async fn statistics_category(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    params: Result<Query<CategoryStatisticsQuery>, QueryRejection>,
) -> AppResult<Json<Vec<CategoryData>>> {
    let params = query(params)?;
    let bill_type = params.bill_type()?;
    let filter = params.common.to_filter()?;
    let data = state
        .statistics
        .category_statistics(owner_id, bill_type, &filter)
        .await?;
    Ok(Json(data))
}

/// 收支趋势
pub async fn statistics_trend(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    params: Result<Query<StatisticsQuery>, QueryRejection>,
) -> AppResult<Json<Vec<TrendData>>> {
    let filter = query(params)?.to_filter()?;
    Ok(Json(state.statistics.trend_statistics(owner_id, &filter).await?))
}
