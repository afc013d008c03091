use crate::models::BillFilter;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

/// 按币种+类型分组行
#[derive(Debug, Clone, FromRow)]
pub struct CurrencyTypeRow {
    pub currency_code: String,
    pub bill_type: String,
    pub total: BigDecimal,
}

/// 按类别分组行
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub category: String,
    pub amount: BigDecimal,
    pub count: i64,
}

/// 按日期+类型分组行
#[derive(Debug, Clone, FromRow)]
pub struct DateTypeRow {
    pub date: NaiveDate,
    pub bill_type: String,
    pub total: BigDecimal,
}

/// 收支汇总: GROUP BY currency_code, bill_type
pub fn summary_query(filter: &BillFilter) -> QueryBuilder<'static, Postgres> {
    let mut query_builder = QueryBuilder::new(
        "SELECT currency_code, bill_type, SUM(amount) AS total FROM bill",
    );
    filter.push_where(&mut query_builder);
    query_builder.push(" GROUP BY currency_code, bill_type");
    query_builder
}

/// 分类统计: GROUP BY bill_category, 金额降序
pub fn category_query(filter: &BillFilter) -> QueryBuilder<'static, Postgres> {
    let mut query_builder = QueryBuilder::new(
        "SELECT bill_category AS category, SUM(amount) AS amount, COUNT(*) AS count FROM bill",
    );
    filter.push_where(&mut query_builder);
    query_builder.push(" GROUP BY bill_category ORDER BY SUM(amount) DESC");
    query_builder
}

/// 趋势统计: GROUP BY date, bill_type, 日期升序
pub fn trend_query(filter: &BillFilter) -> QueryBuilder<'static, Postgres> {
    let mut query_builder =
        QueryBuilder::new("SELECT date, bill_type, SUM(amount) AS total FROM bill");
    filter.push_where(&mut query_builder);
    query_builder.push(" GROUP BY date, bill_type ORDER BY date ASC");
    query_builder
}

pub async fn sum_by_currency_and_type(
    pool: &PgPool,
    filter: &BillFilter,
) -> Result<Vec<CurrencyTypeRow>, sqlx::Error> {
    let mut query_builder = summary_query(filter);
    let rows = query_builder.build_query_as::<CurrencyTypeRow>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn sum_by_category(
    pool: &PgPool,
    filter: &BillFilter,
) -> Result<Vec<CategoryRow>, sqlx::Error> {
    let mut query_builder = category_query(filter);
    let rows = query_builder.build_query_as::<CategoryRow>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn sum_by_date_and_type(
    pool: &PgPool,
    filter: &BillFilter,
) -> Result<Vec<DateTypeRow>, sqlx::Error> {
    let mut query_builder = trend_query(filter);
    let rows = query_builder.build_query_as::<DateTypeRow>().fetch_all(pool).await?;
    Ok(rows)
}
