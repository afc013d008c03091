use crate::db::{queries, queries_statistics, BillRepository};
use crate::error::{AppError, AppResult};
use crate::models::{
    Bill, BillFilter, BillType, CategoryTotal, CurrencyCode, CurrencyTypeTotal, DateTypeTotal,
    NewBill, PageRequest,
};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL 账单存储
pub struct PgBillRepository {
    pool: PgPool,
}

impl PgBillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_type(raw: &str) -> AppResult<BillType> {
    raw.parse()
        .map_err(|_| AppError::InvalidData(format!("bill_type {}", raw)))
}

fn parse_currency(raw: &str) -> AppResult<CurrencyCode> {
    raw.parse()
        .map_err(|_| AppError::InvalidData(format!("currency_code {}", raw)))
}

/// 记录存储失败后原样向上传递
fn log_db_error(op: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("{} 执行失败: {:?}", op, e);
        AppError::Database(e)
    }
}

#[async_trait]
impl BillRepository for PgBillRepository {
    async fn insert(&self, owner_id: i64, bill: &NewBill) -> AppResult<Bill> {
        let row = queries::insert_bill(&self.pool, owner_id, bill)
            .await
            .map_err(log_db_error("insert_bill"))?;
        row.try_into()
    }

    async fn find_active(&self, id: i64) -> AppResult<Option<Bill>> {
        let row = queries::find_active_bill(&self.pool, id)
            .await
            .map_err(log_db_error("find_active_bill"))?;
        row.map(Bill::try_from).transpose()
    }

    async fn list(&self, filter: &BillFilter, page: PageRequest) -> AppResult<(Vec<Bill>, i64)> {
        let total = queries::count_bills(&self.pool, filter)
            .await
            .map_err(log_db_error("count_bills"))?;
        let rows = queries::list_bills(&self.pool, filter, page)
            .await
            .map_err(log_db_error("list_bills"))?;

        let items = rows
            .into_iter()
            .map(Bill::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn update(&self, id: i64, bill: &NewBill) -> AppResult<Option<Bill>> {
        let row = queries::update_bill(&self.pool, id, bill)
            .await
            .map_err(log_db_error("update_bill"))?;
        row.map(Bill::try_from).transpose()
    }

    async fn soft_delete(&self, id: i64) -> AppResult<bool> {
        let affected = queries::soft_delete_bill(&self.pool, id)
            .await
            .map_err(log_db_error("soft_delete_bill"))?;
        Ok(affected > 0)
    }

    async fn sum_by_currency_and_type(
        &self,
        filter: &BillFilter,
    ) -> AppResult<Vec<CurrencyTypeTotal>> {
        let rows = queries_statistics::sum_by_currency_and_type(&self.pool, filter)
            .await
            .map_err(log_db_error("sum_by_currency_and_type"))?;

        rows.into_iter()
            .map(|row| {
                Ok(CurrencyTypeTotal {
                    currency: parse_currency(&row.currency_code)?,
                    bill_type: parse_type(&row.bill_type)?,
                    total: row.total,
                })
            })
            .collect()
    }

    async fn sum_by_category(&self, filter: &BillFilter) -> AppResult<Vec<CategoryTotal>> {
        let rows = queries_statistics::sum_by_category(&self.pool, filter)
            .await
            .map_err(log_db_error("sum_by_category"))?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryTotal {
                category: row.category,
                amount: row.amount,
                count: row.count,
            })
            .collect())
    }

    async fn sum_by_date_and_type(&self, filter: &BillFilter) -> AppResult<Vec<DateTypeTotal>> {
        let rows = queries_statistics::sum_by_date_and_type(&self.pool, filter)
            .await
            .map_err(log_db_error("sum_by_date_and_type"))?;

        rows.into_iter()
            .map(|row| {
                Ok(DateTypeTotal {
                    date: row.date,
                    bill_type: parse_type(&row.bill_type)?,
                    total: row.total,
                })
            })
            .collect()
    }
}
