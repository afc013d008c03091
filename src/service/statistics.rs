use crate::db::BillRepository;
use crate::error::AppResult;
use crate::models::{
    BillType, CategoryData, CategoryTotal, CurrencyCode, CurrencyTypeTotal, DateTypeTotal,
    StatisticsFilter, SummaryData, TrendData,
};
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 统计金额固定两位小数输出，与币种精度无关 (JPY/TWD/KRW 同样输出两位)
pub fn format_amount(value: &BigDecimal) -> String {
    value.with_scale(2).to_string()
}

/// 统计聚合服务: 汇总 / 分类 / 趋势，均为只读
pub struct StatisticsService {
    repo: Arc<dyn BillRepository>,
}

impl StatisticsService {
    pub fn new(repo: Arc<dyn BillRepository>) -> Self {
        Self { repo }
    }

    /// 收支汇总，每个有记录的币种一行
    pub async fn summary(
        &self,
        owner_id: i64,
        filter: &StatisticsFilter,
    ) -> AppResult<Vec<SummaryData>> {
        let rows = self
            .repo
            .sum_by_currency_and_type(&filter.for_owner(owner_id))
            .await?;
        tracing::debug!("用户 {} 汇总统计: {} 个分组", owner_id, rows.len());
        Ok(build_summary(rows))
    }

    /// 指定类型的分类统计，按金额降序
    pub async fn category_statistics(
        &self,
        owner_id: i64,
        bill_type: BillType,
        filter: &StatisticsFilter,
    ) -> AppResult<Vec<CategoryData>> {
        let bill_filter = filter.for_owner(owner_id).with_bill_type(Some(bill_type));
        let rows = self.repo.sum_by_category(&bill_filter).await?;
        tracing::debug!(
            "用户 {} 分类统计 ({}): {} 个类别",
            owner_id,
            bill_type,
            rows.len()
        );
        Ok(build_category_breakdown(rows))
    }

    /// 按日期的收支趋势，日期升序
    pub async fn trend_statistics(
        &self,
        owner_id: i64,
        filter: &StatisticsFilter,
    ) -> AppResult<Vec<TrendData>> {
        let rows = self
            .repo
            .sum_by_date_and_type(&filter.for_owner(owner_id))
            .await?;
        tracing::debug!("用户 {} 趋势统计: {} 个分组", owner_id, rows.len());
        Ok(build_trend(rows))
    }
}

/// (币种, 类型) 分组 → 每币种一行; 行顺序为币种首次出现的顺序
pub fn build_summary(rows: Vec<CurrencyTypeTotal>) -> Vec<SummaryData> {
    let mut by_currency: IndexMap<CurrencyCode, (BigDecimal, BigDecimal)> = IndexMap::new();

    for row in rows {
        let (income, expense) = by_currency
            .entry(row.currency)
            .or_insert_with(|| (BigDecimal::zero(), BigDecimal::zero()));
        match row.bill_type {
            BillType::Income => *income += row.total,
            BillType::Expense => *expense += row.total,
        }
    }

    by_currency
        .into_iter()
        .map(|(currency, (income, expense))| {
            let balance = &income - &expense;
            SummaryData {
                total_income: format_amount(&income),
                total_expense: format_amount(&expense),
                balance: format_amount(&balance),
                currency_code: currency,
            }
        })
        .collect()
}

/// 分类占比 = round(类别金额 / 总额 × 100)，总额为0时为0
pub fn build_category_breakdown(mut rows: Vec<CategoryTotal>) -> Vec<CategoryData> {
    rows.sort_by(|a, b| b.amount.cmp(&a.amount));

    let total = rows
        .iter()
        .fold(BigDecimal::zero(), |acc, row| acc + &row.amount);

    rows.into_iter()
        .map(|row| CategoryData {
            percentage: percentage(&row.amount, &total),
            amount: format_amount(&row.amount),
            count: row.count,
            category: row.category,
        })
        .collect()
}

fn percentage(amount: &BigDecimal, total: &BigDecimal) -> i64 {
    if total.is_zero() {
        return 0;
    }
    let ratio = (amount.clone() * BigDecimal::from(100)) / total.clone();
    ratio.to_f64().map(f64::round).unwrap_or(0.0) as i64
}

/// (日期, 类型) 分组 → 每日期一行，日期升序无重复
pub fn build_trend(rows: Vec<DateTypeTotal>) -> Vec<TrendData> {
    let mut by_date: BTreeMap<NaiveDate, (BigDecimal, BigDecimal)> = BTreeMap::new();

    for row in rows {
        let (income, expense) = by_date
            .entry(row.date)
            .or_insert_with(|| (BigDecimal::zero(), BigDecimal::zero()));
        match row.bill_type {
            BillType::Income => *income += row.total,
            BillType::Expense => *expense += row.total,
        }
    }

    by_date
        .into_iter()
        .map(|(date, (income, expense))| TrendData {
            date: date.format("%Y-%m-%d").to_string(),
            income: format_amount(&income),
            expense: format_amount(&expense),
        })
        .collect()
}
