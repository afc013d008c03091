use crate::error::{AppError, AppResult};
use crate::models::bill::{parse_date, Bill};
use crate::models::category::BillType;
use crate::models::currency::CurrencyCode;
use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};

/// 账单过滤谓词
///
/// 先构造完整的过滤条件，再分别用于内存匹配 (`matches`) 或编译为一条
/// 参数化 SQL 的 WHERE 子句 (`push_where`)。所有条件都隐含所有者过滤
/// 与 `deleted_at IS NULL`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillFilter {
    pub owner_id: i64,
    /// 包含边界
    pub start_date: Option<NaiveDate>,
    /// 包含边界
    pub end_date: Option<NaiveDate>,
    pub bill_type: Option<BillType>,
    pub bill_category: Option<String>,
    pub currency: Option<CurrencyCode>,
}

impl BillFilter {
    pub fn for_owner(owner_id: i64) -> Self {
        Self {
            owner_id,
            start_date: None,
            end_date: None,
            bill_type: None,
            bill_category: None,
            currency: None,
        }
    }

    pub fn with_start_date(mut self, start: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self
    }

    pub fn with_end_date(mut self, end: Option<NaiveDate>) -> Self {
        self.end_date = end;
        self
    }

    pub fn with_bill_type(mut self, bill_type: Option<BillType>) -> Self {
        self.bill_type = bill_type;
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.bill_category = category;
        self
    }

    pub fn with_currency(mut self, currency: Option<CurrencyCode>) -> Self {
        self.currency = currency;
        self
    }

    /// 内存求值
    pub fn matches(&self, bill: &Bill) -> bool {
        if bill.owner_id != self.owner_id || bill.deleted_at.is_some() {
            return false;
        }
        if self.start_date.is_some_and(|start| bill.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| bill.date > end) {
            return false;
        }
        if self.bill_type.is_some_and(|t| bill.bill_type != t) {
            return false;
        }
        if let Some(category) = &self.bill_category {
            if &bill.bill_category != category {
                return false;
            }
        }
        if self.currency.is_some_and(|c| bill.currency_code != c) {
            return false;
        }
        true
    }

    /// 编译为 WHERE 子句，参数全部以绑定形式追加
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE user_id = ").push_bind(self.owner_id);
        qb.push(" AND deleted_at IS NULL");

        if let Some(start) = self.start_date {
            qb.push(" AND date >= ").push_bind(start);
        }
        if let Some(end) = self.end_date {
            qb.push(" AND date <= ").push_bind(end);
        }
        if let Some(bill_type) = self.bill_type {
            qb.push(" AND bill_type = ").push_bind(bill_type.as_str());
        }
        if let Some(category) = &self.bill_category {
            qb.push(" AND bill_category = ").push_bind(category.clone());
        }
        if let Some(currency) = self.currency {
            qb.push(" AND currency_code = ").push_bind(currency.as_str());
        }
    }
}

/// 统计接口的公共过滤条件: 可选日期区间 (含边界) 与可选币种
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub currency: Option<CurrencyCode>,
}

impl StatisticsFilter {
    /// 解析查询参数; 空字符串视为未提供, 无法解析的日期或币种返回校验错误
    pub fn parse(
        start_date: Option<&str>,
        end_date: Option<&str>,
        currency: Option<&str>,
    ) -> AppResult<Self> {
        Ok(Self {
            start_date: parse_date_param(start_date, "开始日期格式不正确")?,
            end_date: parse_date_param(end_date, "结束日期格式不正确")?,
            currency: present(currency).map(str::parse::<CurrencyCode>).transpose()?,
        })
    }

    pub fn for_owner(&self, owner_id: i64) -> BillFilter {
        BillFilter::for_owner(owner_id)
            .with_start_date(self.start_date)
            .with_end_date(self.end_date)
            .with_currency(self.currency)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 可选日期参数, 格式错误时返回给定的校验消息
pub fn parse_date_param(value: Option<&str>, message: &str) -> AppResult<Option<NaiveDate>> {
    match present(value) {
        None => Ok(None),
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| AppError::validation(format!("{}: {}", message, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn bill(owner_id: i64, day: &str) -> Bill {
        Bill {
            id: 1,
            owner_id,
            amount: "10.00".parse::<BigDecimal>().unwrap(),
            date: date(day),
            bill_type: BillType::Expense,
            bill_category: "food".into(),
            currency_code: CurrencyCode::CNY,
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_owner_and_soft_delete() {
        let filter = BillFilter::for_owner(1);
        assert!(filter.matches(&bill(1, "2025-01-01")));
        assert!(!filter.matches(&bill(2, "2025-01-01")));

        let mut deleted = bill(1, "2025-01-01");
        deleted.deleted_at = Some(Utc::now());
        assert!(!filter.matches(&deleted));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filter = BillFilter::for_owner(1)
            .with_start_date(Some(date("2025-01-02")))
            .with_end_date(Some(date("2025-01-04")));
        assert!(!filter.matches(&bill(1, "2025-01-01")));
        assert!(filter.matches(&bill(1, "2025-01-02")));
        assert!(filter.matches(&bill(1, "2025-01-04")));
        assert!(!filter.matches(&bill(1, "2025-01-05")));

        let open_end = BillFilter::for_owner(1).with_start_date(Some(date("2025-01-02")));
        assert!(open_end.matches(&bill(1, "2030-01-01")));
    }

    #[test]
    fn test_type_category_currency() {
        let b = bill(1, "2025-01-01");
        assert!(!BillFilter::for_owner(1)
            .with_bill_type(Some(BillType::Income))
            .matches(&b));
        assert!(BillFilter::for_owner(1)
            .with_category(Some("food".into()))
            .matches(&b));
        assert!(!BillFilter::for_owner(1)
            .with_category(Some("transport".into()))
            .matches(&b));
        assert!(!BillFilter::for_owner(1)
            .with_currency(Some(CurrencyCode::USD))
            .matches(&b));
    }

    #[test]
    fn test_statistics_filter_parse() {
        let filter = StatisticsFilter::parse(Some("2025-01-01"), None, Some("USD")).unwrap();
        assert_eq!(filter.start_date, Some(date("2025-01-01")));
        assert_eq!(filter.end_date, None);
        assert_eq!(filter.currency, Some(CurrencyCode::USD));

        let empty = StatisticsFilter::parse(Some(""), Some("  "), None).unwrap();
        assert_eq!(empty, StatisticsFilter::default());
    }

    #[test]
    fn test_statistics_filter_rejects_bad_dates() {
        assert!(matches!(
            StatisticsFilter::parse(Some("2025/01/01"), None, None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            StatisticsFilter::parse(None, Some("2025-02-30"), None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            StatisticsFilter::parse(None, None, Some("BTC")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_statistics_filter_for_owner() {
        let filter = StatisticsFilter::parse(None, Some("2025-01-31"), Some("CNY"))
            .unwrap()
            .for_owner(9);
        assert_eq!(filter.owner_id, 9);
        assert_eq!(filter.end_date, Some(date("2025-01-31")));
        assert_eq!(filter.currency, Some(CurrencyCode::CNY));
        assert_eq!(filter.bill_type, None);
    }

    #[test]
    fn test_push_where_without_optional_filters() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM bill");
        BillFilter::for_owner(7).push_where(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM bill WHERE user_id = $1 AND deleted_at IS NULL"
        );
    }

    #[test]
    fn test_push_where_binds_in_order() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM bill");
        BillFilter::for_owner(7)
            .with_start_date(Some(date("2025-01-01")))
            .with_end_date(Some(date("2025-01-31")))
            .with_bill_type(Some(BillType::Expense))
            .with_currency(Some(CurrencyCode::JPY))
            .push_where(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM bill WHERE user_id = $1 AND deleted_at IS NULL \
             AND date >= $2 AND date <= $3 AND bill_type = $4 AND currency_code = $5"
        );
    }
}
