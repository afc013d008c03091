use crate::error::{AppError, AppResult};
use crate::models::filter::parse_date_param;
use crate::models::{BillFilter, BillType, CurrencyCode, PageRequest, StatisticsFilter};
use serde::Deserialize;

/// 统计接口查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub currency_code: Option<String>,
}

impl StatisticsQuery {
    pub fn to_filter(&self) -> AppResult<StatisticsFilter> {
        StatisticsFilter::parse(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.currency_code.as_deref(),
        )
    }
}

/// 分类统计查询参数 (billType 必填)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatisticsQuery {
    pub bill_type: Option<String>,
    #[serde(flatten)]
    pub common: StatisticsQuery,
}

impl CategoryStatisticsQuery {
    pub fn bill_type(&self) -> AppResult<BillType> {
        match self.bill_type.as_deref().map(str::trim) {
            None | Some("") => Err(AppError::validation("请选择账单类型")),
            Some(raw) => raw.parse(),
        }
    }
}

/// 账单列表查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub bill_type: Option<String>,
    pub bill_category: Option<String>,
    pub currency_code: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_int(value: &Option<String>, default: i64, message: &str) -> AppResult<i64> {
    match present(value) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::validation(message.to_string())),
    }
}

impl BillListQuery {
    pub fn page(&self) -> AppResult<PageRequest> {
        let page = parse_int(&self.page, 1, "页码必须是整数")?;
        let page_size = parse_int(
            &self.page_size,
            PageRequest::DEFAULT_PAGE_SIZE,
            "每页条数必须是整数",
        )?;
        PageRequest::new(page, page_size)
    }

    pub fn to_filter(&self, owner_id: i64) -> AppResult<BillFilter> {
        let bill_type = present(&self.bill_type)
            .map(str::parse::<BillType>)
            .transpose()?;
        let currency = present(&self.currency_code)
            .map(str::parse::<CurrencyCode>)
            .transpose()?;

        Ok(BillFilter::for_owner(owner_id)
            .with_start_date(parse_date_param(
                self.start_date.as_deref(),
                "开始日期格式不正确",
            )?)
            .with_end_date(parse_date_param(
                self.end_date.as_deref(),
                "结束日期格式不正确",
            )?)
            .with_bill_type(bill_type)
            .with_category(present(&self.bill_category).map(str::to_string))
            .with_currency(currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_query_requires_type() {
        let query = CategoryStatisticsQuery::default();
        assert!(matches!(query.bill_type(), Err(AppError::Validation(_))));

        let query = CategoryStatisticsQuery {
            bill_type: Some("INCOME".into()),
            ..Default::default()
        };
        assert_eq!(query.bill_type().unwrap(), BillType::Income);

        let query = CategoryStatisticsQuery {
            bill_type: Some("TRANSFER".into()),
            ..Default::default()
        };
        assert!(query.bill_type().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query = BillListQuery::default();
        assert_eq!(query.page().unwrap(), PageRequest::default());
        assert_eq!(query.to_filter(3).unwrap(), BillFilter::for_owner(3));
    }

    #[test]
    fn test_list_query_validation() {
        let query = BillListQuery {
            page: Some("x".into()),
            ..Default::default()
        };
        assert!(query.page().is_err());

        let query = BillListQuery {
            page_size: Some("200".into()),
            ..Default::default()
        };
        assert!(query.page().is_err());

        let query = BillListQuery {
            start_date: Some("yesterday".into()),
            ..Default::default()
        };
        assert!(query.to_filter(1).is_err());
    }

    #[test]
    fn test_list_query_filters() {
        let query = BillListQuery {
            bill_type: Some("EXPENSE".into()),
            bill_category: Some("food".into()),
            currency_code: Some("EUR".into()),
            ..Default::default()
        };
        let filter = query.to_filter(5).unwrap();
        assert_eq!(filter.bill_type, Some(BillType::Expense));
        assert_eq!(filter.bill_category.as_deref(), Some("food"));
        assert_eq!(filter.currency, Some(CurrencyCode::EUR));
    }
}
