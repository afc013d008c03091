use crate::models::category::BillType;
use crate::models::currency::CurrencyCode;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;

/// 按 (币种, 类型) 分组求和
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyTypeTotal {
    pub currency: CurrencyCode,
    pub bill_type: BillType,
    pub total: BigDecimal,
}

/// 按类别分组求和与计数
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: BigDecimal,
    pub count: i64,
}

/// 按 (日期, 类型) 分组求和
#[derive(Debug, Clone, PartialEq)]
pub struct DateTypeTotal {
    pub date: NaiveDate,
    pub bill_type: BillType,
    pub total: BigDecimal,
}

/// 收支汇总 (每个币种一行)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryData {
    pub total_income: String,
    pub total_expense: String,
    pub balance: String,
    pub currency_code: CurrencyCode,
}

/// 分类统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    pub category: String,
    pub amount: String,
    pub count: i64,
    pub percentage: i64,
}

/// 趋势统计 (每个日期一行)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendData {
    pub date: String,
    pub income: String,
    pub expense: String,
}
