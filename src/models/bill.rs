use crate::error::AppError;
use crate::models::category::{is_valid_category_for_type, BillType};
use crate::models::currency::CurrencyCode;
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// 备注最大长度 (字符)
pub const MAX_NOTE_CHARS: usize = 500;

/// 金额整数部分最大位数 (amount NUMERIC(15,2))
pub const MAX_AMOUNT_INTEGER_DIGITS: usize = 13;

/// 账单记录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: i64,
    #[serde(rename = "userId")]
    pub owner_id: i64,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub bill_type: BillType,
    pub bill_category: String,
    pub currency_code: CurrencyCode,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 账单表原始行 (bill)
#[derive(Debug, Clone, FromRow)]
pub struct BillRow {
    pub id: i64,
    pub user_id: i64,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub bill_type: String,
    pub bill_category: String,
    pub currency_code: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<BillRow> for Bill {
    type Error = AppError;

    fn try_from(row: BillRow) -> Result<Self, Self::Error> {
        let bill_type = row
            .bill_type
            .parse()
            .map_err(|_| AppError::InvalidData(format!("bill {}: bill_type {}", row.id, row.bill_type)))?;
        let currency_code = row.currency_code.parse().map_err(|_| {
            AppError::InvalidData(format!("bill {}: currency_code {}", row.id, row.currency_code))
        })?;

        Ok(Bill {
            id: row.id,
            owner_id: row.user_id,
            amount: row.amount,
            date: row.date,
            bill_type,
            bill_category: row.bill_category,
            currency_code,
            note: row.note,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// 校验通过的账单可变字段 (创建 / 全量更新)
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub bill_type: BillType,
    pub bill_category: String,
    pub currency_code: CurrencyCode,
    pub note: Option<String>,
}

/// 创建 / 更新账单请求体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBillRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    pub date: Option<String>,
    pub bill_type: Option<String>,
    pub bill_category: Option<String>,
    pub currency_code: Option<String>,
    pub note: Option<String>,
}

impl NewBillRequest {
    /// 校验全部字段，所有错误合并为一条消息返回
    pub fn validate(&self) -> Result<NewBill, AppError> {
        let mut errors: Vec<String> = Vec::new();

        let amount = match non_empty(&self.amount) {
            None => {
                errors.push("请填写金额".to_string());
                None
            }
            Some(raw) => match parse_amount(raw) {
                Ok(v) => Some(v),
                Err(msg) => {
                    errors.push(msg.to_string());
                    None
                }
            },
        };

        let date = match non_empty(&self.date) {
            None => {
                errors.push("请选择日期".to_string());
                None
            }
            Some(raw) => match parse_date(raw) {
                Some(d) => Some(d),
                None => {
                    errors.push("日期格式不正确".to_string());
                    None
                }
            },
        };

        let bill_type = match non_empty(&self.bill_type) {
            None => {
                errors.push("请选择账单类型".to_string());
                None
            }
            Some(raw) => match raw.parse::<BillType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.push("账单类型不正确".to_string());
                    None
                }
            },
        };

        let bill_category = match non_empty(&self.bill_category) {
            None => {
                errors.push("请选择账单类别".to_string());
                None
            }
            Some(raw) => Some(raw.to_string()),
        };

        if let (Some(t), Some(c)) = (bill_type, bill_category.as_deref()) {
            if !is_valid_category_for_type(t, c) {
                errors.push(format!("该类别不属于{}类型", t.label()));
            }
        }

        let currency_code = match non_empty(&self.currency_code) {
            None => {
                errors.push("请选择货币类型".to_string());
                None
            }
            Some(raw) => match raw.parse::<CurrencyCode>() {
                Ok(c) => Some(c),
                Err(_) => {
                    errors.push("货币类型不正确".to_string());
                    None
                }
            },
        };

        if let Some(note) = &self.note {
            if note.chars().count() > MAX_NOTE_CHARS {
                errors.push(format!("备注不能超过{}字符", MAX_NOTE_CHARS));
            }
        }

        match (amount, date, bill_type, bill_category, currency_code) {
            (Some(amount), Some(date), Some(bill_type), Some(bill_category), Some(currency_code))
                if errors.is_empty() =>
            {
                Ok(NewBill {
                    amount,
                    date,
                    bill_type,
                    bill_category,
                    currency_code,
                    note: self.note.clone(),
                })
            }
            _ => Err(AppError::Validation(errors.join("; "))),
        }
    }
}

// 金额既可以是字符串也可以是 JSON 数字
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("invalid amount: {}", other))),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 解析 YYYY-MM-DD 日期
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// 金额格式: 整数部分 + 最多两位小数, 且必须大于0; 结果统一为两位小数
pub fn parse_amount(raw: &str) -> Result<BigDecimal, &'static str> {
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw, None),
    };

    let digits_ok = !int_part.is_empty() && int_part.bytes().all(|b| b.is_ascii_digit());
    let frac_ok = match frac_part {
        None => true,
        Some(f) => (1..=2).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit()),
    };
    if !digits_ok || !frac_ok {
        return Err("金额格式不正确，最多两位小数");
    }
    if int_part.trim_start_matches('0').len() > MAX_AMOUNT_INTEGER_DIGITS {
        return Err("金额格式不正确，整数部分最多13位");
    }

    let amount: BigDecimal = raw.parse().map_err(|_| "金额格式不正确，最多两位小数")?;
    if amount <= BigDecimal::zero() {
        return Err("金额必须大于0");
    }
    Ok(amount.with_scale(2))
}

/// 分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: i64 = 20;
    pub const MAX_PAGE_SIZE: i64 = 100;

    pub fn new(page: i64, page_size: i64) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::validation("页码最小为1"));
        }
        if page_size < 1 {
            return Err(AppError::validation("每页条数最小为1"));
        }
        if page_size > Self::MAX_PAGE_SIZE {
            return Err(AppError::validation("每页条数最大为100"));
        }
        // offset 必须可用 i64 表示
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(AppError::validation("页码超出范围"));
        }
        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// 分页结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: PageRequest) -> Self {
        let total_pages = (total + page.page_size - 1) / page.page_size;
        Self {
            items,
            total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
        }
    }
}
