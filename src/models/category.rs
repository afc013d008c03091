use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 账单类型 (支出 / 收入)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillType {
    Expense,
    Income,
}

impl BillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillType::Expense => "EXPENSE",
            BillType::Income => "INCOME",
        }
    }

    /// 该类型允许的类别
    pub fn categories(&self) -> &'static [CategoryInfo] {
        match self {
            BillType::Expense => EXPENSE_CATEGORIES,
            BillType::Income => INCOME_CATEGORIES,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillType::Expense => "支出",
            BillType::Income => "收入",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXPENSE" => Ok(BillType::Expense),
            "INCOME" => Ok(BillType::Income),
            other => Err(AppError::validation(format!("账单类型不正确: {}", other))),
        }
    }
}

/// 类别静态表项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub value: &'static str,
    pub label: &'static str,
}

const fn category(value: &'static str, label: &'static str) -> CategoryInfo {
    CategoryInfo { value, label }
}

pub static EXPENSE_CATEGORIES: &[CategoryInfo] = &[
    category("food", "餐饮"),
    category("transport", "交通"),
    category("shopping", "购物"),
    category("entertainment", "娱乐"),
    category("housing", "住房"),
    category("utilities", "水电燃气"),
    category("healthcare", "医疗健康"),
    category("education", "教育培训"),
    category("personal", "个人护理"),
    category("social", "社交人情"),
    category("other_expense", "其他支出"),
];

pub static INCOME_CATEGORIES: &[CategoryInfo] = &[
    category("salary", "工资"),
    category("bonus", "奖金"),
    category("investment", "投资理财"),
    category("freelance", "兼职收入"),
    category("refund", "退款"),
    category("gift", "礼金"),
    category("other_income", "其他收入"),
];

/// 类别必须属于对应账单类型的类别集合
pub fn is_valid_category_for_type(bill_type: BillType, category: &str) -> bool {
    bill_type.categories().iter().any(|c| c.value == category)
}

/// 类别显示名称，未知类别原样返回
pub fn category_label(category: &str) -> &str {
    EXPENSE_CATEGORIES
        .iter()
        .chain(INCOME_CATEGORIES.iter())
        .find(|c| c.value == category)
        .map(|c| c.label)
        .unwrap_or(category)
}
