use crate::error::AppError;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 货币代码
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CurrencyCode {
    #[default]
    CNY,
    USD,
    EUR,
    GBP,
    JPY,
    HKD,
    TWD,
    KRW,
}

/// 货币静态配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyConfig {
    pub code: CurrencyCode,
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimal_places: u32,
}

const fn currency(
    code: CurrencyCode,
    symbol: &'static str,
    name: &'static str,
    decimal_places: u32,
) -> CurrencyConfig {
    CurrencyConfig { code, symbol, name, decimal_places }
}

pub static CURRENCY_CONFIGS: &[CurrencyConfig] = &[
    currency(CurrencyCode::CNY, "¥", "人民币", 2),
    currency(CurrencyCode::USD, "$", "美元", 2),
    currency(CurrencyCode::EUR, "€", "欧元", 2),
    currency(CurrencyCode::GBP, "£", "英镑", 2),
    currency(CurrencyCode::JPY, "¥", "日元", 0),
    currency(CurrencyCode::HKD, "HK$", "港币", 2),
    currency(CurrencyCode::TWD, "NT$", "新台币", 0),
    currency(CurrencyCode::KRW, "₩", "韩元", 0),
];

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 8] = [
        CurrencyCode::CNY,
        CurrencyCode::USD,
        CurrencyCode::EUR,
        CurrencyCode::GBP,
        CurrencyCode::JPY,
        CurrencyCode::HKD,
        CurrencyCode::TWD,
        CurrencyCode::KRW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::CNY => "CNY",
            CurrencyCode::USD => "USD",
            CurrencyCode::EUR => "EUR",
            CurrencyCode::GBP => "GBP",
            CurrencyCode::JPY => "JPY",
            CurrencyCode::HKD => "HKD",
            CurrencyCode::TWD => "TWD",
            CurrencyCode::KRW => "KRW",
        }
    }

    pub fn config(&self) -> &'static CurrencyConfig {
        // CURRENCY_CONFIGS 与枚举声明顺序一致
        &CURRENCY_CONFIGS[*self as usize]
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("货币类型不正确: {}", s)))
    }
}

/// 按币种精度格式化显示金额 (统计接口不使用)
pub fn format_currency(amount: &BigDecimal, code: CurrencyCode) -> String {
    let config = code.config();
    let places = config.decimal_places as i64;
    format!("{}{}", config.symbol, amount.round(places).with_scale(places))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_lookup_matches_code() {
        for code in CurrencyCode::ALL {
            assert_eq!(code.config().code, code);
        }
        assert_eq!(CurrencyCode::JPY.config().decimal_places, 0);
        assert_eq!(CurrencyCode::HKD.config().symbol, "HK$");
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!("KRW".parse::<CurrencyCode>().unwrap(), CurrencyCode::KRW);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
        assert!("cny".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_format_currency_uses_decimal_places() {
        let amount: BigDecimal = "1234.5".parse().unwrap();
        assert_eq!(format_currency(&amount, CurrencyCode::USD), "$1234.50");
        assert_eq!(format_currency(&amount, CurrencyCode::CNY), "¥1234.50");

        let amount: BigDecimal = "1234".parse().unwrap();
        assert_eq!(format_currency(&amount, CurrencyCode::KRW), "₩1234");
    }
}
