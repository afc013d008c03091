pub mod bill;
pub mod category;
pub mod currency;
pub mod filter;
pub mod statistics;

pub use bill::{Bill, BillRow, NewBill, NewBillRequest, PageRequest, Paginated};
pub use category::{is_valid_category_for_type, BillType, CategoryInfo};
pub use currency::{CurrencyCode, CurrencyConfig};
pub use filter::{BillFilter, StatisticsFilter};
pub use statistics::{
    CategoryData, CategoryTotal, CurrencyTypeTotal, DateTypeTotal, SummaryData, TrendData,
};
