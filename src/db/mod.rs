pub mod memory;
pub mod pool;
pub mod postgres;
pub mod queries;
pub mod queries_statistics;

pub use memory::MemoryBillRepository;
pub use pool::{create_pool, run_migrations};
pub use postgres::PgBillRepository;

use crate::error::AppResult;
use crate::models::{
    Bill, BillFilter, CategoryTotal, CurrencyTypeTotal, DateTypeTotal, NewBill, PageRequest,
};
use async_trait::async_trait;

/// 账单存储
///
/// 查询类方法只返回未软删除的记录；所有者过滤由 `BillFilter` 携带。
#[async_trait]
pub trait BillRepository: Send + Sync {
    async fn insert(&self, owner_id: i64, bill: &NewBill) -> AppResult<Bill>;

    /// 按ID查找未删除账单，不区分所有者 (所有权由服务层判断)
    async fn find_active(&self, id: i64) -> AppResult<Option<Bill>>;

    /// 返回当前页数据与满足条件的总数
    async fn list(&self, filter: &BillFilter, page: PageRequest) -> AppResult<(Vec<Bill>, i64)>;

    /// 记录不存在或已删除时返回 `None`
    async fn update(&self, id: i64, bill: &NewBill) -> AppResult<Option<Bill>>;

    /// 返回是否有记录被删除
    async fn soft_delete(&self, id: i64) -> AppResult<bool>;

    async fn sum_by_currency_and_type(
        &self,
        filter: &BillFilter,
    ) -> AppResult<Vec<CurrencyTypeTotal>>;

    /// 结果按金额降序
    async fn sum_by_category(&self, filter: &BillFilter) -> AppResult<Vec<CategoryTotal>>;

    /// 结果按日期升序
    async fn sum_by_date_and_type(&self, filter: &BillFilter) -> AppResult<Vec<DateTypeTotal>>;
}
