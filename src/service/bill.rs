use crate::db::BillRepository;
use crate::error::{AppError, AppResult};
use crate::models::category::category_label;
use crate::models::currency::format_currency;
use crate::models::{Bill, BillFilter, NewBill, PageRequest, Paginated};
use std::sync::Arc;

/// 账单增删改查服务，所有操作按所有者隔离
pub struct BillService {
    repo: Arc<dyn BillRepository>,
}

impl BillService {
    pub fn new(repo: Arc<dyn BillRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, owner_id: i64, bill: NewBill) -> AppResult<Bill> {
        let created = self.repo.insert(owner_id, &bill).await?;
        tracing::info!(
            "用户 {} 创建账单 {}: {} {} {}",
            owner_id,
            created.id,
            created.bill_type.label(),
            category_label(&created.bill_category),
            format_currency(&created.amount, created.currency_code)
        );
        Ok(created)
    }

    /// 分页列表; `filter.owner_id` 由调用方设置为当前用户
    pub async fn list(&self, filter: &BillFilter, page: PageRequest) -> AppResult<Paginated<Bill>> {
        let (items, total) = self.repo.list(filter, page).await?;
        tracing::debug!(
            "用户 {} 查询账单: page={} size={} total={}",
            filter.owner_id,
            page.page,
            page.page_size,
            total
        );
        Ok(Paginated::new(items, total, page))
    }

    /// 不存在 (或已删除) 返回 NotFound; 属于他人返回 Forbidden
    pub async fn get(&self, owner_id: i64, id: i64) -> AppResult<Bill> {
        let Some(bill) = self.repo.find_active(id).await? else {
            return Err(AppError::NotFound);
        };

        if bill.owner_id != owner_id {
            tracing::warn!("用户 {} 尝试访问他人账单 {}", owner_id, id);
            return Err(AppError::Forbidden("无权访问该账单".to_string()));
        }

        Ok(bill)
    }

    pub async fn update(&self, owner_id: i64, id: i64, bill: NewBill) -> AppResult<Bill> {
        self.get(owner_id, id).await?;

        // 校验与写入之间记录可能被删除
        let updated = self.repo.update(id, &bill).await?.ok_or(AppError::NotFound)?;
        tracing::info!("用户 {} 更新账单 {}", owner_id, id);
        Ok(updated)
    }

    pub async fn soft_delete(&self, owner_id: i64, id: i64) -> AppResult<()> {
        self.get(owner_id, id).await?;

        if !self.repo.soft_delete(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!("用户 {} 删除账单 {}", owner_id, id);
        Ok(())
    }
}
