use crate::db::BillRepository;
use crate::error::AppResult;
use crate::models::{
    Bill, BillFilter, BillType, CategoryTotal, CurrencyCode, CurrencyTypeTotal, DateTypeTotal,
    NewBill, PageRequest,
};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};

/// 内存账单存储 (测试与无数据库运行)
#[derive(Default)]
pub struct MemoryBillRepository {
    bills: DashMap<i64, Bill>,
    next_id: AtomicI64,
}

impl MemoryBillRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 满足条件的记录快照, 按ID升序 (即插入顺序)
    fn snapshot(&self, filter: &BillFilter) -> Vec<Bill> {
        let mut bills: Vec<Bill> = self
            .bills
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        bills.sort_by_key(|b| b.id);
        bills
    }
}

#[async_trait]
impl BillRepository for MemoryBillRepository {
    async fn insert(&self, owner_id: i64, bill: &NewBill) -> AppResult<Bill> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let record = Bill {
            id,
            owner_id,
            amount: bill.amount.clone(),
            date: bill.date,
            bill_type: bill.bill_type,
            bill_category: bill.bill_category.clone(),
            currency_code: bill.currency_code,
            note: bill.note.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.bills.insert(id, record.clone());
        Ok(record)
    }

    async fn find_active(&self, id: i64) -> AppResult<Option<Bill>> {
        Ok(self
            .bills
            .get(&id)
            .filter(|entry| entry.deleted_at.is_none())
            .map(|entry| entry.value().clone()))
    }

    async fn list(&self, filter: &BillFilter, page: PageRequest) -> AppResult<(Vec<Bill>, i64)> {
        let mut bills = self.snapshot(filter);
        bills.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = bills.len() as i64;
        let items = bills
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .collect();
        Ok((items, total))
    }

    async fn update(&self, id: i64, bill: &NewBill) -> AppResult<Option<Bill>> {
        let Some(mut entry) = self.bills.get_mut(&id) else {
            return Ok(None);
        };
        if entry.deleted_at.is_some() {
            return Ok(None);
        }

        entry.amount = bill.amount.clone();
        entry.date = bill.date;
        entry.bill_type = bill.bill_type;
        entry.bill_category = bill.bill_category.clone();
        entry.currency_code = bill.currency_code;
        entry.note = bill.note.clone();
        entry.updated_at = Utc::now();
        Ok(Some(entry.value().clone()))
    }

    async fn soft_delete(&self, id: i64) -> AppResult<bool> {
        match self.bills.get_mut(&id) {
            Some(mut entry) if entry.deleted_at.is_none() => {
                entry.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn sum_by_currency_and_type(
        &self,
        filter: &BillFilter,
    ) -> AppResult<Vec<CurrencyTypeTotal>> {
        let mut groups: IndexMap<(CurrencyCode, BillType), BigDecimal> = IndexMap::new();
        for bill in self.snapshot(filter) {
            let sum = groups
                .entry((bill.currency_code, bill.bill_type))
                .or_insert_with(BigDecimal::zero);
            *sum += bill.amount;
        }

        Ok(groups
            .into_iter()
            .map(|((currency, bill_type), total)| CurrencyTypeTotal {
                currency,
                bill_type,
                total,
            })
            .collect())
    }

    async fn sum_by_category(&self, filter: &BillFilter) -> AppResult<Vec<CategoryTotal>> {
        let mut groups: HashMap<String, (BigDecimal, i64)> = HashMap::new();
        for bill in self.snapshot(filter) {
            let (sum, count) = groups
                .entry(bill.bill_category)
                .or_insert_with(|| (BigDecimal::zero(), 0));
            *sum += bill.amount;
            *count += 1;
        }

        let mut totals: Vec<CategoryTotal> = groups
            .into_iter()
            .map(|(category, (amount, count))| CategoryTotal {
                category,
                amount,
                count,
            })
            .collect();
        totals.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        Ok(totals)
    }

    async fn sum_by_date_and_type(&self, filter: &BillFilter) -> AppResult<Vec<DateTypeTotal>> {
        let mut groups: BTreeMap<(NaiveDate, BillType), BigDecimal> = BTreeMap::new();
        for bill in self.snapshot(filter) {
            let sum = groups
                .entry((bill.date, bill.bill_type))
                .or_insert_with(BigDecimal::zero);
            *sum += bill.amount;
        }

        Ok(groups
            .into_iter()
            .map(|((date, bill_type), total)| DateTypeTotal {
                date,
                bill_type,
                total,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_bill(amount: &str, date: &str, bill_type: BillType, category: &str) -> NewBill {
        NewBill {
            amount: amount.parse().unwrap(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            bill_type,
            bill_category: category.to_string(),
            currency_code: CurrencyCode::CNY,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_monotonic_ids() {
        let repo = MemoryBillRepository::new();
        let a = repo
            .insert(1, &new_bill("1.00", "2025-01-01", BillType::Expense, "food"))
            .await
            .unwrap();
        let b = repo
            .insert(2, &new_bill("2.00", "2025-01-01", BillType::Expense, "food"))
            .await
            .unwrap();
        assert!(b.id > a.id);
        assert_eq!(a.owner_id, 1);
        assert!(a.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_soft_delete_hides_record() {
        let repo = MemoryBillRepository::new();
        let bill = repo
            .insert(1, &new_bill("1.00", "2025-01-01", BillType::Expense, "food"))
            .await
            .unwrap();

        assert!(repo.soft_delete(bill.id).await.unwrap());
        assert!(repo.find_active(bill.id).await.unwrap().is_none());
        assert!(!repo.soft_delete(bill.id).await.unwrap());
        assert!(repo
            .update(bill.id, &new_bill("5.00", "2025-01-01", BillType::Expense, "food"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_category_totals_sorted_by_amount() {
        let repo = MemoryBillRepository::new();
        repo.insert(1, &new_bill("5.00", "2025-01-01", BillType::Expense, "food"))
            .await
            .unwrap();
        repo.insert(1, &new_bill("80.00", "2025-01-01", BillType::Expense, "housing"))
            .await
            .unwrap();
        repo.insert(1, &new_bill("7.00", "2025-01-02", BillType::Expense, "food"))
            .await
            .unwrap();

        let filter = BillFilter::for_owner(1).with_bill_type(Some(BillType::Expense));
        let totals = repo.sum_by_category(&filter).await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "housing");
        assert_eq!(totals[1].category, "food");
        assert_eq!(totals[1].count, 2);
        assert_eq!(totals[1].amount.to_string(), "12.00");
    }
}
