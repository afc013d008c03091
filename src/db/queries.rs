use crate::models::{BillFilter, BillRow, NewBill, PageRequest};
use sqlx::{PgPool, QueryBuilder};

const BILL_COLUMNS: &str = "id, user_id, amount, date, bill_type, bill_category, \
                            currency_code, note, created_at, updated_at, deleted_at";

/// 新增账单 (所有者与时间戳由服务端写入)
pub async fn insert_bill(
    pool: &PgPool,
    owner_id: i64,
    bill: &NewBill,
) -> Result<BillRow, sqlx::Error> {
    sqlx::query_as::<_, BillRow>(
        r#"
        INSERT INTO bill (user_id, amount, date, bill_type, bill_category, currency_code, note)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, amount, date, bill_type, bill_category,
                  currency_code, note, created_at, updated_at, deleted_at
        "#,
    )
    .bind(owner_id)
    .bind(&bill.amount)
    .bind(bill.date)
    .bind(bill.bill_type.as_str())
    .bind(&bill.bill_category)
    .bind(bill.currency_code.as_str())
    .bind(bill.note.as_deref())
    .fetch_one(pool)
    .await
}

/// 按ID查询未删除的账单 (不校验所有者)
pub async fn find_active_bill(pool: &PgPool, id: i64) -> Result<Option<BillRow>, sqlx::Error> {
    sqlx::query_as::<_, BillRow>(
        r#"
        SELECT id, user_id, amount, date, bill_type, bill_category,
               currency_code, note, created_at, updated_at, deleted_at
        FROM bill
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// 分页查询 (日期降序, 创建时间降序)
pub async fn list_bills(
    pool: &PgPool,
    filter: &BillFilter,
    page: PageRequest,
) -> Result<Vec<BillRow>, sqlx::Error> {
    let mut query_builder = QueryBuilder::new(format!("SELECT {} FROM bill", BILL_COLUMNS));
    filter.push_where(&mut query_builder);
    query_builder
        .push(" ORDER BY date DESC, created_at DESC, id DESC LIMIT ")
        .push_bind(page.page_size)
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows = query_builder.build_query_as::<BillRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// 统计满足条件的账单数
pub async fn count_bills(pool: &PgPool, filter: &BillFilter) -> Result<i64, sqlx::Error> {
    let mut query_builder = QueryBuilder::new("SELECT COUNT(*) FROM bill");
    filter.push_where(&mut query_builder);

    let total = query_builder.build_query_scalar::<i64>().fetch_one(pool).await?;
    Ok(total)
}

/// 全量替换可变字段
pub async fn update_bill(
    pool: &PgPool,
    id: i64,
    bill: &NewBill,
) -> Result<Option<BillRow>, sqlx::Error> {
    sqlx::query_as::<_, BillRow>(
        r#"
        UPDATE bill
        SET amount = $2,
            date = $3,
            bill_type = $4,
            bill_category = $5,
            currency_code = $6,
            note = $7,
            updated_at = now()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING id, user_id, amount, date, bill_type, bill_category,
                  currency_code, note, created_at, updated_at, deleted_at
        "#,
    )
    .bind(id)
    .bind(&bill.amount)
    .bind(bill.date)
    .bind(bill.bill_type.as_str())
    .bind(&bill.bill_category)
    .bind(bill.currency_code.as_str())
    .bind(bill.note.as_deref())
    .fetch_optional(pool)
    .await
}

/// 软删除, 返回受影响行数
pub async fn soft_delete_bill(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE bill
        SET deleted_at = now()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
