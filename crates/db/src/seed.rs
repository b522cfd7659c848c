use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const DEMO_CUSTOMER_COUNT: i64 = 6;

const DEMO_INVOICE_IDS: &[&str] = &[
    "demo-invoice-0001",
    "demo-invoice-0002",
    "demo-invoice-0003",
    "demo-invoice-0004",
    "demo-invoice-0005",
    "demo-invoice-0006",
    "demo-invoice-0007",
    "demo-invoice-0008",
    "demo-invoice-0009",
    "demo-invoice-0010",
    "demo-invoice-0011",
    "demo-invoice-0012",
    "demo-invoice-0013",
];

/// Demo customers and invoices for local development.
///
/// Loading is idempotent; rows that already exist are left untouched, so an
/// invoice edited after seeding keeps its edits.
pub struct DemoSeed;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub customers: i64,
    pub invoices: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedVerification {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

impl DemoSeed {
    pub const SQL: &'static str = include_str!("../../../config/fixtures/demo_seed.sql");

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        sqlx::raw_sql(Self::SQL).execute(&mut *tx).await?;
        tx.commit().await?;

        let customers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers").fetch_one(pool).await?;
        let invoices: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM invoices").fetch_one(pool).await?;

        Ok(SeedResult { customers, invoices })
    }

    pub async fn verify(pool: &DbPool) -> Result<SeedVerification, RepositoryError> {
        let mut checks = Vec::new();

        let customers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers").fetch_one(pool).await?;
        checks.push(("demo-customers", customers >= DEMO_CUSTOMER_COUNT));

        let mut seeded_invoices = 0usize;
        for id in DEMO_INVOICE_IDS {
            let present: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE id = ?")
                .bind(*id)
                .fetch_one(pool)
                .await?;
            if present == 1 {
                seeded_invoices += 1;
            }
        }
        checks.push(("demo-invoices", seeded_invoices == DEMO_INVOICE_IDS.len()));

        let orphaned: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM invoices
             WHERE id LIKE 'demo-invoice-%'
               AND customer_id NOT IN (SELECT id FROM customers)",
        )
        .fetch_one(pool)
        .await?;
        checks.push(("demo-invoice-customers", orphaned == 0));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(SeedVerification { all_present, checks })
    }
}
