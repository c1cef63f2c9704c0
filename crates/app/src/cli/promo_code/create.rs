use clap::Args;
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use storefront::promo_codes::{PromoCode, PromoCodeKind};
use storefront_app::{
    database::{self, Db},
    domain::promo_codes::{PgPromoCodesService, PromoCodesService},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreatePromoCodeArgs {
    /// Code customers enter; stored uppercased
    #[arg(long)]
    code: String,

    /// PERCENTAGE or FIXED_AMOUNT
    #[arg(long)]
    kind: PromoCodeKind,

    /// Percentage, or amount in the order currency
    #[arg(long)]
    value: Decimal,

    /// Expiration timestamp, e.g. 2026-12-31T23:59:59Z
    #[arg(long)]
    expires_at: Option<Timestamp>,

    /// Create the code switched off
    #[arg(long)]
    inactive: bool,

    /// Minimum purchase total within `--min-purchase-period`
    #[arg(long)]
    min_purchase_amount: Option<Decimal>,

    /// Look-back window for the minimum purchase, e.g. 720h
    #[arg(long)]
    min_purchase_period: Option<SignedDuration>,

    /// Total redemptions allowed across all customers
    #[arg(long)]
    redemption_limit: Option<u32>,

    /// Redemptions allowed per customer
    #[arg(long, default_value_t = 1)]
    usage_limit_per_customer: u32,

    /// Only customers registered within the last 30 days
    #[arg(long)]
    new_customers_only: bool,

    /// Restrict to this customer; repeatable
    #[arg(long = "customer")]
    customers: Vec<Uuid>,

    /// Require a prior purchase of this product; repeatable
    #[arg(long = "product")]
    products: Vec<Uuid>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

impl CreatePromoCodeArgs {
    fn promo_code(&self) -> PromoCode {
        let mut promo_code = PromoCode::new(Uuid::now_v7(), &self.code, self.kind, self.value);

        promo_code.expires_at = self.expires_at;
        promo_code.active = !self.inactive;
        promo_code.min_purchase_amount = self.min_purchase_amount;
        promo_code.min_purchase_period = self.min_purchase_period;
        promo_code.redemption_limit = self.redemption_limit;
        promo_code.usage_limit_per_customer = self.usage_limit_per_customer;
        promo_code.new_customers_only = self.new_customers_only;
        promo_code.eligible_customers = self.customers.iter().copied().collect();
        promo_code.applicable_products = self.products.iter().copied().collect();

        promo_code
    }
}

pub(crate) async fn run(args: CreatePromoCodeArgs) -> Result<(), String> {
    let promo_code = args.promo_code();

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgPromoCodesService::new(Db::new(pool));

    let record = service
        .create_promo_code(promo_code)
        .await
        .map_err(|error| format!("failed to create promo code: {error}"))?;

    println!("promo_code_uuid: {}", record.uuid);
    println!("code: {}", record.code);
    println!("created_at: {}", record.created_at);

    Ok(())
}
