//! Promo Codes
//!
//! A promo code is checked as a conjunction of independent predicates. The
//! first failing predicate is reported as a [`PromoCodeError`] so callers can
//! tell customers exactly why a code was refused.

use std::{fmt, str::FromStr};

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use thiserror::Error;
use uuid::Uuid;

/// How long after registration a customer still counts as new.
pub const NEW_CUSTOMER_WINDOW: SignedDuration = SignedDuration::from_hours(24 * 30);

/// Reasons a promo code cannot be applied.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PromoCodeError {
    /// The code has been switched off.
    #[error("promo code is not active")]
    Inactive,

    /// The expiration date has passed.
    #[error("promo code has expired")]
    Expired,

    /// Every allowed redemption has been used.
    #[error("promo code has reached its redemption limit")]
    RedemptionLimitReached,

    /// The code is restricted to other customers.
    #[error("promo code is restricted to specific customers and is not valid for you")]
    CustomerNotEligible,

    /// The code is for recently registered customers only.
    #[error("promo code is only valid for new customers")]
    NewCustomersOnly,

    /// The customer has used the code as often as allowed.
    #[error("promo code has reached its usage limit for you")]
    CustomerUsageLimitReached,

    /// Recent purchases fall short of the required amount.
    #[error("promo code is not valid for your purchase amount")]
    MinimumPurchaseNotMet,

    /// The customer has never ordered one of the required products.
    #[error("promo code is not valid for the products you have purchased")]
    NoApplicableProducts,
}

/// Problems with a promo code's own configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PromoCodeDefinitionError {
    /// The code is blank.
    #[error("promo code cannot be empty")]
    EmptyCode,

    /// Discount values must not be negative.
    #[error("promo code value cannot be negative")]
    NegativeValue,

    /// Percentage codes must be between 0 and 100.
    #[error("percentage promo codes must be between 0 and 100")]
    PercentageOutOfRange,

    /// A redemption limit, when set, must be positive.
    #[error("redemption limit must be a positive integer")]
    ZeroRedemptionLimit,

    /// Minimum purchase amounts must not be negative.
    #[error("minimum purchase amount cannot be negative")]
    NegativeMinimumPurchase,

    /// The stored kind code is unknown.
    #[error("unknown promo code kind")]
    UnknownKind,
}

/// How a promo code's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromoCodeKind {
    /// `value` is a percentage of the subtotal.
    Percentage,

    /// `value` is an amount in the order currency.
    FixedAmount,
}

impl PromoCodeKind {
    /// Stored code for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            PromoCodeKind::Percentage => "PERCENTAGE",
            PromoCodeKind::FixedAmount => "FIXED_AMOUNT",
        }
    }
}

impl fmt::Display for PromoCodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromoCodeKind {
    type Err = PromoCodeDefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PERCENTAGE" => Ok(PromoCodeKind::Percentage),
            "FIXED_AMOUNT" | "FIXED" => Ok(PromoCodeKind::FixedAmount),
            _ => Err(PromoCodeDefinitionError::UnknownKind),
        }
    }
}

/// Promo Code
#[derive(Debug, Clone, PartialEq)]
pub struct PromoCode {
    /// Identifier
    pub uuid: Uuid,

    /// Customer-facing code, uppercased.
    pub code: String,

    /// Percentage or fixed amount.
    pub kind: PromoCodeKind,

    /// Percentage points or currency amount, depending on `kind`.
    pub value: Decimal,

    /// When the code stops being valid.
    pub expires_at: Option<Timestamp>,

    /// Whether the code can currently be used.
    pub active: bool,

    /// Required recent spend.
    pub min_purchase_amount: Option<Decimal>,

    /// Window the required spend is measured over.
    pub min_purchase_period: Option<SignedDuration>,

    /// Maximum redemptions across all customers.
    pub redemption_limit: Option<u32>,

    /// Maximum redemptions per customer.
    pub usage_limit_per_customer: u32,

    /// Only customers registered within [`NEW_CUSTOMER_WINDOW`] may redeem.
    pub new_customers_only: bool,

    /// Customers allowed to redeem; empty means everyone.
    pub eligible_customers: FxHashSet<Uuid>,

    /// Products the customer must have ordered before; empty means no requirement.
    pub applicable_products: FxHashSet<Uuid>,
}

impl PromoCode {
    /// Creates an active, unrestricted promo code.
    pub fn new(uuid: Uuid, code: &str, kind: PromoCodeKind, value: Decimal) -> Self {
        Self {
            uuid,
            code: normalize_code(code),
            kind,
            value,
            expires_at: None,
            active: true,
            min_purchase_amount: None,
            min_purchase_period: None,
            redemption_limit: None,
            usage_limit_per_customer: 1,
            new_customers_only: false,
            eligible_customers: FxHashSet::default(),
            applicable_products: FxHashSet::default(),
        }
    }

    /// Check the code's own configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`PromoCodeDefinitionError`] found.
    pub fn validate_definition(&self) -> Result<(), PromoCodeDefinitionError> {
        if self.code.is_empty() {
            return Err(PromoCodeDefinitionError::EmptyCode);
        }

        if self.value < Decimal::ZERO {
            return Err(PromoCodeDefinitionError::NegativeValue);
        }

        if self.kind == PromoCodeKind::Percentage && self.value > Decimal::ONE_HUNDRED {
            return Err(PromoCodeDefinitionError::PercentageOutOfRange);
        }

        if self.redemption_limit == Some(0) {
            return Err(PromoCodeDefinitionError::ZeroRedemptionLimit);
        }

        if self
            .min_purchase_amount
            .is_some_and(|amount| amount < Decimal::ZERO)
        {
            return Err(PromoCodeDefinitionError::NegativeMinimumPurchase);
        }

        Ok(())
    }

    /// Start of the purchase-history window, when both amount and period are configured.
    pub fn purchase_window_start(&self, now: Timestamp) -> Option<Timestamp> {
        self.min_purchase_amount?;

        let period = self.min_purchase_period?;

        Some(now.checked_sub(period).unwrap_or(Timestamp::MIN))
    }
}

/// Uppercase and trim a customer-entered code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// What the store knows about a customer, for the customer-specific predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerStanding {
    /// Customer identifier
    pub customer: Uuid,

    /// When the customer registered.
    pub registered_at: Timestamp,

    /// How many times this customer has redeemed the code.
    pub redemptions: u64,

    /// Shipped or delivered order total since the purchase window start.
    pub recent_purchase_total: Decimal,

    /// Whether a pending, shipped or delivered order contains an applicable product.
    pub purchased_applicable_product: bool,
}

/// Validates promo codes against redemption counts and customer standing.
#[derive(Debug, Clone, Copy)]
pub struct PromoCodeValidator {
    new_customer_window: SignedDuration,
}

impl Default for PromoCodeValidator {
    fn default() -> Self {
        Self::new(NEW_CUSTOMER_WINDOW)
    }
}

impl PromoCodeValidator {
    /// Creates a validator with a custom new-customer window.
    pub fn new(new_customer_window: SignedDuration) -> Self {
        Self {
            new_customer_window,
        }
    }

    /// Whether the code may be applied.
    pub fn is_valid(
        &self,
        promo_code: &PromoCode,
        total_redemptions: u64,
        customer: Option<&CustomerStanding>,
        now: Timestamp,
    ) -> bool {
        self.check(promo_code, total_redemptions, customer, now)
            .is_ok()
    }

    /// Evaluate every predicate, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the [`PromoCodeError`] for the first failing predicate.
    pub fn check(
        &self,
        promo_code: &PromoCode,
        total_redemptions: u64,
        customer: Option<&CustomerStanding>,
        now: Timestamp,
    ) -> Result<(), PromoCodeError> {
        if !promo_code.active {
            return Err(PromoCodeError::Inactive);
        }

        if promo_code.expires_at.is_some_and(|expires| expires <= now) {
            return Err(PromoCodeError::Expired);
        }

        if promo_code
            .redemption_limit
            .is_some_and(|limit| total_redemptions >= u64::from(limit))
        {
            return Err(PromoCodeError::RedemptionLimitReached);
        }

        let Some(customer) = customer else {
            return Ok(());
        };

        self.check_customer(promo_code, customer, now)
    }

    fn check_customer(
        &self,
        promo_code: &PromoCode,
        customer: &CustomerStanding,
        now: Timestamp,
    ) -> Result<(), PromoCodeError> {
        if !promo_code.eligible_customers.is_empty()
            && !promo_code.eligible_customers.contains(&customer.customer)
        {
            return Err(PromoCodeError::CustomerNotEligible);
        }

        if promo_code.new_customers_only && !self.is_new_customer(customer, now) {
            return Err(PromoCodeError::NewCustomersOnly);
        }

        if customer.redemptions >= u64::from(promo_code.usage_limit_per_customer) {
            return Err(PromoCodeError::CustomerUsageLimitReached);
        }

        // With no period configured there is no window to measure, so the
        // minimum purchase requirement is treated as met.
        if let (Some(minimum), Some(_)) = (
            promo_code.min_purchase_amount,
            promo_code.purchase_window_start(now),
        ) {
            if customer.recent_purchase_total < minimum {
                return Err(PromoCodeError::MinimumPurchaseNotMet);
            }
        }

        if !promo_code.applicable_products.is_empty() && !customer.purchased_applicable_product {
            return Err(PromoCodeError::NoApplicableProducts);
        }

        Ok(())
    }

    fn is_new_customer(&self, customer: &CustomerStanding, now: Timestamp) -> bool {
        let cutoff = now
            .checked_sub(self.new_customer_window)
            .unwrap_or(Timestamp::MIN);

        customer.registered_at >= cutoff
    }
}
