//! Promo Code Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Promo Code UUID
pub type PromoCodeUuid = TypedUuid<PromoCodeRecord>;

/// Promo Code Record
#[derive(Debug, Clone, PartialEq)]
pub struct PromoCodeRecord {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub created_at: Timestamp,
}

/// Redemption limits of a promo code, read under a row lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RedemptionLimits {
    pub(crate) redemption_limit: Option<u32>,
    pub(crate) usage_limit_per_customer: u32,
}
