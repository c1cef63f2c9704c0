//! Promo Codes Service

use async_trait::async_trait;
use mockall::automock;
use storefront::promo_codes::PromoCode;
use tracing::info;

use crate::{
    database::Db,
    domain::promo_codes::{
        PromoCodesServiceError, records::PromoCodeRecord, repository::PgPromoCodesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPromoCodesService {
    db: Db,
    repository: PgPromoCodesRepository,
}

impl PgPromoCodesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromoCodesRepository::new(),
        }
    }
}

#[async_trait]
impl PromoCodesService for PgPromoCodesService {
    #[tracing::instrument(
        name = "promo_codes.service.create_promo_code",
        skip(self, promo_code),
        fields(promo_code_uuid = %promo_code.uuid, code = %promo_code.code),
        err
    )]
    async fn create_promo_code(
        &self,
        promo_code: PromoCode,
    ) -> Result<PromoCodeRecord, PromoCodesServiceError> {
        promo_code.validate_definition()?;

        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .create_promo_code(&mut tx, &promo_code)
            .await?;

        tx.commit().await?;

        info!(promo_code_uuid = %record.uuid, "created promo code");

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait PromoCodesService: Send + Sync {
    /// Validates and stores a new promo code.
    async fn create_promo_code(
        &self,
        promo_code: PromoCode,
    ) -> Result<PromoCodeRecord, PromoCodesServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sqlx::PgPool;
    use storefront::promo_codes::{PromoCodeDefinitionError, PromoCodeKind};
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    fn service() -> Result<PgPromoCodesService, sqlx::Error> {
        let pool = PgPool::connect_lazy("postgres://storefront@localhost/unused")?;

        Ok(PgPromoCodesService::new(Db::new(pool)))
    }

    #[tokio::test]
    async fn invalid_definitions_are_rejected_before_storage() -> TestResult {
        let service = service()?;

        let mut zero_limit = PromoCode::new(
            Uuid::now_v7(),
            "LIMITED",
            PromoCodeKind::FixedAmount,
            Decimal::ONE,
        );
        zero_limit.redemption_limit = Some(0);

        let cases = [
            (
                PromoCode::new(Uuid::now_v7(), "  ", PromoCodeKind::FixedAmount, Decimal::ONE),
                PromoCodeDefinitionError::EmptyCode,
            ),
            (
                PromoCode::new(
                    Uuid::now_v7(),
                    "HALFPLUS",
                    PromoCodeKind::Percentage,
                    Decimal::new(101, 0),
                ),
                PromoCodeDefinitionError::PercentageOutOfRange,
            ),
            (zero_limit, PromoCodeDefinitionError::ZeroRedemptionLimit),
        ];

        for (promo_code, expected) in cases {
            let error = service
                .create_promo_code(promo_code)
                .await
                .err()
                .ok_or("definition should be rejected")?;

            assert!(
                matches!(error, PromoCodesServiceError::Definition(reason) if reason == expected),
                "{error:?}"
            );
        }

        Ok(())
    }
}
