//! Addresses Repository

use sqlx::{Postgres, Transaction, query_scalar};
use storefront::addresses::Address;
use uuid::Uuid;

use crate::domain::checkout::records::AddressUuid;

const FIND_ADDRESS_SQL: &str = include_str!("../sql/find_address.sql");
const CREATE_ADDRESS_SQL: &str = include_str!("../sql/create_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Reuse the address with the same natural key, or store a new one.
    pub(crate) async fn find_or_create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: &Address,
    ) -> Result<AddressUuid, sqlx::Error> {
        let key = address.key();

        let existing: Option<Uuid> = query_scalar(FIND_ADDRESS_SQL)
            .bind(key.customer)
            .bind(key.first_name)
            .bind(key.last_name)
            .bind(key.phone_number)
            .bind(key.email_address)
            .bind(key.kind.as_str())
            .bind(key.street_address)
            .bind(key.city)
            .bind(key.state)
            .bind(key.country)
            .fetch_optional(&mut **tx)
            .await?;

        if let Some(uuid) = existing {
            return Ok(AddressUuid::from_uuid(uuid));
        }

        let created: Uuid = query_scalar(CREATE_ADDRESS_SQL)
            .bind(AddressUuid::new().into_uuid())
            .bind(address.customer)
            .bind(&address.first_name)
            .bind(&address.last_name)
            .bind(address.phone_number.as_deref())
            .bind(address.email_address.as_deref())
            .bind(address.kind.as_str())
            .bind(&address.street_address)
            .bind(&address.city)
            .bind(address.state.as_deref())
            .bind(address.postal_code.as_deref())
            .bind(&address.country)
            .fetch_one(&mut **tx)
            .await?;

        Ok(AddressUuid::from_uuid(created))
    }
}
