//! Orders Repository

use sqlx::{Postgres, Transaction, query, query_scalar};
use storefront::orders::OrderDraft;
use uuid::Uuid;

use crate::domain::checkout::records::{AddressUuid, OrderUuid};

use super::decode_error;

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const CREATE_ORDER_LINE_ITEMS_SQL: &str = include_str!("../sql/create_order_line_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        draft: &OrderDraft,
        shipping_address: Option<AddressUuid>,
        billing_address: Option<AddressUuid>,
    ) -> Result<OrderUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(CREATE_ORDER_SQL)
            .bind(OrderUuid::new().into_uuid())
            .bind(draft.customer)
            .bind(shipping_address.map(AddressUuid::into_uuid))
            .bind(billing_address.map(AddressUuid::into_uuid))
            .bind(draft.currency.iso_alpha_code)
            .bind(draft.total)
            .bind(draft.customer_currency.iso_alpha_code)
            .bind(draft.customer_total)
            .bind(draft.status.as_str())
            .bind(draft.authorization_status.as_str())
            .bind(draft.charge_status.as_str())
            .bind(draft.promo_code)
            .fetch_one(&mut **tx)
            .await?;

        Ok(OrderUuid::from_uuid(uuid))
    }

    pub(crate) async fn create_line_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        draft: &OrderDraft,
    ) -> Result<u64, sqlx::Error> {
        let lines = &draft.lines;

        let quantities = lines
            .iter()
            .map(|line| i32::try_from(line.quantity).map_err(|e| decode_error("quantity", e)))
            .collect::<Result<Vec<i32>, sqlx::Error>>()?;

        let rows_affected = query(CREATE_ORDER_LINE_ITEMS_SQL)
            .bind(lines.iter().map(|_| Uuid::now_v7()).collect::<Vec<_>>())
            .bind(vec![order.into_uuid(); lines.len()])
            .bind(lines.iter().map(|line| line.variant).collect::<Vec<_>>())
            .bind(quantities)
            .bind(lines.iter().map(|line| line.unit_price).collect::<Vec<_>>())
            .bind(lines.iter().map(|line| line.total).collect::<Vec<_>>())
            .bind(lines.iter().map(|line| line.customer_total).collect::<Vec<_>>())
            .bind(lines.iter().map(|line| line.tax_rate).collect::<Vec<_>>())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
