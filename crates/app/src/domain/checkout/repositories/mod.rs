//! Checkout Repositories

pub(crate) mod addresses;
pub(crate) mod customers;
pub(crate) mod orders;
pub(crate) mod rates;
pub(crate) mod variants;

fn decode_error(
    column: &'static str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}
