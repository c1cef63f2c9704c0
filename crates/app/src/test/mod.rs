//! Shared test infrastructure.

pub(crate) mod memory;
