//! # Tenant Identity
//!
//! Every shop, product, sale and log row belongs to exactly one tenant (the
//! registered user who created it). Operations that touch tenant data take a
//! [`TenantId`] rather than a bare string, so an unscoped call does not
//! type-check.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Identifier of the tenant that owns a record (`owner_id` in storage).
///
/// The value is the id of the owning [`User`](crate::types::User).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TenantId(String);

impl TenantId {
    /// Wraps an authenticated user id.
    pub fn new(id: impl Into<String>) -> Self {
        TenantId(id.into())
    }

    /// Returns the id as bound in SQL filters.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
