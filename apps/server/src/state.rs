//! Shared application state.

use chrono::{FixedOffset, Utc};
use std::sync::Arc;
use vanledger_core::period::{business_date, ReportPeriod};
use vanledger_core::CoreResult;
use vanledger_db::Database;

use crate::auth::JwtManager;
use crate::config::{ConfigError, ServerConfig};

/// Cloned into every handler; all fields are cheap handles.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    /// Business timezone used to turn dates into report periods
    pub offset: FixedOffset,
}

impl AppState {
    pub fn new(db: Database, config: &ServerConfig) -> Result<Self, ConfigError> {
        Ok(AppState {
            db,
            jwt: Arc::new(JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs)),
            offset: config.business_offset()?,
        })
    }

    /// Day range from optional query dates, defaulting to today.
    pub fn period(
        &self,
        start: Option<chrono::NaiveDate>,
        end: Option<chrono::NaiveDate>,
    ) -> CoreResult<ReportPeriod> {
        let today = business_date(Utc::now(), self.offset);
        ReportPeriod::resolve(start, end, today, self.offset)
    }
}
