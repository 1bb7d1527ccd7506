//! IDataProvider: raw per-factor measurements for a match.

use std::future::Future;
use std::sync::Arc;

use crate::models::{MatchContext, RawValue};

/// Supplies raw measurements. Ordinary data gaps return `None`; the engine
/// skips the factor and never fails the request because of it.
pub trait IDataProvider: Send + Sync {
    fn get_measurement(
        &self,
        factor_code: &str,
        ctx: &MatchContext,
    ) -> impl Future<Output = Option<RawValue>> + Send;
}

impl<T: IDataProvider + ?Sized> IDataProvider for Arc<T> {
    fn get_measurement(
        &self,
        factor_code: &str,
        ctx: &MatchContext,
    ) -> impl Future<Output = Option<RawValue>> + Send {
        (**self).get_measurement(factor_code, ctx)
    }
}
