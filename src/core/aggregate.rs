use crate::core::rates::{DailyRates, DateKey, ExchangeRateProvider, ResultSet};
use crate::MAX_DAYS;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// Collects per-day quotes from an [`ExchangeRateProvider`].
pub struct RateAggregator<'a> {
    provider: &'a (dyn ExchangeRateProvider + Send + Sync),
    max_concurrent_requests: usize,
}

impl<'a> RateAggregator<'a> {
    pub fn new(provider: &'a (dyn ExchangeRateProvider + Send + Sync)) -> Self {
        Self {
            provider,
            max_concurrent_requests: 1,
        }
    }

    /// Allows up to `limit` days to be fetched at the same time.
    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = limit.clamp(1, MAX_DAYS as usize);
        self
    }

    /// Fetches rates for `days` dates ending at `today`, most recent first.
    ///
    /// `on_day` is called once per resolved day, with the error for days that failed.
    /// Failed days are left out of the result.
    pub async fn get_rates(
        &self,
        today: NaiveDate,
        days: u32,
        currencies: &[String],
        on_day: &(dyn Fn(&DateKey, Option<&anyhow::Error>) + Send + Sync),
    ) -> ResultSet {
        let dates: Vec<DateKey> = (0..u64::from(days))
            .filter_map(|offset| match DateKey::days_before(today, offset) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(error = %e, "Skipping out of range date");
                    None
                }
            })
            .collect();

        // `buffered` yields in input order, so the result stays sorted by date
        stream::iter(dates)
            .map(|date| async move {
                match self.provider.fetch_rates(&date).await {
                    Ok(payload) => {
                        debug!(%date, entries = payload.exchange_rate.len(), "Fetched rates");
                        on_day(&date, None);
                        Some(DailyRates::from_payload(date, &payload, currencies))
                    }
                    Err(e) => {
                        warn!(%date, error = %e, "Dropping day without rates");
                        on_day(&date, Some(&e));
                        None
                    }
                }
            })
            .buffered(self.max_concurrent_requests)
            .filter_map(|daily| async move { daily })
            .collect()
            .await
    }
}
