use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::rates::{DateKey, ExchangeRateProvider, RatePayload};

pub const PRIVATBANK_BASE_URL: &str = "https://api.privatbank.ua";
const EXCHANGE_RATES_PATH: &str = "/p24api/exchange_rates";

// PrivatBankProvider implementation for ExchangeRateProvider
pub struct PrivatBankProvider {
    base_url: String,
    timeout: Duration,
}

impl PrivatBankProvider {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(PRIVATBANK_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        PrivatBankProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn url_for(&self, date: &DateKey) -> String {
        format!("{}{}?json&date={}", self.base_url, EXCHANGE_RATES_PATH, date)
    }
}

#[async_trait]
impl ExchangeRateProvider for PrivatBankProvider {
    #[instrument(
        name = "PrivatBankRatesFetch",
        skip(self),
        fields(date = %date)
    )]
    async fn fetch_rates(&self, date: &DateKey) -> Result<RatePayload> {
        let url = self.url_for(date);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("p24rates/1.0")
            .timeout(self.timeout)
            .build()?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for date: {}", e, date))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(anyhow!(
                "Failed to fetch data: {} for date: {}",
                response.status(),
                date
            ));
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for date: {date}"))?;

        let payload = RatePayload::from_json(&text)
            .with_context(|| format!("Failed to parse JSON response for date: {date}"))?;

        debug!(entries = payload.exchange_rate.len(), "Received exchange rates");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_RESPONSE: &str = r#"{
        "date": "19.10.2026",
        "bank": "PB",
        "baseCurrency": 980,
        "baseCurrencyLit": "UAH",
        "exchangeRate": [
            {"baseCurrency": "UAH", "saleRateNB": 24.1, "purchaseRateNB": 24.1},
            {"baseCurrency": "UAH", "currency": "USD", "saleRateNB": 41.3, "purchaseRateNB": 41.3, "saleRate": 41.6, "purchaseRate": 41.0},
            {"baseCurrency": "UAH", "currency": "EUR", "saleRateNB": 48.2, "purchaseRateNB": 48.2, "saleRate": 48.7, "purchaseRate": 47.9}
        ]
    }"#;

    fn test_date() -> DateKey {
        DateKey::new(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(EXCHANGE_RATES_PATH))
            .and(query_param("date", "19.10.2026"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider_for(server: &MockServer) -> PrivatBankProvider {
        PrivatBankProvider::with_base_url(&server.uri(), Duration::from_secs(5))
    }

    #[test]
    fn test_url_format() {
        let provider = PrivatBankProvider::new(Duration::from_secs(1));
        assert_eq!(
            provider.url_for(&test_date()),
            "https://api.privatbank.ua/p24api/exchange_rates?json&date=19.10.2026"
        );
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_server = create_mock_server(200, MOCK_RESPONSE).await;
        let provider = provider_for(&mock_server);

        let payload = provider.fetch_rates(&test_date()).await.unwrap();

        assert_eq!(payload.base_currency.as_deref(), Some("UAH"));
        assert_eq!(payload.exchange_rate.len(), 3);
        let usd = &payload.exchange_rate[1];
        assert_eq!(usd.currency.as_deref(), Some("USD"));
        assert_eq!(usd.sale_rate, Some(41.6));
        assert_eq!(usd.purchase_rate, Some(41.0));
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock_server = create_mock_server(500, "").await;
        let provider = provider_for(&mock_server);

        let result = provider.fetch_rates(&test_date()).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to fetch data: 500 Internal Server Error for date: 19.10.2026"
        );
    }

    #[tokio::test]
    async fn test_unmatched_date_is_an_error() {
        let mock_server = create_mock_server(200, MOCK_RESPONSE).await;
        let provider = provider_for(&mock_server);
        let other_date = DateKey::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

        // wiremock answers 404 for requests no mock matches
        let result = provider.fetch_rates(&other_date).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(200, "<html>maintenance</html>").await;
        let provider = provider_for(&mock_server);

        let result = provider.fetch_rates(&test_date()).await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for date: 19.10.2026")
        );
    }

    #[tokio::test]
    async fn test_empty_response() {
        let mock_server = create_mock_server(200, "{}").await;
        let provider = provider_for(&mock_server);

        assert!(provider.fetch_rates(&test_date()).await.is_err());
    }

    #[tokio::test]
    async fn test_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(MOCK_RESPONSE)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;
        let provider =
            PrivatBankProvider::with_base_url(&mock_server.uri(), Duration::from_millis(100));

        let result = provider.fetch_rates(&test_date()).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().starts_with("Request error:"));
    }
}
