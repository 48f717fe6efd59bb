//! Exchange rate abstractions and core types

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt::Display;

/// Placeholder shown when a rate is not available.
pub const NOT_AVAILABLE: &str = "N/A";

/// A calendar date used both as the API query parameter and the result key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    /// Date `offset` days before `today`.
    pub fn days_before(today: NaiveDate, offset: u64) -> Result<Self> {
        today
            .checked_sub_days(Days::new(offset))
            .map(DateKey)
            .ok_or_else(|| anyhow!("Can't get date {} days before {}", offset, today))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%d.%m.%Y"))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Values of an unexpected type read as absent instead of failing the payload
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

fn lenient_rate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

fn lenient_entries<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RateEntry>, D::Error> {
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    };
    Ok(entries)
}

/// One entry of the `exchangeRate` array. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub currency: Option<String>,
    #[serde(rename = "saleRate", deserialize_with = "lenient_rate")]
    pub sale_rate: Option<f64>,
    #[serde(rename = "purchaseRate", deserialize_with = "lenient_rate")]
    pub purchase_rate: Option<f64>,
}

/// Response of the exchange rate API for a single date.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RatePayload {
    #[serde(rename = "baseCurrencyLit", deserialize_with = "lenient_string")]
    pub base_currency: Option<String>,
    #[serde(rename = "exchangeRate", deserialize_with = "lenient_entries")]
    pub exchange_rate: Vec<RateEntry>,
}

impl RatePayload {
    /// Parses a response body, ignoring unknown fields and defaulting missing ones.
    ///
    /// Empty values (`null`, `{}`, `[]`) are treated as "no data" and rejected.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        match &value {
            Value::Null => return Err(anyhow!("Empty rate payload")),
            Value::Object(map) if map.is_empty() => return Err(anyhow!("Empty rate payload")),
            Value::Array(items) if items.is_empty() => return Err(anyhow!("Empty rate payload")),
            Value::Object(_) => {}
            _ => return Err(anyhow!("Unexpected rate payload: expected a JSON object")),
        }

        Ok(serde_json::from_value(value)?)
    }
}

/// Sale and purchase rate of a currency on one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CurrencyQuote {
    #[serde(serialize_with = "serialize_rate")]
    pub sale: Option<f64>,
    #[serde(serialize_with = "serialize_rate")]
    pub purchase: Option<f64>,
}

fn serialize_rate<S: Serializer>(rate: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match rate {
        Some(value) => serializer.serialize_f64(*value),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}

/// Finds the first entry whose currency code matches `currency` exactly.
pub fn extract_quote(payload: &RatePayload, currency: &str) -> CurrencyQuote {
    payload
        .exchange_rate
        .iter()
        .find(|entry| entry.currency.as_deref() == Some(currency))
        .map(|entry| CurrencyQuote {
            sale: entry.sale_rate,
            purchase: entry.purchase_rate,
        })
        .unwrap_or_default()
}

/// Quotes for all requested currencies on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRates {
    pub date: DateKey,
    pub base_currency: Option<String>,
    /// Kept in the order currencies were requested.
    pub quotes: Vec<(String, CurrencyQuote)>,
}

impl DailyRates {
    pub fn from_payload(date: DateKey, payload: &RatePayload, currencies: &[String]) -> Self {
        let mut quotes: Vec<(String, CurrencyQuote)> = Vec::with_capacity(currencies.len());
        for currency in currencies {
            if quotes.iter().any(|(code, _)| code == currency) {
                continue;
            }
            quotes.push((currency.clone(), extract_quote(payload, currency)));
        }

        DailyRates {
            date,
            base_currency: payload.base_currency.clone(),
            quotes,
        }
    }

    pub fn quote(&self, currency: &str) -> Option<&CurrencyQuote> {
        self.quotes
            .iter()
            .find(|(code, _)| code == currency)
            .map(|(_, quote)| quote)
    }
}

struct QuoteMap<'a>(&'a [(String, CurrencyQuote)]);

impl Serialize for QuoteMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, quote) in self.0 {
            map.serialize_entry(code, quote)?;
        }
        map.end()
    }
}

// Serialized as `{"DD.MM.YYYY": {"USD": {...}, ...}}`
impl Serialize for DailyRates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &QuoteMap(&self.quotes))?;
        map.end()
    }
}

/// Per-day results, most recent date first.
pub type ResultSet = Vec<DailyRates>;

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn fetch_rates(&self, date: &DateKey) -> Result<RatePayload>;
}
