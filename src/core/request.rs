use crate::MAX_DAYS;
use thiserror::Error;

/// Reasons a command line is rejected before anything is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Usage: {program} <number_of_days> [currencies...]")]
    MissingDays { program: String },

    #[error("You can only request rates for up to {} days.", MAX_DAYS)]
    TooManyDays(i64),

    #[error("Number of days must be at least 1.")]
    TooFewDays(i64),
}

/// A validated request for exchange rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatesRequest {
    pub days: u32,
    pub currencies: Vec<String>,
}

impl RatesRequest {
    pub fn resolve(
        program: &str,
        days: Option<i64>,
        currencies: Vec<String>,
        default_currencies: &[String],
    ) -> Result<Self, RequestError> {
        let days = days.ok_or_else(|| RequestError::MissingDays {
            program: program.to_string(),
        })?;
        if days > i64::from(MAX_DAYS) {
            return Err(RequestError::TooManyDays(days));
        }
        if days < 1 {
            return Err(RequestError::TooFewDays(days));
        }

        let currencies = if currencies.is_empty() {
            default_currencies.to_vec()
        } else {
            currencies
        };

        Ok(RatesRequest {
            days: days as u32,
            currencies,
        })
    }

    /// The command as recorded in the execution log.
    pub fn command_line(&self, program: &str) -> String {
        let mut parts = vec![program.to_string(), self.days.to_string()];
        parts.extend(self.currencies.iter().cloned());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        vec!["USD".to_string(), "EUR".to_string()]
    }

    #[test]
    fn test_default_currencies() {
        let request = RatesRequest::resolve("p24rates", Some(3), vec![], &defaults()).unwrap();
        assert_eq!(request.days, 3);
        assert_eq!(request.currencies, defaults());
        assert_eq!(request.command_line("p24rates"), "p24rates 3 USD EUR");
    }

    #[test]
    fn test_explicit_currencies() {
        let request = RatesRequest::resolve(
            "p24rates",
            Some(10),
            vec!["PLN".to_string(), "CHF".to_string()],
            &defaults(),
        )
        .unwrap();
        assert_eq!(request.days, 10);
        assert_eq!(request.command_line("p24rates"), "p24rates 10 PLN CHF");
    }

    #[test]
    fn test_missing_days() {
        let err = RatesRequest::resolve("p24rates", None, vec![], &defaults()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Usage: p24rates <number_of_days> [currencies...]"
        );
    }

    #[test]
    fn test_day_bounds() {
        let err = RatesRequest::resolve("p24rates", Some(11), vec![], &defaults()).unwrap_err();
        assert_eq!(err, RequestError::TooManyDays(11));
        assert_eq!(
            err.to_string(),
            "You can only request rates for up to 10 days."
        );

        let err = RatesRequest::resolve("p24rates", Some(0), vec![], &defaults()).unwrap_err();
        assert_eq!(err, RequestError::TooFewDays(0));
        assert!(matches!(
            RatesRequest::resolve("p24rates", Some(-2), vec![], &defaults()),
            Err(RequestError::TooFewDays(-2))
        ));
    }
}
