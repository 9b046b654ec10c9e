use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "CFA";

/// Salary or budget bounds attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    String::from(DEFAULT_CURRENCY)
}

impl AmountRange {
    pub fn new(min: Option<i64>, max: Option<i64>, currency: Option<String>) -> Self {
        let currency = currency
            .map(|currency| currency.trim().to_string())
            .filter(|currency| !currency.is_empty())
            .unwrap_or_else(default_currency);

        Self { min, max, currency }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(format!("minimum amount {} is greater than maximum {}", min, max));
            }
        }
        if self.min.map_or(false, |min| min < 0) || self.max.map_or(false, |max| max < 0) {
            return Err(String::from("amounts cannot be negative"));
        }

        Ok(())
    }

    /// Human readable bounds, or `None` when neither bound is known.
    pub fn describe(&self) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(format!("{} - {} {}", min, max, self.currency)),
            (Some(min), None) => Some(format!("from {} {}", min, self.currency)),
            (None, Some(max)) => Some(format!("up to {} {}", max, self.currency)),
            (None, None) => None,
        }
    }
}
