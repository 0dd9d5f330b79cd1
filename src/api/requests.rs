//! Request payloads and structural validation
//!
//! Every inbound field is a string validated against a fixed regex before
//! anything else looks at it. A failing field answers with
//! `<field>: regular expression mismatch`, the first failing field wins.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

static NAME_SURNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{1,16} [A-Za-z]{1,16}$").expect("valid regex"));
static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("valid regex"));
static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}$").expect("valid regex"));
static CCV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("valid regex"));
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,10}[.][0-9]{2}$").expect("valid regex"));
static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid regex"));

fn check(field: &str, pattern: &Regex, value: &str) -> Result<(), String> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(format!("{}: regular expression mismatch", field))
    }
}

/// Card authorization payload
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeRequest {
    pub name_surname: String,
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    #[serde(rename = "CCV")]
    pub ccv: String,
    pub amount: String,
    pub currency: String,
}

impl AuthorizeRequest {
    /// Validate every field against its regex; all fields are required
    pub fn validate(&self) -> Result<(), String> {
        check("name_surname", &NAME_SURNAME_RE, &self.name_surname)?;
        check("card_number", &CARD_NUMBER_RE, &self.card_number)?;
        check("expiry_month", &EXPIRY_RE, &self.expiry_month)?;
        check("expiry_year", &EXPIRY_RE, &self.expiry_year)?;
        check("CCV", &CCV_RE, &self.ccv)?;
        check("amount", &AMOUNT_RE, &self.amount)?;
        check("currency", &CURRENCY_RE, &self.currency)?;
        Ok(())
    }
}

/// Capture/refund payload: a single decimal amount
#[derive(Debug, Clone, Deserialize)]
pub struct AmountRequest {
    pub amount: String,
}

impl AmountRequest {
    pub fn validate(&self) -> Result<(), String> {
        check("amount", &AMOUNT_RE, &self.amount)
    }
}
