//! Caller-input checks applied before anything is sent upstream.

use congress_api::types::{BillType, Chamber};

use crate::error::CongressError;

/// Longest search string, in bytes, forwarded to Congress.gov.
pub const MAX_SEARCH_LENGTH: usize = 200;

/// Postal codes with voting or delegate seats in Congress.
pub const VALID_STATES: &[&str] = &[
    "AK", "AL", "AR", "AS", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "GU", "HI", "IA",
    "ID", "IL", "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MP", "MS", "MT",
    "NC", "ND", "NE", "NH", "NJ", "NM", "NV", "NY", "OH", "OK", "OR", "PA", "PR", "RI", "SC",
    "SD", "TN", "TX", "UT", "VA", "VI", "VT", "WA", "WI", "WV", "WY",
];

/// Drops control characters, trims, and rejects text that ends up empty or
/// arrives longer than `max_len` bytes.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, CongressError> {
    if input.len() > max_len {
        return Err(CongressError::InvalidInput(format!(
            "text is {} bytes; the limit is {}",
            input.len(),
            max_len
        )));
    }
    let kept: String = input.chars().filter(|c| !c.is_control()).collect();
    let kept = kept.trim();
    if kept.is_empty() {
        return Err(CongressError::InvalidInput(
            "text has no printable content".to_string(),
        ));
    }
    Ok(kept.to_string())
}

/// Bill keywords and member names share one length limit.
pub fn validate_search(input: &str) -> Result<String, CongressError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Normalizes a two-letter state or territory code to upper case.
pub fn validate_state(input: &str) -> Result<String, CongressError> {
    let code = input.trim().to_ascii_uppercase();
    match VALID_STATES.binary_search(&code.as_str()) {
        Ok(_) => Ok(code),
        Err(_) => Err(CongressError::InvalidInput(format!(
            "'{}' is not a state or territory with a seat in Congress",
            input.trim()
        ))),
    }
}

/// Validate a bill type; accepts dotted forms such as `H.J.Res.`.
pub fn validate_bill_type(input: &str) -> Result<BillType, CongressError> {
    input.parse::<BillType>().map_err(CongressError::InvalidInput)
}

/// Validate a chamber name: `house`/`senate`, case-insensitive.
pub fn validate_chamber(input: &str) -> Result<Chamber, CongressError> {
    input.parse::<Chamber>().map_err(CongressError::InvalidInput)
}

/// Validate a member identifier: non-empty, no whitespace inside.
pub fn validate_member_id(input: &str) -> Result<String, CongressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CongressError::InvalidInput("member id is required".to_string()));
    }
    if trimmed.chars().any(|c| c.is_whitespace() || c.is_ascii_control()) {
        return Err(CongressError::InvalidInput(format!(
            "member id '{}' contains whitespace or control characters",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}
