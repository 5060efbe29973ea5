//! Locating the payload inside Congress.gov response envelopes.
//!
//! The API nests resources under a key that usually, but not always, matches
//! the resource name: `{"bill": {...}}`, `{"bills": [...]}`, or occasionally a
//! generic `{"results": [...]}`. Which rule matched is reported so callers can
//! log it.

use serde_json::Value;

/// Outcome of [`unwrap_payload`]. Each variant records which rule matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unwrapped<'a> {
    /// The expected key held a mapping or sequence.
    Direct(&'a Value),
    /// `<key>s` held a sequence.
    Plural(&'a Value),
    /// `results` held a sequence.
    Results(&'a Value),
    /// Nothing matched. The envelope itself is never returned as a guess.
    NotFound,
}

impl<'a> Unwrapped<'a> {
    pub fn payload(self) -> Option<&'a Value> {
        match self {
            Unwrapped::Direct(v) | Unwrapped::Plural(v) | Unwrapped::Results(v) => Some(v),
            Unwrapped::NotFound => None,
        }
    }

    /// Short label of the rule that matched, for diagnostics.
    pub fn path(&self) -> &'static str {
        match self {
            Unwrapped::Direct(_) => "direct",
            Unwrapped::Plural(_) => "plural",
            Unwrapped::Results(_) => "results",
            Unwrapped::NotFound => "not-found",
        }
    }
}

/// Extracts the payload for `expected_key` from a response envelope.
pub fn unwrap_payload<'a>(envelope: &'a Value, expected_key: &str) -> Unwrapped<'a> {
    let Some(map) = envelope.as_object() else {
        tracing::debug!("Cannot unwrap non-object envelope for key '{}'", expected_key);
        return Unwrapped::NotFound;
    };

    if let Some(payload) = map.get(expected_key) {
        if payload.is_object() || payload.is_array() {
            tracing::debug!("Unwrapped using direct key '{}'", expected_key);
            return Unwrapped::Direct(payload);
        }
        tracing::warn!(
            "Payload under key '{}' is neither object nor array",
            expected_key
        );
    }

    let plural_key = format!("{}s", expected_key);
    if let Some(payload) = map.get(&plural_key) {
        if payload.is_array() {
            tracing::debug!("Unwrapped using plural key '{}'", plural_key);
            return Unwrapped::Plural(payload);
        }
        tracing::warn!("Payload under plural key '{}' is not an array", plural_key);
    }

    if let Some(payload) = map.get("results").filter(|v| v.is_array()) {
        tracing::debug!("Unwrapped using 'results' key for '{}'", expected_key);
        return Unwrapped::Results(payload);
    }

    tracing::warn!(
        "Could not unwrap payload for key '{}' in envelope with keys: {:?}",
        expected_key,
        map.keys().collect::<Vec<_>>()
    );
    Unwrapped::NotFound
}
