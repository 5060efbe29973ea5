//! Vocabularies shared by bill, member, and vote records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Congressional chamber.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chamber {
    House,
    Senate,
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chamber::House => write!(f, "House"),
            Chamber::Senate => write!(f, "Senate"),
        }
    }
}

impl FromStr for Chamber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "house" | "h" => Ok(Chamber::House),
            "senate" | "s" => Ok(Chamber::Senate),
            other => Err(format!("unknown chamber '{}'", other)),
        }
    }
}

/// Party codes as they appear in Congress.gov and the vote feeds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Party {
    #[serde(rename = "D")]
    Democrat,
    #[serde(rename = "R")]
    Republican,
    #[serde(rename = "I")]
    Independent,
    #[serde(rename = "ID")]
    IndependentDemocrat,
}

impl Party {
    /// Maps a raw party code to the closed vocabulary. Unknown codes yield
    /// `None` rather than a guess.
    pub fn from_code(raw: &str) -> Option<Party> {
        match raw.trim() {
            "D" => Some(Party::Democrat),
            "R" => Some(Party::Republican),
            "I" => Some(Party::Independent),
            "ID" => Some(Party::IndependentDemocrat),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Party::Democrat => "D",
            Party::Republican => "R",
            Party::Independent => "I",
            Party::IndependentDemocrat => "ID",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Legislation type path segment used by the `/bill` endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    Hr,
    S,
    Hjres,
    Sjres,
    Hconres,
    Sconres,
    Hres,
    Sres,
}

impl BillType {
    pub fn as_path(&self) -> &'static str {
        match self {
            BillType::Hr => "hr",
            BillType::S => "s",
            BillType::Hjres => "hjres",
            BillType::Sjres => "sjres",
            BillType::Hconres => "hconres",
            BillType::Sconres => "sconres",
            BillType::Hres => "hres",
            BillType::Sres => "sres",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for BillType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "hr" => Ok(BillType::Hr),
            "s" => Ok(BillType::S),
            "hjres" => Ok(BillType::Hjres),
            "sjres" => Ok(BillType::Sjres),
            "hconres" => Ok(BillType::Hconres),
            "sconres" => Ok(BillType::Sconres),
            "hres" => Ok(BillType::Hres),
            "sres" => Ok(BillType::Sres),
            _ => Err(format!(
                "unknown bill type '{}'. Valid types: hr, s, hjres, sjres, hconres, sconres, hres, sres",
                s
            )),
        }
    }
}
