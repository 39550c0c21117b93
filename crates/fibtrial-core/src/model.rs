use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn of(value: u64) -> Self {
        if value % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Parity::Even => "even",
            Parity::Odd => "odd",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "even" => Some(Parity::Even),
            "odd" => Some(Parity::Odd),
            _ => None,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated value before it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibEntry {
    pub index: u32,
    pub value: u64,
    pub parity: Parity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub registered_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResultRow {
    pub id: i64,
    pub candidate_id: i64,
    pub sequence_index: u32,
    pub value: u64,
    pub parity: Parity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParityCounts {
    pub even: u64,
    pub odd: u64,
}

impl ParityCounts {
    pub fn total(&self) -> u64 {
        self.even + self.odd
    }
}

/// Row selection for `Store::list`. Empty filter selects everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultFilter {
    pub candidate_id: Option<i64>,
    pub parity: Option<Parity>,
}

impl ResultFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn candidate(mut self, id: i64) -> Self {
        self.candidate_id = Some(id);
        self
    }

    pub fn parity(mut self, parity: Parity) -> Self {
        self.parity = Some(parity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parity_roundtrips_through_text() {
        assert_eq!(Parity::parse("EVEN"), Some(Parity::Even));
        assert_eq!(Parity::parse(" odd "), Some(Parity::Odd));
        assert_eq!(Parity::parse("both"), None);
        assert_eq!(Parity::Odd.to_string(), "odd");
    }

    #[test]
    fn parity_serializes_lowercase() {
        let s = serde_json::to_string(&Parity::Even).unwrap();
        assert_eq!(s, "\"even\"");
    }

    #[test]
    fn filter_builder_sets_fields() {
        let f = ResultFilter::all().candidate(7).parity(Parity::Odd);
        assert_eq!(f.candidate_id, Some(7));
        assert_eq!(f.parity, Some(Parity::Odd));
    }
}
