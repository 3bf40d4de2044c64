//! Human-facing invoice references (`FAC-2025-0001`).

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use facturation_core::DomainError;

pub const DEFAULT_REFERENCE_PREFIX: &str = "FAC";

/// Year-scoped invoice reference: `<prefix>-<year>-<sequence>`.
///
/// Sequences restart at 1 every year and are rendered with at least four digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceReference {
    prefix: String,
    year: i32,
    sequence: u32,
}

impl InvoiceReference {
    pub fn new(prefix: impl Into<String>, year: i32, sequence: u32) -> Result<Self, DomainError> {
        let prefix = prefix.into();
        if prefix.is_empty() || prefix.contains('-') {
            return Err(DomainError::validation(
                "reference prefix must be non-empty and must not contain '-'",
            ));
        }
        if sequence == 0 {
            return Err(DomainError::validation("reference sequence starts at 1"));
        }
        Ok(Self {
            prefix,
            year,
            sequence,
        })
    }

    /// First reference of a year.
    pub fn first(prefix: impl Into<String>, year: i32) -> Result<Self, DomainError> {
        Self::new(prefix, year, 1)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The reference following this one within the same year.
    pub fn next(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            year: self.year,
            sequence: self.sequence + 1,
        }
    }
}

impl core::fmt::Display for InvoiceReference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}-{:04}", self.prefix, self.year, self.sequence)
    }
}

impl FromStr for InvoiceReference {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::validation(format!("invalid invoice reference: {s}"));
        let mut parts = s.trim().split('-');
        let (Some(prefix), Some(year), Some(seq), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let sequence: u32 = seq.parse().map_err(|_| invalid())?;
        Self::new(prefix, year, sequence)
    }
}

impl TryFrom<String> for InvoiceReference {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InvoiceReference> for String {
    fn from(value: InvoiceReference) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_four_digit_sequence() {
        let r = InvoiceReference::first("FAC", 2025).unwrap();
        assert_eq!(r.to_string(), "FAC-2025-0001");
        assert_eq!(r.next().to_string(), "FAC-2025-0002");
    }

    #[test]
    fn sequences_past_four_digits_keep_growing() {
        let r = InvoiceReference::new("FAC", 2025, 12345).unwrap();
        assert_eq!(r.to_string(), "FAC-2025-12345");
    }

    #[test]
    fn parses_rendered_references() {
        let r: InvoiceReference = "FAC-2024-0042".parse().unwrap();
        assert_eq!(r.prefix(), "FAC");
        assert_eq!(r.year(), 2024);
        assert_eq!(r.sequence(), 42);
    }

    #[test]
    fn rejects_malformed_references() {
        assert!("FAC-2024".parse::<InvoiceReference>().is_err());
        assert!("FAC-20x4-0001".parse::<InvoiceReference>().is_err());
        assert!("FAC-2024-0000".parse::<InvoiceReference>().is_err());
        assert!("A-B-2024-0001".parse::<InvoiceReference>().is_err());
    }
}
