//! People whose attendance is tracked, plus input validation for them.
//!
//! The struct is duplicated from the `db` crate's row model because `core`
//! must have zero internal deps.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Maximum length of a person's full name.
pub const MAX_FULL_NAME_LENGTH: usize = 200;

/// Maximum length of an identity document number.
pub const MAX_DOCUMENT_NUMBER_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: DbId,
    pub full_name: String,
    pub document_number: String,
    pub active: bool,
}

/// Input for creating a person.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
    pub full_name: String,
    pub document_number: String,
}

impl NewPerson {
    /// Trim both fields and validate them.
    pub fn normalized(&self) -> Result<NewPerson, String> {
        let person = NewPerson {
            full_name: collapse_whitespace(&self.full_name),
            document_number: self.document_number.trim().to_string(),
        };
        validate_full_name(&person.full_name)?;
        validate_document_number(&person.document_number)?;
        Ok(person)
    }
}

/// Full name must be non-empty and within the length limit.
pub fn validate_full_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Full name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(format!(
            "Full name exceeds maximum length of {MAX_FULL_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Document numbers are alphanumeric with optional `-` separators.
pub fn validate_document_number(number: &str) -> Result<(), String> {
    if number.is_empty() {
        return Err("Document number cannot be empty".to_string());
    }
    if number.len() > MAX_DOCUMENT_NUMBER_LENGTH {
        return Err(format!(
            "Document number exceeds maximum length of {MAX_DOCUMENT_NUMBER_LENGTH} characters"
        ));
    }
    if !number
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(format!(
            "Invalid document number '{number}'. Only letters, digits and '-' are allowed"
        ));
    }
    Ok(())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, doc: &str) -> NewPerson {
        NewPerson {
            full_name: name.to_string(),
            document_number: doc.to_string(),
        }
    }

    #[test]
    fn normalized_trims_and_collapses() {
        let person = input("  Ana   María  Soto ", " 12345678 ").normalized().unwrap();
        assert_eq!(person.full_name, "Ana María Soto");
        assert_eq!(person.document_number, "12345678");
    }

    #[test]
    fn empty_name_rejected() {
        let err = input("   ", "123").normalized().unwrap_err();
        assert!(err.contains("Full name"));
    }

    #[test]
    fn long_name_rejected() {
        assert!(validate_full_name(&"x".repeat(MAX_FULL_NAME_LENGTH + 1)).is_err());
        assert!(validate_full_name(&"x".repeat(MAX_FULL_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn document_number_charset() {
        assert!(validate_document_number("AB-1234").is_ok());
        assert!(validate_document_number("12 34").is_err());
        assert!(validate_document_number("12.345").is_err());
        assert!(validate_document_number("").is_err());
    }
}
