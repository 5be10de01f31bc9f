use crate::errors::NotionError;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of the target Notion database.
///
/// Notion shows database ids both as 32 bare hex digits (in share URLs) and in
/// the hyphenated 8-4-4-4-12 form. Either is accepted; the hyphenated
/// lowercase form is always what goes on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatabaseId(Uuid);

impl DatabaseId {
    pub fn parse(raw: &str) -> Result<Self, NotionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NotionError::InvalidDatabaseId("empty".into()));
        }

        Uuid::try_parse(trimmed)
            .map(DatabaseId)
            .map_err(|e| NotionError::InvalidDatabaseId(format!("{trimmed}: {e}")))
    }
}

impl FromStr for DatabaseId {
    type Err = NotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatabaseId::parse(s)
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "1a2b3c4d-5e6f-7a8b-9c0d-1e2f3a4b5c6d";

    #[test]
    fn test_parse_compact_form() {
        let id = DatabaseId::parse("1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d").unwrap();
        assert_eq!(id.to_string(), CANONICAL);
    }

    #[test]
    fn test_parse_hyphenated_uppercase_with_whitespace() {
        let id = DatabaseId::parse("  1A2B3C4D-5E6F-7A8B-9C0D-1E2F3A4B5C6D\n").unwrap();
        assert_eq!(id.to_string(), CANONICAL);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            DatabaseId::parse("not-a-database"),
            Err(NotionError::InvalidDatabaseId(_))
        ));
        assert!(matches!(
            DatabaseId::parse(""),
            Err(NotionError::InvalidDatabaseId(_))
        ));
    }
}
