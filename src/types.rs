//! Request-scoped value types.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a view on the server: the owning workbook plus the view itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewIdentifier {
    pub workbook_id: String,
    pub view_id: String,
}

impl ViewIdentifier {
    pub fn new(workbook_id: impl Into<String>, view_id: impl Into<String>) -> Self {
        Self {
            workbook_id: workbook_id.into(),
            view_id: view_id.into(),
        }
    }
}

/// A single `name=value` filter for a rendered image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParameter {
    pub name: String,
    pub value: String,
}

impl FilterParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The two filters accepted by a filtered image render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFilters {
    pub first: FilterParameter,
    pub second: FilterParameter,
}

impl ImageFilters {
    /// Build from the positional `param1, param2, val1, val2` form.
    pub fn new(
        param1: impl Into<String>,
        param2: impl Into<String>,
        val1: impl Into<String>,
        val2: impl Into<String>,
    ) -> Self {
        Self {
            first: FilterParameter::new(param1, val1),
            second: FilterParameter::new(param2, val2),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterParameter> {
        [&self.first, &self.second].into_iter()
    }
}

/// A pre-issued trusted-access ticket.
///
/// The value is kept secret: `Debug` and `Display` never print it.
#[derive(Clone)]
pub struct TicketToken(SecretString);

impl TicketToken {
    pub fn new(ticket: impl Into<String>) -> Self {
        Self(SecretString::from(ticket.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl fmt::Debug for TicketToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TicketToken([REDACTED])")
    }
}

impl From<&str> for TicketToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TicketToken {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_filters_pair_names_with_values() {
        let filters = ImageFilters::new("Region", "Year", "West", "2024");
        let pairs: Vec<_> = filters
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Region", "West"), ("Year", "2024")]);
    }

    #[test]
    fn ticket_token_is_redacted_in_debug() {
        let ticket = TicketToken::new("super-secret-ticket");
        let rendered = format!("{ticket:?}");
        assert!(!rendered.contains("super-secret-ticket"));
        assert_eq!(ticket.expose(), "super-secret-ticket");
        assert!(TicketToken::from("").is_empty());
    }
}
