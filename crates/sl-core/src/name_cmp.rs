//! Name comparison strategy
//!
//! MySQL folds table names depending on `lower_case_table_names`. Every
//! component asks one [`NameComparison`] value instead of branching on a
//! boolean at each comparison site.

/// How object names are compared and keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameComparison {
    /// Names are compared byte-for-byte
    CaseSensitive,
    /// Names are folded to lowercase before comparing
    #[default]
    CaseInsensitive,
}

impl NameComparison {
    /// Build from a `case_sensitive` flag
    pub fn from_case_sensitive(case_sensitive: bool) -> Self {
        if case_sensitive {
            Self::CaseSensitive
        } else {
            Self::CaseInsensitive
        }
    }

    /// Build from a `case_insensitive` flag
    pub fn from_case_insensitive(case_insensitive: bool) -> Self {
        Self::from_case_sensitive(!case_insensitive)
    }

    /// Whether names keep their case
    pub fn is_case_sensitive(self) -> bool {
        matches!(self, Self::CaseSensitive)
    }

    /// Map key for a name under this strategy
    pub fn key(self, name: &str) -> String {
        match self {
            Self::CaseSensitive => name.to_string(),
            Self::CaseInsensitive => name.to_lowercase(),
        }
    }

    /// Compare two names under this strategy
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            Self::CaseSensitive => a == b,
            Self::CaseInsensitive => a.to_lowercase() == b.to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_key_folds() {
        let cmp = NameComparison::CaseInsensitive;
        assert_eq!(cmp.key("Orders"), "orders");
        assert!(cmp.matches("Orders", "ORDERS"));
    }

    #[test]
    fn test_case_sensitive_keeps_case() {
        let cmp = NameComparison::from_case_sensitive(true);
        assert_eq!(cmp.key("Orders"), "Orders");
        assert!(!cmp.matches("Orders", "orders"));
        assert!(cmp.matches("Orders", "Orders"));
    }

    #[test]
    fn test_from_case_insensitive() {
        assert_eq!(
            NameComparison::from_case_insensitive(true),
            NameComparison::CaseInsensitive
        );
        assert!(NameComparison::from_case_insensitive(false).is_case_sensitive());
    }
}
