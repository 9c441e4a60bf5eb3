//! Restaurant name matching policy
//!
//! Every equality check on restaurant names (lookup, find-or-create,
//! orphan grouping) goes through this one normalization so the policy
//! cannot drift between components.

/// Normalize a restaurant name for matching: trim, then casefold.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_casefolds() {
        assert_eq!(normalize_name("  Cafe Luz  "), "cafe luz");
        assert_eq!(normalize_name("cafe luz"), "cafe luz");
        assert_eq!(normalize_name("CAFÉ LUZ"), "café luz");
    }

    #[test]
    fn test_normalize_empty_and_whitespace() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
    }
}
