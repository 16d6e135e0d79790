//! # Plate Normalizer
//!
//! One canonical spelling of a license plate, shared by vehicle lookup,
//! plan-vehicle linking and transaction creation.
//!
//! ```text
//! "ab-12 34"  ──┐
//! "AB 1234"   ──┼──► normalize_plate ──► "AB1234"
//! "Ab-1234"   ──┘
//! ```

/// Removes every space and hyphen and uppercases the rest.
///
/// Pure and total: empty input yields an empty string. Rejecting empty
/// plates is the caller's job (see [`crate::validation::validate_plate`]).
///
/// ## Example
/// ```rust
/// use powertrack_core::plate::normalize_plate;
///
/// assert_eq!(normalize_plate("ab-12 34"), "AB1234");
/// assert_eq!(normalize_plate(""), "");
/// ```
pub fn normalize_plate(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_and_hyphens_are_stripped() {
        assert_eq!(normalize_plate("ab-12 34"), "AB1234");
        assert_eq!(normalize_plate("  AB - 1234  "), "AB1234");
        assert_eq!(normalize_plate("x--y"), "XY");
    }

    #[test]
    fn test_equivalent_spellings_agree() {
        assert_eq!(normalize_plate("ab-12 34"), normalize_plate("AB1234"));
    }

    #[test]
    fn test_idempotent() {
        for raw in ["ab-12 34", "AB1234", "", "-", "z 9-9 z"] {
            let once = normalize_plate(raw);
            assert_eq!(normalize_plate(&once), once);
        }
    }

    #[test]
    fn test_empty_and_separator_only() {
        assert_eq!(normalize_plate(""), "");
        assert_eq!(normalize_plate(" - "), "");
    }
}
