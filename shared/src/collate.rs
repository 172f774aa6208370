//! Human-friendly string ordering for names shown in the card.
//!
//! Comparison ignores case and diacritics first ("Éric" sits next to
//! "eric", before "Zoé"). Names equal under that rule put lowercase
//! before uppercase, as browser collation does ("a" < "A"). The raw
//! strings settle anything left, so only identical input compares equal.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Primary collation key: NFD, combining marks dropped, lowercased.
#[must_use]
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(&fold(b))
        .then_with(|| case_pattern(a).cmp(case_pattern(b)))
        .then_with(|| a.cmp(b))
}

// `true` per uppercase letter, so lowercase sorts first.
fn case_pattern(text: &str) -> impl Iterator<Item = bool> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by(|a, b| compare(a, b));
        names
    }

    #[test]
    fn case_does_not_split_names() {
        assert_eq!(
            sorted(vec!["bedroom", "Attic", "attic 2", "Bathroom"]),
            vec!["Attic", "attic 2", "Bathroom", "bedroom"]
        );
    }

    #[test]
    fn accents_sort_with_their_base_letter() {
        assert_eq!(
            sorted(vec!["Salon", "Entrée", "Étage", "Garage"]),
            vec!["Entrée", "Étage", "Garage", "Salon"]
        );
    }

    #[test]
    fn lowercase_sorts_before_uppercase() {
        assert_eq!(compare("a", "A"), Ordering::Less);
        assert_eq!(
            sorted(vec!["Salon", "salon", "SALON", "sAlon"]),
            vec!["salon", "sAlon", "Salon", "SALON"]
        );
        assert_eq!(compare("same", "same"), Ordering::Equal);
    }

    proptest! {
        #[test]
        fn compare_is_antisymmetric(a in "\\PC{0,12}", b in "\\PC{0,12}") {
            prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        }

        #[test]
        fn equal_only_for_identical_input(a in "\\PC{0,12}", b in "\\PC{0,12}") {
            prop_assert_eq!(compare(&a, &b) == Ordering::Equal, a == b);
        }
    }
}
