/// Split text on single spaces, lowercase each piece and keep pieces longer
/// than one character.
///
/// Only `' '` separates terms; tabs and newlines stay inside a term. Dropping
/// one-character pieces also drops standalone punctuation such as `-` or `&`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(' ')
        .filter(|piece| piece.chars().count() > 1)
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_drops_short_pieces() {
        assert_eq!(tokenize("Lincoln & Sons K Academy"), vec!["lincoln", "sons", "academy"]);
    }

    #[test]
    fn splits_on_space_only() {
        assert_eq!(tokenize("Saint\tPaul  Central"), vec!["saint\tpaul", "central"]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        assert_eq!(tokenize("Lake Park Lake"), vec!["lake", "park", "lake"]);
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
