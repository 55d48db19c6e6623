/// Whether `a` and `b` are at most `max` edits apart. Lengths differing by
/// more than `max` are rejected without running the full table.
pub fn within(a: &str, b: &str, max: usize) -> bool {
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    if len_a.abs_diff(len_b) > max {
        return false;
    }
    strsim::levenshtein(a, b) <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_typo_is_tolerated() {
        assert!(within("volume", "volme", 2));
        assert!(within("same", "same", 0));
        assert!(!within("kitten", "sitting", 2));
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(within("größe", "grose", 2));
        assert!(!within("größe", "grose", 1));
    }

    #[test]
    fn length_gap_short_circuits() {
        assert!(!within("brightness", "vol", 2));
        assert!(within("vol", "volme", 2));
    }
}
