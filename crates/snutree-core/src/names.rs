//! Display name helpers.

/// Similarity at or above which a preferred name is treated as a variant of
/// the last name rather than a real first name.
const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Combines a member's names into the name drawn on the tree.
///
/// The preferred name replaces the first name when it is present, differs
/// from the first name and is not too similar to the last name.
pub fn combine_names(first: &str, preferred: Option<&str>, last: &str) -> String {
    let first = match preferred {
        Some(preferred)
            if preferred != first && similarity(preferred, last) < SIMILARITY_THRESHOLD =>
        {
            preferred
        }
        _ => first,
    };
    format!("{first} {last}")
}

/// Ratcliff/Obershelp similarity ratio `2·M / (|a| + |b|)`, where `M` is the
/// number of characters in matching blocks. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let Some((i, j, len)) = longest_match(a, b) else {
        return 0;
    };
    len + matching_characters(&a[..i], &b[..j])
        + matching_characters(&a[i + len..], &b[j + len..])
}

/// Longest common substring, earliest in `a` then earliest in `b` on ties.
fn longest_match(a: &[char], b: &[char]) -> Option<(usize, usize, usize)> {
    let mut best: Option<(usize, usize, usize)> = None;
    let mut previous = vec![0usize; b.len() + 1];
    for i in 0..a.len() {
        let mut current = vec![0usize; b.len() + 1];
        for j in 0..b.len() {
            if a[i] == b[j] {
                let len = previous[j] + 1;
                current[j + 1] = len;
                let start = (i + 1 - len, j + 1 - len);
                let better = match best {
                    None => true,
                    Some((bi, bj, blen)) => len > blen || (len == blen && start < (bi, bj)),
                };
                if better {
                    best = Some((start.0, start.1, len));
                }
            }
        }
        previous = current;
    }
    best
}
