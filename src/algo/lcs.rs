//! Longest Common Subsequence (LCS) over sibling identities
//!
//! Classic dynamic-programming LCS used by the keyed reconciler to find the
//! largest set of siblings that keep their relative order across an update.
//! Members of the LCS are never moved.
//!
//! # Complexity
//!
//! - Time: O(n * m) over the middle section
//! - Space: O(n * m) for the DP table
//!
//! Common prefix and suffix are stripped first, so the usual "append one" or
//! "edit one item in place" updates never build a table at all.

/// Compute the LCS of two sequences.
///
/// Returns `(old_idx, new_idx)` pairs in increasing order on both sides.
pub fn lcs_pairs<T: Eq>(old: &[T], new: &[T]) -> Vec<(usize, usize)> {
    let n = old.len();
    let m = new.len();

    // Optimization: strip common prefix
    let mut prefix_len = 0;
    while prefix_len < n && prefix_len < m && old[prefix_len] == new[prefix_len] {
        prefix_len += 1;
    }

    // Optimization: strip common suffix
    let mut suffix_len = 0;
    while suffix_len < (n - prefix_len)
        && suffix_len < (m - prefix_len)
        && old[n - 1 - suffix_len] == new[m - 1 - suffix_len]
    {
        suffix_len += 1;
    }

    let mut lcs: Vec<(usize, usize)> = (0..prefix_len).map(|i| (i, i)).collect();

    let old_mid = &old[prefix_len..n - suffix_len];
    let new_mid = &new[prefix_len..m - suffix_len];
    for (oi, ni) in dp_lcs(old_mid, new_mid) {
        lcs.push((oi + prefix_len, ni + prefix_len));
    }

    for i in 0..suffix_len {
        lcs.push((n - suffix_len + i, m - suffix_len + i));
    }

    lcs
}

/// DP table plus backtrack.
fn dp_lcs<T: Eq>(old: &[T], new: &[T]) -> Vec<(usize, usize)> {
    let n = old.len();
    let m = new.len();
    if n == 0 || m == 0 {
        return Vec::new();
    }

    // dp[i * width + j] = length of LCS of old[0..i] and new[0..j]
    let width = m + 1;
    let mut dp = vec![0usize; (n + 1) * width];

    for i in 1..=n {
        for j in 1..=m {
            dp[i * width + j] = if old[i - 1] == new[j - 1] {
                dp[(i - 1) * width + (j - 1)] + 1
            } else {
                dp[(i - 1) * width + j].max(dp[i * width + (j - 1)])
            };
        }
    }

    // Backtrack to find LCS
    let mut lcs = Vec::with_capacity(dp[n * width + m]);
    let mut i = n;
    let mut j = m;

    while i > 0 && j > 0 {
        if old[i - 1] == new[j - 1] {
            lcs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[(i - 1) * width + j] > dp[i * width + (j - 1)] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    lcs.reverse();
    lcs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<&'a str> {
        lcs_pairs(old, new).into_iter().map(|(o, _)| old[o]).collect()
    }

    #[test]
    fn test_empty_sequences() {
        assert!(lcs_pairs::<u8>(&[], &[]).is_empty());
        assert!(lcs_pairs(&[1, 2], &[]).is_empty());
        assert!(lcs_pairs(&[], &[1, 2]).is_empty());
    }

    #[test]
    fn test_no_changes() {
        assert_eq!(lcs_pairs(&[1, 2, 3], &[1, 2, 3]), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_single_insert() {
        assert_eq!(matched(&["a", "c"], &["a", "b", "c"]), vec!["a", "c"]);
    }

    #[test]
    fn test_deletions_and_append() {
        let old = ["A", "B", "C", "D", "E"];
        let new = ["B", "D", "E", "F"];
        assert_eq!(matched(&old, &new), vec!["B", "D", "E"]);
    }

    #[test]
    fn test_rotation_keeps_longest_run() {
        // [A, B, C] -> [C, A, B]: only C has to move
        assert_eq!(matched(&["A", "B", "C"], &["C", "A", "B"]), vec!["A", "B"]);
    }

    #[test]
    fn test_complete_reverse() {
        let pairs = lcs_pairs(&[1, 2, 3], &[3, 2, 1]);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_pairs_are_increasing() {
        let old = [5, 1, 4, 2, 3, 9, 7];
        let new = [1, 2, 9, 3, 5, 7];
        let pairs = lcs_pairs(&old, &new);
        for w in pairs.windows(2) {
            assert!(w[0].0 < w[1].0 && w[0].1 < w[1].1);
        }
        for &(o, n) in &pairs {
            assert_eq!(old[o], new[n]);
        }
        assert_eq!(pairs.len(), 4);
    }
}
