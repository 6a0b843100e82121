//! Kruskal-Wallis H-test.

use super::{check_groups, TestFailure};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Kruskal-Wallis rank test across two or more independent groups.
///
/// Tests H0: all groups come from the same distribution, using ranks of the
/// pooled values (ties get average ranks, with the standard tie correction).
/// H is compared against a chi-squared distribution with k-1 degrees of
/// freedom.
///
/// Returns the p-value, or the reason the statistic is undefined.
pub fn kruskal_wallis(groups: &[Vec<f64>]) -> Result<f64, TestFailure> {
    check_groups(groups)?;

    let pooled: Vec<f64> = groups.iter().flatten().copied().collect();
    let n_total = pooled.len();
    let ranks = average_ranks(&pooled);

    let mut h = 0.0;
    let mut offset = 0;
    for group in groups {
        let rank_sum: f64 = ranks[offset..offset + group.len()].iter().sum();
        h += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }
    let n = n_total as f64;
    h = 12.0 / (n * (n + 1.0)) * h - 3.0 * (n + 1.0);

    let tie_correction = 1.0 - tie_term(&pooled) / (n.powi(3) - n);
    if tie_correction == 0.0 {
        // Every pooled value is identical.
        return Err(TestFailure::ConstantInput);
    }
    h /= tie_correction;

    let df = (groups.len() - 1) as f64;
    let dist = ChiSquared::new(df).map_err(|_| TestFailure::ConstantInput)?;
    Ok(1.0 - dist.cdf(h))
}

/// Ranks of the values (1-based), with tied values sharing their average
/// rank.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let average = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = average;
        }
        i = j + 1;
    }
    ranks
}

/// Sum of t^3 - t over groups of tied values.
fn tie_term(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut total = 0.0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        let t = (j - i + 1) as f64;
        total += t.powi(3) - t;
        i = j + 1;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_three_groups_reference_value() {
        // scipy.stats.kruskal: H = 7.9390, p = 0.018882
        let groups = vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 3.0, 4.0, 5.0],
            vec![6.0, 7.0, 8.0, 9.0],
        ];
        let p = kruskal_wallis(&groups).unwrap();
        assert_relative_eq!(p, 0.01888243851072661, epsilon = 1e-10);
    }

    #[test]
    fn test_two_groups_reference_value() {
        let groups = vec![vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0]];
        let p = kruskal_wallis(&groups).unwrap();
        assert_relative_eq!(p, 0.2611545597418332, epsilon = 1e-10);
    }

    #[test]
    fn test_tie_correction_reference_value() {
        let groups = vec![vec![1.0, 1.0, 2.0], vec![2.0, 3.0, 3.0]];
        let p = kruskal_wallis(&groups).unwrap();
        assert_relative_eq!(p, 0.06788915486182905, epsilon = 1e-9);
    }

    #[test]
    fn test_average_ranks() {
        let ranks = average_ranks(&[3.0, 1.0, 4.0, 1.0]);
        assert_eq!(ranks, vec![3.0, 1.5, 4.0, 1.5]);
    }

    #[test]
    fn test_all_identical_undefined() {
        let groups = vec![vec![2.0, 2.0], vec![2.0, 2.0, 2.0]];
        assert_eq!(kruskal_wallis(&groups), Err(TestFailure::ConstantInput));
    }

    #[test]
    fn test_single_group_rejected() {
        let groups = vec![vec![1.0, 2.0]];
        assert_eq!(
            kruskal_wallis(&groups),
            Err(TestFailure::TooFewGroups { available: 1 })
        );
    }

    #[test]
    fn test_empty_group_rejected() {
        let groups = vec![vec![], vec![1.0, 2.0]];
        assert_eq!(
            kruskal_wallis(&groups),
            Err(TestFailure::EmptyGroup { index: 0 })
        );
    }
}
