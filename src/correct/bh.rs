//! Benjamini-Hochberg false discovery rate correction.

/// Apply Benjamini-Hochberg FDR correction to a p-value column.
///
/// The step-up procedure sorts the available p-values ascending and assigns
/// q[i] = min(p[i] * m / rank[i], q[i+1]), clipped at 1.0, where m counts the
/// non-missing p-values. Missing inputs yield missing outputs and do not
/// count toward m. The output column keeps the input order.
pub fn correct_bh(p_values: &[Option<f64>]) -> Vec<Option<f64>> {
    // Indices of the available p-values, sorted ascending by value.
    let mut indices: Vec<usize> = (0..p_values.len())
        .filter(|&i| p_values[i].is_some())
        .collect();
    let m = indices.len();
    if m == 0 {
        return vec![None; p_values.len()];
    }
    indices.sort_by(|&a, &b| {
        p_values[a]
            .partial_cmp(&p_values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let m_f64 = m as f64;
    let mut q_sorted = vec![0.0; m];

    // Start from the largest p-value and take the running minimum backwards.
    q_sorted[m - 1] = p_values[indices[m - 1]].unwrap_or(f64::NAN).min(1.0);
    for i in (0..m - 1).rev() {
        let rank = (i + 1) as f64;
        let adjusted = p_values[indices[i]].unwrap_or(f64::NAN) * m_f64 / rank;
        q_sorted[i] = adjusted.min(q_sorted[i + 1]).min(1.0);
    }

    let mut q_values = vec![None; p_values.len()];
    for (i, &orig_idx) in indices.iter().enumerate() {
        q_values[orig_idx] = Some(q_sorted[i]);
    }
    q_values
}
