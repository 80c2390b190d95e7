//! Benjamini-Hochberg adjustment of rank-sum p-values

/// Benjamini-Hochberg FDR adjustment.
/// R equivalent: p.adjust(method = "BH")
///
/// NaN entries (untested peptides) stay NaN and do not count towards the
/// number of tests.
pub fn benjamini_hochberg(pvalues: &[f64]) -> Vec<f64> {
    let mut tested: Vec<(usize, f64)> = pvalues
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, p)| !p.is_nan())
        .collect();

    let mut padj = vec![f64::NAN; pvalues.len()];
    let m = tested.len();
    if m == 0 {
        return padj;
    }

    // largest p first so the running minimum enforces monotonicity
    tested.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut running_min = 1.0_f64;
    for (pos, &(idx, p)) in tested.iter().enumerate() {
        let rank = m - pos;
        running_min = running_min.min(p * m as f64 / rank as f64);
        padj[idx] = running_min;
    }

    padj
}
