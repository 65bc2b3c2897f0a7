//! Exact squared Euclidean distance transform (Felzenszwalb & Huttenlocher 2012).
//!
//! Used by mask erosion/dilation so that both run in O(size²) regardless of radius.

/// For every cell, the squared distance to the nearest cell equal to `target`.
///
/// Cells outside the grid never count as targets. If no cell equals `target`
/// every distance is `f64::INFINITY`.
pub fn squared_distance_to(cells: &[bool], size: usize, target: bool) -> Vec<f64> {
    debug_assert_eq!(cells.len(), size * size);

    let mut dist: Vec<f64> = cells
        .iter()
        .map(|&c| if c == target { 0.0 } else { f64::INFINITY })
        .collect();

    let mut line = vec![0.0f64; size];
    let mut out = vec![0.0f64; size];

    // Rows.
    for y in 0..size {
        let row = &mut dist[y * size..(y + 1) * size];
        line.copy_from_slice(row);
        transform_1d(&line, &mut out);
        row.copy_from_slice(&out);
    }

    // Columns.
    for x in 0..size {
        for y in 0..size {
            line[y] = dist[y * size + x];
        }
        transform_1d(&line, &mut out);
        for y in 0..size {
            dist[y * size + x] = out[y];
        }
    }

    dist
}

/// 1D lower envelope of parabolas rooted at every finite sample of `f`.
fn transform_1d(f: &[f64], out: &mut [f64]) {
    let n = f.len();
    // Roots of the parabolas in the envelope and the left boundary of each.
    let mut roots: Vec<usize> = Vec::with_capacity(n);
    let mut bounds: Vec<f64> = Vec::with_capacity(n);

    for q in 0..n {
        if !f[q].is_finite() {
            continue;
        }
        while let (Some(&p), Some(&left)) = (roots.last(), bounds.last()) {
            if intersection(f, p, q) <= left {
                roots.pop();
                bounds.pop();
            } else {
                break;
            }
        }
        let left = match roots.last() {
            Some(&p) => intersection(f, p, q),
            None => f64::NEG_INFINITY,
        };
        roots.push(q);
        bounds.push(left);
    }

    if roots.is_empty() {
        out.fill(f64::INFINITY);
        return;
    }

    let mut k = 0;
    for (q, slot) in out.iter_mut().enumerate() {
        while k + 1 < roots.len() && bounds[k + 1] < q as f64 {
            k += 1;
        }
        let p = roots[k];
        let d = q as f64 - p as f64;
        *slot = d * d + f[p];
    }
}

/// Abscissa where the parabolas rooted at `p < q` intersect.
#[inline]
fn intersection(f: &[f64], p: usize, q: usize) -> f64 {
    let (pf, qf) = (p as f64, q as f64);
    ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
}
