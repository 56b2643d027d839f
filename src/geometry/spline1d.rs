//! Scalar natural cubic spline and linear interpolation over time-ordered
//! knots. `Path`/`RotationPath` run one of these per coordinate component
//! (x, y, z or azimuth, elevation); the vector case is just this applied
//! component-wise.
//!
//! Method: Press et al., *Numerical Recipes in C* 2nd ed., pp. 114-116
//! (natural spline, zero-curvature boundaries).

/// Index of the first knot with `ts[i] > t` (`upper_bound`).
fn upper_bound(ts: &[f64], t: f64) -> usize {
    ts.partition_point(|&x| x <= t)
}

/// Linear interpolation; clamps to the nearest endpoint outside `[ts[0], ts[-1]]`.
pub fn linear_eval(t: f64, ts: &[f64], ys: &[f64]) -> f64 {
    let xri = upper_bound(ts, t);
    if xri == 0 {
        ys[0]
    } else if xri == ts.len() {
        ys[ts.len() - 1]
    } else {
        let xli = xri - 1;
        let iw = ts[xri] - ts[xli];
        let rw = (ts[xri] - t) / iw;
        let lw = 1.0 - rw;
        ys[xri] * lw + ys[xli] * rw
    }
}

/// Natural-spline second derivatives at each knot (zero curvature at both ends).
pub fn natural_spline_second_derivs(ts: &[f64], ys: &[f64]) -> Vec<f64> {
    let size = ts.len();
    let mut dd = vec![0.0; size];
    if size < 3 {
        return dd;
    }
    let mut tmp = vec![0.0; size];
    for i in 1..size - 1 {
        let yrd = ys[i + 1] - ys[i];
        let yld = ys[i] - ys[i - 1];
        let xrd = ts[i + 1] - ts[i];
        let xld = ts[i] - ts[i - 1];
        let iw = ts[i + 1] - ts[i - 1];
        let si = xld / iw;
        let p = dd[i - 1] * si + 2.0;
        dd[i] = (si - 1.0) / p;
        tmp[i] = ((yrd / xrd - yld / xld) * 6.0 / iw - tmp[i - 1] * si) / p;
    }
    for i in (0..size - 1).rev() {
        dd[i] = dd[i] * dd[i + 1] + tmp[i];
    }
    dd
}

/// Evaluate the natural cubic spline at `t`; clamps outside the knot domain.
pub fn cubic_eval(t: f64, ts: &[f64], ys: &[f64], dd: &[f64]) -> f64 {
    let xri = upper_bound(ts, t);
    if xri == 0 {
        ys[0]
    } else if xri == ts.len() {
        ys[ts.len() - 1]
    } else {
        let xli = xri - 1;
        let xrd = ts[xri] - t;
        let xld = t - ts[xli];
        let iw = ts[xri] - ts[xli];
        let iws = iw * iw / 6.0;
        let a = xrd / iw;
        let b = xld / iw;
        let c = (a * a * a - a) * iws;
        let d = (b * b * b - b) * iws;
        ys[xli] * a + ys[xri] * b + dd[xli] * c + dd[xri] * d
    }
}
