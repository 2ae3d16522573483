use crate::curve::{Curve, Point};
use crate::utils::lerp_height;

// One height per integer column between the curve anchors, inclusive
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampledCurve {
    samples: Vec<Point>,
}

impl SampledCurve {
    pub fn points(&self) -> &[Point] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    // (column, height) pairs, left to right
    pub fn columns(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.samples.iter().map(|p| (p.x as i64, p.y))
    }
}

// Densify a sparse curve: every integer x from the first to the last point gets
// exactly one sample. Columns that coincide with a curve point keep its height;
// the rest are read off the segment that spans them.
pub fn sample(curve: &Curve) -> SampledCurve {
    sample_within(curve, i64::MIN, i64::MAX)
}

// Same as `sample`, restricted to columns in [min_col, max_col]. The cost is
// bounded by the window and the point count, however far the anchors reach.
pub fn sample_within(curve: &Curve, min_col: i64, max_col: i64) -> SampledCurve {
    let pts = curve.points();
    let (Some(first), Some(last)) = (pts.first(), pts.last()) else {
        return SampledCurve::default();
    };

    // float to int casts saturate, so far-off anchors land on the i64 limits
    let lo = (first.x.ceil() as i64).max(min_col);
    let hi = (last.x.floor() as i64).min(max_col);
    if hi < lo {
        return SampledCurve::default();
    }

    let span = usize::try_from(hi.abs_diff(lo)).unwrap_or(usize::MAX);
    let mut samples = Vec::with_capacity(span.saturating_add(1));
    let mut seg = 0;
    for col in lo..=hi {
        let x = col as f64;
        // Walk forward to the segment whose right end reaches this column
        while seg + 1 < pts.len() && pts[seg + 1].x < x {
            seg += 1;
        }

        let a = pts[seg];
        let y = match pts.get(seg + 1) {
            _ if x == a.x => a.y,
            Some(b) if x == b.x => b.y,
            Some(b) => lerp_height(a.x, a.y, b.x, b.y, x),
            None => a.y,
        };
        samples.push(Point::new(x, y));
    }

    SampledCurve { samples }
}
