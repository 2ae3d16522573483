use serde::{Deserialize, Serialize};

use crate::SignSource;
use crate::error::{LandscapeError, LandscapeResult};

// Past this the curve holds over a million points per layer
pub const MAX_ITERATIONS: u32 = 20;

// Horizontal position and (possibly fractional) height of a curve point
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

// Horizon profile ordered by x. The first and last points are the anchors the
// curve was generated from.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    points: Vec<Point>,
}

impl Curve {
    pub fn new(points: Vec<Point>) -> Self {
        debug_assert!(
            points.windows(2).all(|w| w[0].x <= w[1].x),
            "curve points must be sorted by x"
        );
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

// 1D fractal horizon generator using iterative midpoint displacement
pub struct MidpointDisplacement1D {
    start: Point,
    end: Point,
    roughness: f64,    // displacement is scaled by 2^-roughness after every pass
    displacement: f64, // initial vertical offset magnitude
    iterations: u32,   // final curve has 2^iterations + 1 points
}

impl MidpointDisplacement1D {
    pub fn new(
        start: Point,
        end: Point,
        roughness: f64,
        displacement: f64,
        iterations: u32,
    ) -> LandscapeResult<Self> {
        if !(roughness.is_finite() && roughness > 0.0) {
            return Err(LandscapeError::configuration(format!(
                "roughness must be a finite value > 0, got {roughness}"
            )));
        }
        if !displacement.is_finite() {
            return Err(LandscapeError::configuration(format!(
                "displacement must be finite, got {displacement}"
            )));
        }
        if iterations > MAX_ITERATIONS {
            return Err(LandscapeError::configuration(format!(
                "at most {MAX_ITERATIONS} iterations are supported, got {iterations}"
            )));
        }
        if !(start.x.is_finite() && start.y.is_finite() && end.x.is_finite() && end.y.is_finite())
        {
            return Err(LandscapeError::configuration("curve anchors must be finite"));
        }
        if end.x < start.x {
            return Err(LandscapeError::configuration(format!(
                "curve end x ({}) lies before start x ({})",
                end.x, start.x
            )));
        }

        Ok(Self {
            start,
            end,
            roughness,
            displacement,
            iterations,
        })
    }

    // Initial magnitude used when a layer does not set one: the mean anchor height
    pub fn default_displacement(start: Point, end: Point) -> f64 {
        (start.y + end.y) / 2.0
    }

    pub fn point_count(&self) -> usize {
        (1usize << self.iterations) + 1
    }

    // Run every pass and return the finished curve.
    // Each pass reads the curve as it stood when the pass began and draws one
    // sign per midpoint, left to right, so a seeded source always reproduces
    // the same profile.
    pub fn generate<S: SignSource + ?Sized>(&self, signs: &mut S) -> Curve {
        let mut points = vec![self.start, self.end];
        let mut displacement = self.displacement;
        let decay = 2f64.powf(-self.roughness);

        for _ in 0..self.iterations {
            // Midpoints land between their parents, so interleaving keeps x order
            let mut next = Vec::with_capacity(points.len() * 2 - 1);
            for pair in points.windows(2) {
                let mut mid = pair[0].midpoint(pair[1]);
                mid.y += signs.next_sign() * displacement;
                next.push(pair[0]);
                next.push(mid);
            }
            next.push(self.end);

            points = next;
            displacement *= decay;
        }

        Curve { points }
    }
}
