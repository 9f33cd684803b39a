//! Angle and distance based decimation of a chain into a reduced polyline.
use crate::chain::free_end;
use crate::*;
use rayon::prelude::*;
use std::f64::consts::PI;

/// The range a host should offer for [`Tolerances::min_distance`].
pub const MIN_DISTANCE_RANGE: (f64, f64) = (0.0001, 1.0);

/// Thresholds controlling which vertices of a chain are kept.
///
/// Always valid: built through [`Tolerances::new`], and deserialising applies the same checks.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "TolerancesDef")]
pub struct Tolerances {
    min_distance: f64,
    max_angle: f64,
    coincidence: f64,
}

/// Unchecked wire form of [`Tolerances`].
#[derive(serde::Deserialize)]
#[serde(default)]
struct TolerancesDef {
    min_distance: f64,
    max_angle: f64,
    coincidence: f64,
}

impl Default for TolerancesDef {
    fn default() -> Self {
        let Tolerances {
            min_distance,
            max_angle,
            coincidence,
        } = Tolerances::default();
        Self {
            min_distance,
            max_angle,
            coincidence,
        }
    }
}

impl TryFrom<TolerancesDef> for Tolerances {
    type Error = &'static str;

    fn try_from(def: TolerancesDef) -> Result<Self, Self::Error> {
        Ok(Self::new(def.min_distance, def.max_angle)?.with_coincidence(def.coincidence))
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            min_distance: 0.01,
            max_angle: 1.0,
            coincidence: 0.0,
        }
    }
}

impl Tolerances {
    pub fn new(min_distance: f64, max_angle: f64) -> Result<Self, &'static str> {
        if !(min_distance.is_finite() && min_distance > 0.0) {
            return Err("minimum distance must be a positive, finite value");
        }
        if !(0.0..=PI).contains(&max_angle) {
            return Err("angle tolerance must be within [0, π] radians");
        }

        Ok(Self {
            min_distance,
            max_angle,
            ..Self::default()
        })
    }

    /// Match endpoint coordinates within `tolerance` rather than exactly.
    pub fn with_coincidence(mut self, tolerance: f64) -> Self {
        self.coincidence = tolerance.max(0.0);
        self
    }

    /// A vertex is kept once the run from the last kept point is longer than this.
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// A vertex is kept when the direction changes by at least this many radians.
    pub fn max_angle(&self) -> f64 {
        self.max_angle
    }

    /// Tolerance used when matching coordinates of segment endpoints.
    /// Zero is exact value equality.
    pub fn coincidence(&self) -> f64 {
        self.coincidence
    }
}

/// Decimate a chain into an ordered set of points.
///
/// - An empty chain returns no points.
/// - A single segment returns its start and end, no thresholds are applied.
/// - Otherwise the chain is walked segment by segment from an anchor point, keeping a vertex if
///   the direction to the vertex after it deviates by at least `max_angle`, or the run since the
///   last kept point is longer than `min_distance`.
///
/// Every returned point is a vertex of the chain. The walk is a single causal pass, it does not
/// look back at dropped vertices.
pub fn decimate<G: SegmentGraph + ?Sized>(
    graph: &G,
    chain: &Chain,
    tolerances: &Tolerances,
) -> Vec<Point3> {
    let lines = chain.segments();
    let first = match lines.first() {
        Some(&x) => x,
        None => return Vec::new(),
    };

    if lines.len() == 1 {
        let (a, b) = graph.positions(first);
        return vec![a, b];
    }

    let Tolerances {
        min_distance,
        max_angle,
        coincidence: tol,
    } = *tolerances;

    let open_ended = is_open_ended(graph, lines);
    let mut current = anchor(graph, first);

    let mut points = Vec::with_capacity(lines.len() + 1);
    points.push(current);

    for (i, &line) in lines.iter().enumerate() {
        let next = match lines.get(i + 1) {
            Some(&x) => Some(x),
            None if open_ended => None,
            None => Some(first),
        };

        let (a, b) = graph.positions(line);
        let point = if coincident(b, current, tol) { a } else { b };
        let vector = vector_to(current, point);

        let angle_test = match next {
            Some(next) => {
                let (c, d) = graph.positions(next);
                let next_point = if coincident(point, d, tol) { c } else { d };
                let vector2 = vector_to(current, next_point);
                match angle_between(vector, vector2) {
                    Some(angle) => wrap_angle(angle).abs() < max_angle,
                    None => {
                        log::warn!(
                            "degenerate chain: zero length vector at segment {}, keeping {:?}",
                            line,
                            point
                        );
                        false
                    }
                }
            }
            None => false,
        };

        if !angle_test || vector.mag() > min_distance {
            current = point;
            points.push(point);
        }
    }

    log::debug!("decimated {} segments to {} points", lines.len(), points.len());

    points
}

/// Decimate many chains in parallel.
pub fn decimate_chains<G>(
    graph: &G,
    chains: &[Chain],
    tolerances: &Tolerances,
) -> Vec<Vec<Point3>>
where
    G: SegmentGraph + Sync + ?Sized,
{
    chains
        .par_iter()
        .map(|c| decimate(graph, c, tolerances))
        .collect()
}

/// Returns if either extremity of the chain finishes at a free (degree 1) endpoint.
fn is_open_ended<G: SegmentGraph + ?Sized>(graph: &G, lines: &[u32]) -> bool {
    let n = lines.len();
    let front = free_end(graph, lines[0], lines[1]);
    let back = free_end(graph, lines[n - 1], lines[n - 2]);
    graph.degree(front) == 1 || graph.degree(back) == 1
}

/// The point decimation starts from: the first segment's start, unless only its end is free.
fn anchor<G: SegmentGraph + ?Sized>(graph: &G, first: u32) -> Point3 {
    let (s, e) = graph.endpoints(first);
    if graph.degree(e) == 1 {
        graph.position(e)
    } else {
        graph.position(s)
    }
}
