//! The graph of segments that chains are extracted from.
use crate::*;

/// Connectivity and geometry of a network of segments.
///
/// Endpoints and segments are identified by `u32` indices. Implementors only need to answer
/// local questions (the endpoints of a segment, the segments incident to an endpoint), the
/// extraction never walks the whole graph.
pub trait SegmentGraph {
    /// The number of segments, valid indices are `0..segment_count()`.
    fn segment_count(&self) -> usize;

    /// The `(start, end)` endpoint indices of a segment.
    fn endpoints(&self, segment: u32) -> (u32, u32);

    /// The coordinates of an endpoint.
    fn position(&self, point: u32) -> Point3;

    /// The segments incident to an endpoint, of any kind.
    fn incident(&self, point: u32) -> &[u32];

    /// The connectivity degree of an endpoint.
    fn degree(&self, point: u32) -> usize {
        self.incident(point).len()
    }

    /// Returns if the segment is a straight line.
    fn is_line(&self, _segment: u32) -> bool {
        true
    }

    /// The `(start, end)` coordinates of a segment.
    fn positions(&self, segment: u32) -> (Point3, Point3) {
        let (a, b) = self.endpoints(segment);
        (self.position(a), self.position(b))
    }

    /// The endpoint of `segment` that is **not** `point`.
    fn other_end(&self, segment: u32, point: u32) -> u32 {
        let (a, b) = self.endpoints(segment);
        if point == b {
            a
        } else {
            b
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SegmentKind {
    Line,
    /// Any non-straight entity (arc, spline). Curves count towards connectivity but are never
    /// part of a chain.
    Curve,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub start: u32,
    pub end: u32,
    pub kind: SegmentKind,
}

/// How coordinates are matched onto existing endpoints when adding lines by coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub enum Weld {
    /// Exact value equality.
    #[default]
    Exact,
    /// Each dimension within the tolerance.
    Tolerance(f64),
}

/// An in-memory sketch of endpoints and segments.
#[derive(Debug, Clone, Default)]
pub struct Sketch {
    points: Vec<Point3>,
    /// Incident segments for each point, index matched to `points`.
    incident: Vec<Vec<u32>>,
    segments: Vec<Segment>,
    weld: Weld,
    /// Exact coordinate lookup, keyed on the bit patterns.
    lookup: HashMap<[u64; 3], u32>,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weld(weld: Weld) -> Self {
        Self {
            weld,
            ..Self::default()
        }
    }

    /// Build a sketch from line coordinates, welding shared endpoints.
    pub fn from_lines<I>(lines: I, weld: Weld) -> Result<Self, &'static str>
    where
        I: IntoIterator<Item = (Point3, Point3)>,
    {
        let mut s = Self::with_weld(weld);
        for (a, b) in lines {
            s.add_line(a, b)?;
        }
        Ok(s)
    }

    pub fn point_len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Add a new, unconnected endpoint. No welding is done.
    pub fn add_point(&mut self, p: Point3) -> u32 {
        let idx = self.points.len() as u32;
        self.points.push(p);
        self.incident.push(Vec::new());
        self.lookup.entry(bits(p)).or_insert(idx);
        idx
    }

    /// Add a straight segment between two existing endpoints.
    pub fn add_segment(&mut self, start: u32, end: u32) -> Result<u32, &'static str> {
        self.push_segment(start, end, SegmentKind::Line)
    }

    /// Add a curved segment between two existing endpoints.
    pub fn add_curve(&mut self, start: u32, end: u32) -> Result<u32, &'static str> {
        self.push_segment(start, end, SegmentKind::Curve)
    }

    /// Add a straight segment by coordinates.
    ///
    /// Each coordinate is welded onto an existing endpoint if one matches, otherwise a new
    /// endpoint is created.
    pub fn add_line(&mut self, a: Point3, b: Point3) -> Result<u32, &'static str> {
        let start = self.weld_point(a);
        let end = self.weld_point(b);
        self.add_segment(start, end)
    }

    /// Partition every straight segment into maximal chains.
    ///
    /// Chains are seeded from the lowest index segment not yet claimed by a previous chain.
    pub fn chains(&self) -> Vec<Chain> {
        let mut claimed = HashSet::default();
        let mut chains = Vec::new();

        for seed in 0..self.segment_count() as u32 {
            if claimed.contains(&seed) || !self.is_line(seed) {
                continue;
            }

            let chain = extract(self, seed);
            claimed.extend(chain.segments().iter().copied());
            chains.push(chain);
        }

        chains
    }

    fn push_segment(
        &mut self,
        start: u32,
        end: u32,
        kind: SegmentKind,
    ) -> Result<u32, &'static str> {
        let len = self.points.len() as u32;
        if start >= len || end >= len {
            return Err("segment endpoint does not exist in sketch");
        }
        if start == end {
            return Err("segment requires two distinct endpoints");
        }

        let idx = self.segments.len() as u32;
        self.segments.push(Segment { start, end, kind });
        self.incident[start as usize].push(idx);
        self.incident[end as usize].push(idx);
        Ok(idx)
    }

    fn weld_point(&mut self, p: Point3) -> u32 {
        let found = match self.weld {
            Weld::Exact => self.lookup.get(&bits(p)).copied(),
            Weld::Tolerance(t) => self
                .points
                .iter()
                .position(|&x| coincident(x, p, t))
                .map(|i| i as u32),
        };

        match found {
            Some(i) => i,
            None => self.add_point(p),
        }
    }
}

impl SegmentGraph for Sketch {
    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn endpoints(&self, segment: u32) -> (u32, u32) {
        let s = &self.segments[segment as usize];
        (s.start, s.end)
    }

    fn position(&self, point: u32) -> Point3 {
        self.points[point as usize]
    }

    fn incident(&self, point: u32) -> &[u32] {
        &self.incident[point as usize]
    }

    fn is_line(&self, segment: u32) -> bool {
        self.segments[segment as usize].kind == SegmentKind::Line
    }
}

/// Hash key for exact coordinates. `-0.0` is folded onto `0.0` so they weld.
fn bits(p: Point3) -> [u64; 3] {
    p.map(|f| if f == 0.0 { 0u64 } else { f.to_bits() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_segments() {
        let mut s = Sketch::new();
        let a = s.add_point([0.0; 3]);
        let b = s.add_point([1.0, 0.0, 0.0]);
        let c = s.add_point([1.0, 1.0, 0.0]);

        assert_eq!(s.add_segment(a, b), Ok(0));
        assert_eq!(s.add_curve(b, c), Ok(1));

        assert_eq!(s.degree(a), 1);
        assert_eq!(s.degree(b), 2);
        assert_eq!(s.incident(b), &[0, 1]);
        assert!(s.is_line(0));
        assert!(!s.is_line(1));
        assert_eq!(s.other_end(0, a), b);
        assert_eq!(s.other_end(0, b), a);
        assert_eq!(s.positions(1), ([1.0, 0.0, 0.0], [1.0, 1.0, 0.0]));
    }

    #[test]
    fn invalid_segments() {
        let mut s = Sketch::new();
        let a = s.add_point([0.0; 3]);
        assert!(s.add_segment(a, a).is_err());
        assert!(s.add_segment(a, 5).is_err());
        assert_eq!(s.segment_count(), 0);
    }

    #[test]
    fn exact_welding() {
        let s = Sketch::from_lines(
            [
                ([0.0; 3], [1.0, 0.0, 0.0]),
                ([1.0, 0.0, 0.0], [2.0, 0.0, 0.0]),
                ([-0.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
                ([2.0, 1e-12, 0.0], [3.0, 0.0, 0.0]),
            ],
            Weld::Exact,
        )
        .unwrap();

        // 0, 1, 2, (0,1), (2,1e-12), 3
        assert_eq!(s.point_len(), 6);
        assert_eq!(s.degree(0), 2);
        assert_eq!(s.degree(1), 2);
        assert_eq!(s.degree(2), 1);
    }

    #[test]
    fn tolerance_welding() {
        let s = Sketch::from_lines(
            [
                ([0.0; 3], [1.0, 0.0, 0.0]),
                ([1.0, 1e-9, 0.0], [2.0, 0.0, 0.0]),
            ],
            Weld::Tolerance(1e-7),
        )
        .unwrap();

        assert_eq!(s.point_len(), 3);
        assert_eq!(s.degree(1), 2);
    }

    #[test]
    fn zero_length_lines_fail_to_weld() {
        let mut s = Sketch::new();
        assert!(s.add_line([1.0; 3], [1.0; 3]).is_err());
    }

    #[test]
    fn partition_into_chains() {
        // an L shape and a separate line, joined by a curve
        let mut s = Sketch::new();
        let p = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [5.0, 0.0, 0.0],
            [6.0, 0.0, 0.0],
        ]
        .map(|p| s.add_point(p));
        s.add_segment(p[0], p[1]).unwrap();
        s.add_segment(p[2], p[1]).unwrap();
        s.add_segment(p[3], p[4]).unwrap();
        s.add_curve(p[2], p[3]).unwrap();

        let chains = s.chains();
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].segments(), &[0, 1]);
        assert_eq!(chains[1].segments(), &[2]);
    }
}
