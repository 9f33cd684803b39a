//! Chain extraction: growing a selected segment into the maximal run of connected segments.
use crate::*;
use std::collections::VecDeque;

/// An ordered run of connected segments.
///
/// Consecutive segments share an endpoint. A chain never holds the same segment twice.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Chain {
    segments: Vec<u32>,
    closed: bool,
}

/// Why growth in one direction stopped. None of these are errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stop {
    /// Endpoint with 3 or more incident segments.
    Branch,
    /// No other segment at the endpoint.
    DeadEnd,
    /// The next segment is not a straight line.
    Curve,
    /// The next segment is already in the chain.
    Closed,
}

#[derive(Copy, Clone)]
enum Grow {
    Back,
    Front,
}

impl Chain {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    pub fn first(&self) -> Option<u32> {
        self.segments.first().copied()
    }

    pub fn last(&self) -> Option<u32> {
        self.segments.last().copied()
    }

    /// Returns if growth ran back into the chain, forming a loop.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn contains(&self, segment: u32) -> bool {
        self.segments.contains(&segment)
    }

    /// The ordered endpoint indices travelled along the chain.
    ///
    /// An open chain of `n` segments has `n + 1` vertices, a closed chain repeats its first
    /// vertex at the end.
    pub fn vertices<G: SegmentGraph + ?Sized>(&self, graph: &G) -> Vec<u32> {
        let (first, rest) = match self.segments.split_first() {
            Some(x) => x,
            None => return Vec::new(),
        };

        let start = match rest.first() {
            Some(&next) => free_end(graph, *first, next),
            None => graph.endpoints(*first).0,
        };

        let mut v = Vec::with_capacity(self.segments.len() + 1);
        v.push(start);
        let mut point = start;
        for &s in &self.segments {
            point = graph.other_end(s, point);
            v.push(point);
        }

        v
    }

    /// The ordered coordinates travelled along the chain.
    pub fn points<G: SegmentGraph + ?Sized>(&self, graph: &G) -> Vec<Point3> {
        self.vertices(graph)
            .into_iter()
            .map(|p| graph.position(p))
            .collect()
    }

    /// The total length of all segments.
    pub fn length<G: SegmentGraph + ?Sized>(&self, graph: &G) -> f64 {
        self.segments
            .iter()
            .map(|&s| {
                let (a, b) = graph.positions(s);
                vector_to(a, b).mag()
            })
            .sum()
    }
}

/// Extract the chain a selection seeds.
///
/// No selection, or a seed that is not a segment of `graph`, gives an empty chain.
pub fn extract_selection<G: SegmentGraph + ?Sized>(graph: &G, seed: Option<u32>) -> Chain {
    match seed {
        Some(seed) if (seed as usize) < graph.segment_count() => extract(graph, seed),
        Some(seed) => {
            log::warn!("selected segment {} does not exist in the sketch", seed);
            Chain::default()
        }
        None => Chain::default(),
    }
}

/// Extract the maximal chain of connected, non-branching straight segments containing `seed`.
///
/// Growth runs forward from the seed's end, then backward from its start. Each direction
/// stops at a branch point (degree > 2), a dead end, a non-line segment, or on finding a
/// segment already in the chain. Each step only inspects the endpoint being grown from.
///
/// # Panics
/// Panics if `seed` is not a segment of `graph`, see [`extract_selection`] for a checked
/// variant.
pub fn extract<G: SegmentGraph + ?Sized>(graph: &G, seed: u32) -> Chain {
    let mut chain = VecDeque::new();
    chain.push_back(seed);
    let mut members = HashSet::default();
    members.insert(seed);

    let (start, end) = graph.endpoints(seed);

    let fwd = grow(graph, seed, end, &mut chain, &mut members, Grow::Back);
    log::trace!("chain from segment {} stopped forwards: {:?}", seed, fwd);
    let bwd = grow(graph, seed, start, &mut chain, &mut members, Grow::Front);
    log::trace!("chain from segment {} stopped backwards: {:?}", seed, bwd);

    Chain {
        segments: chain.into(),
        closed: fwd == Stop::Closed || bwd == Stop::Closed,
    }
}

/// The endpoint of `line` that is not shared with `neighbour`.
pub(crate) fn free_end<G>(graph: &G, line: u32, neighbour: u32) -> u32
where
    G: SegmentGraph + ?Sized,
{
    let (a, b) = graph.endpoints(line);
    let (c, d) = graph.endpoints(neighbour);
    if b == c || b == d {
        a
    } else {
        b
    }
}

fn grow<G: SegmentGraph + ?Sized>(
    graph: &G,
    mut line: u32,
    mut point: u32,
    chain: &mut VecDeque<u32>,
    members: &mut HashSet<u32>,
    dir: Grow,
) -> Stop {
    loop {
        if graph.degree(point) > 2 {
            return Stop::Branch;
        }

        let candidate = match graph.incident(point).iter().copied().find(|&s| s != line) {
            Some(x) => x,
            None => return Stop::DeadEnd,
        };

        if !graph.is_line(candidate) {
            return Stop::Curve;
        }

        if !members.insert(candidate) {
            return Stop::Closed;
        }

        match dir {
            Grow::Back => chain.push_back(candidate),
            Grow::Front => chain.push_front(candidate),
        }

        point = graph.other_end(candidate, point);
        line = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen, TestResult};

    /// Builds an open run of `n` segments zig-zagging along x.
    /// `flip` reverses the orientation of individual segments.
    fn open_run(n: usize, flip: &[bool]) -> Sketch {
        let mut s = Sketch::new();
        let ps = (0..=n)
            .map(|i| s.add_point([i as f64, (i % 2) as f64, 0.0]))
            .collect::<Vec<_>>();
        for i in 0..n {
            let (a, b) = (ps[i], ps[i + 1]);
            if flip.get(i).copied().unwrap_or(false) {
                s.add_segment(b, a).unwrap();
            } else {
                s.add_segment(a, b).unwrap();
            }
        }
        s
    }

    /// A closed polygon loop of `n` segments.
    fn closed_loop(n: usize) -> Sketch {
        let mut s = Sketch::new();
        let ps = (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * std::f64::consts::TAU;
                s.add_point([t.cos(), t.sin(), 0.0])
            })
            .collect::<Vec<_>>();
        for i in 0..n {
            s.add_segment(ps[i], ps[(i + 1) % n]).unwrap();
        }
        s
    }

    fn same_up_to_reversal(a: &[u32], b: &[u32]) -> bool {
        a == b || a.iter().eq(b.iter().rev())
    }

    #[test]
    fn empty_selection() {
        let s = open_run(3, &[]);
        let c = extract_selection(&s, None);
        assert!(c.is_empty());
        assert_eq!(c.vertices(&s), Vec::<u32>::new());
        assert_eq!(extract_selection(&s, Some(1)).segments(), &[0, 1, 2]);
    }

    #[test]
    fn unknown_seed_selects_nothing() {
        let s = open_run(1, &[]);
        assert!(extract_selection(&s, Some(1)).is_empty());
        assert!(extract_selection(&s, Some(u32::MAX)).is_empty());
        assert_eq!(extract_selection(&s, Some(0)).segments(), &[0]);
    }

    #[test]
    fn single_segment() {
        let s = open_run(1, &[]);
        let c = extract(&s, 0);
        assert_eq!(c.segments(), &[0]);
        assert!(!c.is_closed());
        assert_eq!(c.vertices(&s), vec![0, 1]);
    }

    #[test]
    fn grows_both_ways_from_interior() {
        let s = open_run(5, &[]);
        let c = extract(&s, 2);
        assert_eq!(c.segments(), &[0, 1, 2, 3, 4]);
        assert_eq!(c.first(), Some(0));
        assert_eq!(c.last(), Some(4));
        assert!(!c.is_closed());
        assert_eq!(c.vertices(&s), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn mixed_orientations() {
        let s = open_run(4, &[false, true, true, false]);
        let c = extract(&s, 0);
        assert_eq!(c.segments(), &[0, 1, 2, 3]);
        assert_eq!(c.vertices(&s), vec![0, 1, 2, 3, 4]);

        // a reversed seed grows forwards towards the start of the run
        let c = extract(&s, 1);
        assert_eq!(c.segments(), &[3, 2, 1, 0]);
        assert_eq!(c.vertices(&s), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn branch_points_terminate() {
        // 0 -- 1 -- 2 -- 3
        //           |
        //           4
        let mut s = open_run(3, &[]);
        let p = s.add_point([2.0, -1.0, 0.0]);
        let t = s.add_segment(2, p).unwrap();

        let c = extract(&s, 0);
        assert_eq!(c.segments(), &[0, 1]);
        assert_eq!(*c.vertices(&s).last().unwrap(), 2);

        let c = extract(&s, 2);
        assert_eq!(c.segments(), &[2]);

        let c = extract(&s, t);
        assert_eq!(c.segments(), &[t]);
    }

    /// Only exposes the first two incident segments, with the true degree reported separately.
    struct TwoIncident(Sketch);

    impl SegmentGraph for TwoIncident {
        fn segment_count(&self) -> usize {
            self.0.segment_count()
        }
        fn endpoints(&self, segment: u32) -> (u32, u32) {
            self.0.endpoints(segment)
        }
        fn position(&self, point: u32) -> Point3 {
            self.0.position(point)
        }
        fn incident(&self, point: u32) -> &[u32] {
            let i = self.0.incident(point);
            &i[..i.len().min(2)]
        }
        fn degree(&self, point: u32) -> usize {
            self.0.degree(point)
        }
    }

    #[test]
    fn branches_use_reported_degree() {
        // 0 -- 1 -- 2 -- 3, with a tail at 2 hidden from incident
        let mut s = open_run(3, &[]);
        let p = s.add_point([2.0, -1.0, 0.0]);
        s.add_segment(2, p).unwrap();
        let g = TwoIncident(s);
        assert_eq!(g.incident(2), &[1, 2]);
        assert_eq!(g.degree(2), 3);

        assert_eq!(extract(&g, 0).segments(), &[0, 1]);
        assert_eq!(extract(&g, 2).segments(), &[2]);
    }

    #[test]
    fn curves_terminate() {
        let mut s = open_run(2, &[]);
        let p = s.add_point([3.0, 3.0, 0.0]);
        s.add_curve(2, p).unwrap();

        let c = extract(&s, 0);
        assert_eq!(c.segments(), &[0, 1]);
    }

    #[test]
    fn closed_loops() {
        let s = closed_loop(6);
        let c = extract(&s, 3);
        assert_eq!(c.len(), 6);
        assert!(c.is_closed());
        assert_eq!(c.segments(), &[3, 4, 5, 0, 1, 2]);

        let v = c.vertices(&s);
        assert_eq!(v.len(), 7);
        assert_eq!(v.first(), v.last());
    }

    #[test]
    fn chain_length() {
        let s = open_run(2, &[]);
        let c = extract(&s, 0);
        let l = c.length(&s) - 2.0 * 2f64.sqrt();
        assert!(l.abs() < 1e-11);
        assert_eq!(
            c.points(&s),
            vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [2.0, 0.0, 0.0]]
        );
    }

    #[derive(Clone, Debug)]
    struct Run {
        flip: Vec<bool>,
        seed: usize,
    }

    impl Arbitrary for Run {
        fn arbitrary(g: &mut Gen) -> Self {
            let n = usize::arbitrary(g) % 20 + 1;
            let flip = (0..n).map(|_| bool::arbitrary(g)).collect();
            let seed = usize::arbitrary(g) % n;
            Self { flip, seed }
        }
    }

    #[quickcheck]
    fn extraction_symmetric(run: Run) -> bool {
        let s = open_run(run.flip.len(), &run.flip);
        let a = extract(&s, 0);
        let b = extract(&s, run.seed as u32);
        same_up_to_reversal(a.segments(), b.segments()) && b.len() == run.flip.len()
    }

    #[quickcheck]
    fn loops_never_repeat(n: u8, seed: u8) -> TestResult {
        let n = n as usize % 50;
        if n < 3 {
            return TestResult::discard();
        }
        let s = closed_loop(n);
        let c = extract(&s, (seed as usize % n) as u32);
        let unique = c.segments().iter().collect::<HashSet<_>>();
        TestResult::from_bool(c.len() == n && unique.len() == n && c.is_closed())
    }
}
