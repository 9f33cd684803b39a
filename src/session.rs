//! The command session: state kept between host events while the command dialog is open.
use crate::*;

/// Host events a [`Session`] responds to.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The selected seed segment changed.
    SelectionChanged(Option<u32>),
    /// The distance or angle tolerance changed.
    TolerancesChanged(Tolerances),
    /// The host wants a fresh preview.
    Preview,
    /// The command was confirmed.
    Execute,
    /// The host asks if the current inputs are usable.
    Validate,
    /// The command is closing.
    Destroy,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Ack,
    /// Number of points in the decimated preview.
    PointCount(usize),
    /// Number of segments in the extracted chain.
    LineCount(usize),
    Valid(bool),
}

/// Owns everything the command needs between events: the seed, tolerances, the extracted
/// chain and the drawn overlay.
///
/// Extraction only reruns after the selection changes, previews in between reuse the chain.
/// Dropping the session (or calling [`Session::stop`]) removes the overlay.
pub struct Session<S: OverlaySink> {
    seed: Option<u32>,
    tolerances: Tolerances,
    chain: Chain,
    rescan: bool,
    point_count: usize,
    overlay: Overlay<S>,
}

impl<S: OverlaySink> Session<S> {
    pub fn new(sink: S) -> Self {
        Self {
            seed: None,
            tolerances: Tolerances::default(),
            chain: Chain::default(),
            rescan: false,
            point_count: 0,
            overlay: Overlay::new(sink),
        }
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.overlay.set_style(style);
        self
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Point count of the last preview.
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn overlay(&self) -> &Overlay<S> {
        &self.overlay
    }

    /// Dispatch a host event.
    pub fn handle<G: SegmentGraph + ?Sized>(&mut self, graph: &G, event: Event) -> Response {
        log::debug!("session event: {:?}", event);
        match event {
            Event::SelectionChanged(seed) => {
                self.select(seed);
                Response::Ack
            }
            Event::TolerancesChanged(t) => {
                self.set_tolerances(t);
                Response::Ack
            }
            Event::Preview => Response::PointCount(self.preview(graph)),
            Event::Execute => Response::LineCount(self.execute(graph)),
            Event::Validate => Response::Valid(self.validate()),
            Event::Destroy => {
                self.stop();
                Response::Ack
            }
        }
    }

    /// Change the seed segment. The chain is extracted again on the next preview.
    pub fn select(&mut self, seed: Option<u32>) {
        self.seed = seed;
        self.rescan = true;
    }

    pub fn set_tolerances(&mut self, tolerances: Tolerances) {
        self.tolerances = tolerances;
    }

    /// Decimate the chain and redraw the overlay, returning the point count.
    pub fn preview<G: SegmentGraph + ?Sized>(&mut self, graph: &G) -> usize {
        self.rescan_if_dirty(graph);

        let points = decimate(graph, &self.chain, &self.tolerances);
        self.point_count = points.len();
        self.overlay.show(&points);

        self.point_count
    }

    /// Confirm the command, returning the number of segments in the chain.
    pub fn execute<G: SegmentGraph + ?Sized>(&mut self, graph: &G) -> usize {
        self.rescan_if_dirty(graph);
        self.chain.len()
    }

    /// Inputs are valid once a seed segment is selected.
    pub fn validate(&self) -> bool {
        self.seed.is_some()
    }

    /// Remove the overlay and forget the selection.
    pub fn stop(&mut self) {
        self.overlay.clear();
        self.seed = None;
        self.chain = Chain::default();
        self.rescan = false;
        self.point_count = 0;
    }

    fn rescan_if_dirty<G: SegmentGraph + ?Sized>(&mut self, graph: &G) {
        if self.rescan {
            self.chain = extract_selection(graph, self.seed);
            self.rescan = false;
            log::debug!(
                "extracted chain of {} segments from {:?}",
                self.chain.len(),
                self.seed
            );
        }
    }
}

impl<S: OverlaySink> Drop for Session<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
