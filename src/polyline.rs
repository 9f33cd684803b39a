use super::*;

/// An open polyline of 3D points, ready to be rendered.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polyline3(Vec<Point3>);

impl Polyline3 {
    pub fn new<I>(points: I) -> Result<Self, &'static str>
    where
        I: IntoIterator<Item = Point3>,
    {
        let points = points.into_iter().collect::<Vec<_>>();
        if points.len() < 2 {
            Err("polyline requires 2 or more points to be valid")
        } else {
            Ok(Polyline3(points))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pts(&self) -> &[Point3] {
        &self.0
    }

    /// Vertex index pairs for each line of the polyline.
    ///
    /// This is the layout line-list renderers expect, `[(0, 1), (1, 2), ..]`.
    pub fn line_indices(&self) -> impl ExactSizeIterator<Item = (u32, u32)> {
        (1..self.len() as u32).map(|i| (i - 1, i))
    }

    /// The total length along the polyline.
    pub fn length(&self) -> f64 {
        self.0
            .iter()
            .zip(self.0.iter().skip(1))
            .map(|(&a, &b)| vector_to(a, b).mag())
            .sum()
    }
}

impl IntoIterator for Polyline3 {
    type Item = Point3;
    type IntoIter = std::vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
