/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use geo::{BoundingRect, Geometry};
use rstar::primitives::Rectangle;
use rstar::{RTree, RTreeObject, AABB};

type RectangleF64 = Rectangle<[f64; 2]>;

/// An axis-aligned envelope tagged with a payload, usually the index of
/// the feature it bounds.
#[derive(Debug)]
pub struct RectangleWithData<T> {
    pub data: T,
    pub rectangle: RectangleF64,
}

impl<T> RectangleWithData<T> {
    pub fn new(data: T, corner1: [f64; 2], corner2: [f64; 2]) -> Self {
        let rectangle = Rectangle::from_corners(corner1, corner2);
        RectangleWithData { data, rectangle }
    }
}

impl<T> RTreeObject for RectangleWithData<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.rectangle.envelope()
    }
}

/// Returns the envelope of a geometry as an rstar AABB, or `None` for
/// empty geometries.
pub fn geometry_envelope(geometry: &Geometry<f64>) -> Option<AABB<[f64; 2]>> {
    geometry
        .bounding_rect()
        .map(|r| AABB::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y]))
}

/// Bulk-loads an R-tree over the envelopes of a set of geometries. The
/// payload of each entry is the geometry's index in the input slice.
pub fn build_envelope_index<'a, I>(geometries: I) -> RTree<RectangleWithData<usize>>
where
    I: IntoIterator<Item = &'a Geometry<f64>>,
{
    let mut entries = vec![];
    for (i, g) in geometries.into_iter().enumerate() {
        if let Some(env) = geometry_envelope(g) {
            entries.push(RectangleWithData::new(i, env.lower(), env.upper()));
        }
    }
    RTree::bulk_load(entries)
}

/// Indices of all indexed geometries whose envelope intersects `envelope`,
/// in ascending order.
pub fn candidates(
    tree: &RTree<RectangleWithData<usize>>,
    envelope: &AABB<[f64; 2]>,
) -> Vec<usize> {
    let mut ret: Vec<usize> = tree
        .locate_in_envelope_intersecting(envelope)
        .map(|r| r.data)
        .collect();
    ret.sort_unstable();
    ret
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::{point, polygon};

    #[test]
    fn rectangle_locate_intersecting() {
        let tree = RTree::bulk_load(vec![
            RectangleWithData::new(1, [0.0, 0.0], [2.0, 2.0]),
            RectangleWithData::new(2, [1.0, 1.0], [3.0, 3.0]),
            RectangleWithData::new(3, [2.5, 2.5], [4.0, 4.0]),
        ]);
        let env = AABB::from_corners([1.5, 1.5], [1.6, 1.6]);
        assert_eq!(candidates(&tree, &env), vec![1, 2]);
        let env = AABB::from_corners([-2.0, -2.0], [-1.0, -1.0]);
        assert!(candidates(&tree, &env).is_empty());
    }

    #[test]
    fn envelope_index_uses_slice_positions() {
        let geometries: Vec<Geometry<f64>> = vec![
            polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 0.0)]
                .into(),
            point!(x: 50.0, y: 50.0).into(),
        ];
        let tree = build_envelope_index(&geometries);
        let env = AABB::from_corners([49.0, 49.0], [51.0, 51.0]);
        assert_eq!(candidates(&tree, &env), vec![1]);
    }
}
