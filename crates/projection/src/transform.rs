//! Re-projection of whole shape trees.
//!
//! The dispatcher applies `from.inverse` then `to.forward` to every
//! vertex of a shape, growing the cached extent incrementally as each
//! vertex is rewritten so the cache is consistent with the vertices the
//! moment the pass completes. Callers choose between in-place mutation
//! (hot redraw paths, no allocation) and a defensive copy.

use crate::crs::{need_to_project, Projection};
use map_common::{BoxCorners, Extent, MapResult, Shape, Vertex, VertexList};

/// Re-project a shape into a fresh copy, leaving the input untouched.
pub fn project_shape(from: &Projection, to: &Projection, shape: &Shape) -> MapResult<Shape> {
    let mut copy = shape.clone();
    project_shape_in_place(from, to, &mut copy)?;
    Ok(copy)
}

/// Re-project a shape by mutating it, avoiding allocation on hot paths.
///
/// No-op when [`need_to_project`] says the projections already agree.
/// If a vertex transform fails partway through, the shape is left with
/// its extent flag cleared and some vertices already rewritten.
pub fn project_shape_in_place(
    from: &Projection,
    to: &Projection,
    shape: &mut Shape,
) -> MapResult<()> {
    if !need_to_project(Some(from), Some(to)) {
        return Ok(());
    }

    match shape {
        Shape::Point(v) => reproject_vertex(from, to, v),
        Shape::PointExtra(p) => reproject_vertex(from, to, &mut p.vertex),
        Shape::MultiPoint(s) | Shape::Polyline(s) | Shape::Polygon(s) | Shape::Arc(s) => {
            reproject_vertices(from, to, s)
        }
        Shape::PolylineList(l) | Shape::PolygonList(l) => {
            l.limits_known = false;
            let mut union = Extent::empty();
            for child in &mut l.shapes {
                project_shape_in_place(from, to, child)?;
                union.union(&child.extent());
            }
            l.extent = union;
            l.limits_known = true;
            Ok(())
        }
        Shape::Box(b) => reproject_box(from, to, b),
    }
}

fn reproject_vertex(from: &Projection, to: &Projection, v: &mut Vertex) -> MapResult<()> {
    let (lon, lat) = from.inverse(v.x, v.y)?;
    let (x, y) = to.forward(lon, lat)?;
    v.x = x;
    v.y = y;
    Ok(())
}

fn reproject_vertices(from: &Projection, to: &Projection, seq: &mut VertexList) -> MapResult<()> {
    seq.limits_known = false;
    seq.extent = Extent::empty();
    for v in &mut seq.vertices {
        let (lon, lat) = from.inverse(v.x, v.y)?;
        let (x, y) = to.forward(lon, lat)?;
        v.x = x;
        v.y = y;
        // Grow the cached extent as we go rather than in a second pass.
        seq.extent.add(x, y);
    }
    seq.limits_known = true;
    Ok(())
}

/// Boxes are projected corner-by-corner. This is only correct for
/// projections that are locally axis-preserving near the box; a true
/// shape transform of a box under a nonlinear projection is not a box.
fn reproject_box(from: &Projection, to: &Projection, b: &mut BoxCorners) -> MapResult<()> {
    reproject_vertex(from, to, &mut b.min)?;
    reproject_vertex(from, to, &mut b.max)
}
