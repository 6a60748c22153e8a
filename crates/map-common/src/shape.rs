//! The polymorphic shape family used by map layers.
//!
//! Shapes are a closed set of geometry kinds: points, vertex aggregates
//! (multi-point, polyline, polygon, arc), recursive lists of polylines or
//! polygons, and axis-aligned boxes. Every aggregate caches its extent
//! together with a `limits_known` flag; any code that rewrites vertices
//! must clear the flag before the cached extent is trusted again.

use crate::Extent;
use serde::{Deserialize, Serialize};

/// A single 2D vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point carrying extra ordinates beyond x/y (elevation, measures).
///
/// The extras ride along unchanged through reprojection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointExtra {
    pub vertex: Vertex,
    pub extras: Vec<f64>,
}

impl PointExtra {
    pub fn new(x: f64, y: f64, extras: Vec<f64>) -> Self {
        Self {
            vertex: Vertex::new(x, y),
            extras,
        }
    }
}

/// An ordered vertex sequence with a cached extent.
///
/// Used for multi-points, polylines, polygons, and sampled arcs. The
/// cached extent is only meaningful while `limits_known` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexList {
    pub vertices: Vec<Vertex>,
    pub extent: Extent,
    pub limits_known: bool,
}

impl VertexList {
    /// Create a vertex list; the extent starts unknown.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            extent: Extent::empty(),
            limits_known: false,
        }
    }

    /// The extent of the vertices, from cache when valid.
    pub fn extent(&self) -> Extent {
        if self.limits_known {
            self.extent
        } else {
            compute_extent(&self.vertices)
        }
    }

    /// Recompute the extent from the vertices and cache it.
    pub fn refresh_extent(&mut self) -> Extent {
        self.extent = compute_extent(&self.vertices);
        self.limits_known = true;
        self.extent
    }

    /// Mark the cached extent stale. Must be called before any vertex
    /// mutation that code downstream might observe.
    pub fn invalidate_extent(&mut self) {
        self.limits_known = false;
    }

    /// Append a vertex, invalidating the cached extent.
    pub fn push(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
        self.limits_known = false;
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// An owned list of child shapes with a cached union extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeList {
    pub shapes: Vec<Shape>,
    pub extent: Extent,
    pub limits_known: bool,
}

impl ShapeList {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
            extent: Extent::empty(),
            limits_known: false,
        }
    }

    /// The union extent of all children, from cache when valid.
    pub fn extent(&self) -> Extent {
        if self.limits_known {
            self.extent
        } else {
            let mut ext = Extent::empty();
            for shape in &self.shapes {
                ext.union(&shape.extent());
            }
            ext
        }
    }

    /// Recompute the union extent from the children and cache it.
    pub fn refresh_extent(&mut self) -> Extent {
        let mut ext = Extent::empty();
        for shape in &mut self.shapes {
            ext.union(&shape.refresh_extent());
        }
        self.extent = ext;
        self.limits_known = true;
        self.extent
    }

    pub fn invalidate_extent(&mut self) {
        self.limits_known = false;
    }
}

/// Two corner values defining an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxCorners {
    pub min: Vertex,
    pub max: Vertex,
}

impl BoxCorners {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: Vertex::new(min_x, min_y),
            max: Vertex::new(max_x, max_y),
        }
    }
}

/// The closed set of shape variants map layers can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point(Vertex),
    PointExtra(PointExtra),
    MultiPoint(VertexList),
    Polyline(VertexList),
    Polygon(VertexList),
    Arc(VertexList),
    PolylineList(ShapeList),
    PolygonList(ShapeList),
    Box(BoxCorners),
}

impl Shape {
    /// Convenience constructor for a polygon from raw coordinate pairs.
    pub fn polygon_from_coords(coords: &[(f64, f64)]) -> Self {
        Shape::Polygon(VertexList::new(
            coords.iter().map(|&(x, y)| Vertex::new(x, y)).collect(),
        ))
    }

    /// Convenience constructor for a polyline from raw coordinate pairs.
    pub fn polyline_from_coords(coords: &[(f64, f64)]) -> Self {
        Shape::Polyline(VertexList::new(
            coords.iter().map(|&(x, y)| Vertex::new(x, y)).collect(),
        ))
    }

    /// Variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Point(_) => "point",
            Shape::PointExtra(_) => "point-extra",
            Shape::MultiPoint(_) => "multi-point",
            Shape::Polyline(_) => "polyline",
            Shape::Polygon(_) => "polygon",
            Shape::Arc(_) => "arc",
            Shape::PolylineList(_) => "polyline-list",
            Shape::PolygonList(_) => "polygon-list",
            Shape::Box(_) => "box",
        }
    }

    /// The shape's extent, using cached values where they are valid.
    pub fn extent(&self) -> Extent {
        match self {
            Shape::Point(v) => Extent::new(v.x, v.y, v.x, v.y),
            Shape::PointExtra(p) => {
                Extent::new(p.vertex.x, p.vertex.y, p.vertex.x, p.vertex.y)
            }
            Shape::MultiPoint(s) | Shape::Polyline(s) | Shape::Polygon(s) | Shape::Arc(s) => {
                s.extent()
            }
            Shape::PolylineList(l) | Shape::PolygonList(l) => l.extent(),
            Shape::Box(b) => Extent::new(b.min.x, b.min.y, b.max.x, b.max.y),
        }
    }

    /// Recompute and cache extents through the whole shape tree.
    pub fn refresh_extent(&mut self) -> Extent {
        match self {
            Shape::MultiPoint(s) | Shape::Polyline(s) | Shape::Polygon(s) | Shape::Arc(s) => {
                s.refresh_extent()
            }
            Shape::PolylineList(l) | Shape::PolygonList(l) => l.refresh_extent(),
            _ => self.extent(),
        }
    }

    /// Mark cached extents stale through the whole shape tree.
    pub fn invalidate_extent(&mut self) {
        match self {
            Shape::MultiPoint(s) | Shape::Polyline(s) | Shape::Polygon(s) | Shape::Arc(s) => {
                s.invalidate_extent()
            }
            Shape::PolylineList(l) | Shape::PolygonList(l) => {
                l.invalidate_extent();
                for child in &mut l.shapes {
                    child.invalidate_extent();
                }
            }
            _ => {}
        }
    }
}

fn compute_extent(vertices: &[Vertex]) -> Extent {
    let mut ext = Extent::empty();
    for v in vertices {
        ext.add(v.x, v.y);
    }
    ext
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_list_extent_lazy() {
        let list = VertexList::new(vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(4.0, -2.0),
            Vertex::new(-1.0, 3.0),
        ]);

        assert!(!list.limits_known);
        let ext = list.extent();
        assert_eq!(ext.min_x, -1.0);
        assert_eq!(ext.min_y, -2.0);
        assert_eq!(ext.max_x, 4.0);
        assert_eq!(ext.max_y, 3.0);
    }

    #[test]
    fn test_refresh_extent_caches() {
        let mut list = VertexList::new(vec![Vertex::new(1.0, 2.0), Vertex::new(3.0, 4.0)]);
        let ext = list.refresh_extent();
        assert!(list.limits_known);
        assert_eq!(ext, list.extent);
    }

    #[test]
    fn test_push_invalidates() {
        let mut list = VertexList::new(vec![Vertex::new(1.0, 2.0)]);
        list.refresh_extent();
        assert!(list.limits_known);

        list.push(Vertex::new(10.0, 10.0));
        assert!(!list.limits_known);
        assert_eq!(list.extent().max_x, 10.0);
    }

    #[test]
    fn test_shape_list_union_extent() {
        let list = ShapeList::new(vec![
            Shape::polyline_from_coords(&[(0.0, 0.0), (5.0, 5.0)]),
            Shape::polyline_from_coords(&[(-3.0, 2.0), (1.0, 8.0)]),
        ]);
        let shape = Shape::PolylineList(list);

        let ext = shape.extent();
        assert_eq!(ext.min_x, -3.0);
        assert_eq!(ext.min_y, 0.0);
        assert_eq!(ext.max_x, 5.0);
        assert_eq!(ext.max_y, 8.0);
    }

    #[test]
    fn test_box_extent() {
        let shape = Shape::Box(BoxCorners::new(-1.0, -2.0, 3.0, 4.0));
        let ext = shape.extent();
        assert_eq!(ext, Extent::new(-1.0, -2.0, 3.0, 4.0));
    }

    #[test]
    fn test_point_extent_is_degenerate() {
        let shape = Shape::Point(Vertex::new(2.5, -7.5));
        let ext = shape.extent();
        assert_eq!(ext.min_x, 2.5);
        assert_eq!(ext.max_x, 2.5);
        assert_eq!(ext.width(), 0.0);
    }
}
