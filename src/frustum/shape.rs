use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::Arc;

use log::debug;
use na::Point3;
use nalgebra as na;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{FrustumError, Result};

/// Coordinate pairs the 2D shape is drawn into, indexed by axis. The remaining coordinate stays 0.
pub const AXIS_PLANES: [(usize, usize); 3] = [(1, 2), (0, 2), (0, 1)];

/// Identifies one cached shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeKey {
    pub subdivisions: u32,
    pub axis: usize,
}

impl ShapeKey {
    /// Validated key. Subdivisions have to split into 4 equal arcs.
    pub fn new(subdivisions: u32, axis: usize) -> Result<Self> {
        if subdivisions == 0 || subdivisions % 4 != 0 {
            return Err(FrustumError::InvalidSubdivisions(subdivisions));
        }
        if axis >= AXIS_PLANES.len() {
            return Err(FrustumError::InvalidAxis(axis));
        }
        return Ok(Self { subdivisions, axis });
    }

    /// Number of circle steps in one quarter of a revolution.
    pub fn arc_len(&self) -> usize {
        return (self.subdivisions / 4) as usize;
    }

    pub fn plane(&self) -> (usize, usize) {
        return AXIS_PLANES[self.axis];
    }
}

/// Unit circle with a repeated vertex at 90, 180 and 270 degrees plus a closing copy of the first
/// vertex at 360 degrees, so every quadrant boundary has two independent vertices which can be
/// moved apart when the circle is stretched into a rounded rect.
///
/// The shape is always drawn as a closed loop: the edge from the last point back to the first one
/// comes from `closes_to_start`, not from an extra vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalShape {
    key: ShapeKey,
    points: Vec<Point3<f32>>,
    closes_to_start: bool,
}

impl CanonicalShape {
    fn build(key: ShapeKey) -> Self {
        let radius = 1.0;
        let arc_len = key.arc_len();
        let theta_step = (2.0 * PI) / key.subdivisions as f64;
        let (idx_1, idx_2) = key.plane();

        let mut points = Vec::<Point3<f32>>::with_capacity(key.subdivisions as usize + 4);
        for i in 0..key.subdivisions as usize {
            let theta = i as f64 * theta_step;
            let mut p = Point3::<f32>::origin();
            p[idx_1] = (radius * theta.cos()) as f32;
            p[idx_2] = (radius * theta.sin()) as f32;
            points.push(p);
            if i > 0 && i % arc_len == 0 {
                // Second vertex of the quadrant boundary.
                points.push(p);
            }
        }
        points.push(points[0]);

        return Self {
            key,
            points,
            closes_to_start: true,
        };
    }

    pub fn key(&self) -> ShapeKey {
        return self.key;
    }

    pub fn points(&self) -> &[Point3<f32>] {
        return &self.points[..];
    }

    /// Number of concrete vertices, i.e. the size of one shape block in a vertex buffer.
    pub fn vertex_count(&self) -> usize {
        return self.points.len();
    }

    /// Logical length of the shape, counting the loop reference back to the first vertex.
    pub fn len(&self) -> usize {
        return self.points.len() + self.closes_to_start as usize;
    }

    pub fn is_empty(&self) -> bool {
        return self.points.is_empty();
    }

    pub fn closes_to_start(&self) -> bool {
        return self.closes_to_start;
    }

    /// Working copy of the points, free to be transformed by the caller.
    pub fn to_working_copy(&self) -> Vec<Point3<f32>> {
        return self.points.clone();
    }
}

/// Memoized canonical shapes, keyed by subdivisions and axis.
/// Shapes are built on first request and never change afterwards.
#[derive(Default)]
pub struct ShapeCache {
    shapes: RwLock<HashMap<ShapeKey, Arc<CanonicalShape>>>,
}

static GLOBAL_SHAPE_CACHE: Lazy<ShapeCache> = Lazy::new(ShapeCache::new);

impl ShapeCache {
    pub fn new() -> Self {
        return Self::default();
    }

    /// Process-wide cache shared by every frustum build.
    pub fn global() -> &'static ShapeCache {
        return &GLOBAL_SHAPE_CACHE;
    }

    /// Get the shape for the given key, building it if this is the first request.
    pub fn shape(&self, subdivisions: u32, axis: usize) -> Result<Arc<CanonicalShape>> {
        let key = ShapeKey::new(subdivisions, axis)?;
        if let Some(shape) = self.shapes.read().get(&key) {
            return Ok(Arc::clone(shape));
        }

        // Another thread may have built it between the two locks, entry() keeps the first one.
        let mut shapes = self.shapes.write();
        let shape = shapes.entry(key).or_insert_with(|| {
            let shape = CanonicalShape::build(key);
            debug!(
                "built canonical shape {:?}: {} vertices",
                key,
                shape.vertex_count()
            );
            Arc::new(shape)
        });
        return Ok(Arc::clone(shape));
    }

    /// Number of distinct shapes built so far.
    pub fn len(&self) -> usize {
        return self.shapes.read().len();
    }

    pub fn is_empty(&self) -> bool {
        return self.shapes.read().is_empty();
    }
}
