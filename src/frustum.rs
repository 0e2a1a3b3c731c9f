//! Wireframe of a barn door light filter: the filter's rounded rect, its softness outline and, for
//! every light going through the filter, the frustum it carves out down to a given depth.

pub mod builder;
pub mod index;
pub mod lights;
pub mod params;
pub mod shape;
pub mod util;

use std::f32::consts::PI;

use log::debug;
use na::{Matrix4, Point3, Vector3};
use nalgebra as na;

use crate::error::Result;
use builder::{build_base_shape, build_vertices};
use index::{build_indices, FRUSTUM_EDGES};
use lights::compute_light_bindings;
use params::FilterParameters;
use shape::ShapeCache;

/// Vertex and line-list index buffers of one filter, in filter space.
#[derive(Debug, Clone, PartialEq)]
pub struct FrustumGeometry {
    pub vertices: Vec<Point3<f32>>,
    pub indices: Vec<u32>,
    /// Vertices in one shape block.
    pub base_vertex_count: usize,
    pub light_count: usize,
}

impl FrustumGeometry {
    /// Lines as pairs of vertex indices.
    pub fn edges(&self) -> impl Iterator<Item = [u32; 2]> + '_ {
        return self.indices.chunks_exact(2).map(|pair| [pair[0], pair[1]]);
    }

    pub fn edge_count(&self) -> usize {
        return self.indices.len() / 2;
    }

    /// Vertices placed in the world the way the viewport draws them: the filter transform with a
    /// half turn around Y.
    pub fn to_world(&self, filter_world: &Matrix4<f32>) -> Vec<Point3<f32>> {
        let display = filter_world * Matrix4::new_rotation(Vector3::y() * PI);
        return self
            .vertices
            .iter()
            .map(|vtx| display.transform_point(vtx))
            .collect();
    }
}

/// Build the wireframe of a filter lit by the given lights, using the process-wide shape cache.
/// An empty light list is fine, only the filter's own outline is built then.
pub fn build_frustum(
    params: &FilterParameters,
    filter_world: &Matrix4<f32>,
    light_worlds: &[Matrix4<f32>],
) -> Result<FrustumGeometry> {
    return build_frustum_with_cache(params, filter_world, light_worlds, ShapeCache::global());
}

pub fn build_frustum_with_cache(
    params: &FilterParameters,
    filter_world: &Matrix4<f32>,
    light_worlds: &[Matrix4<f32>],
    cache: &ShapeCache,
) -> Result<FrustumGeometry> {
    let lights = compute_light_bindings(filter_world, light_worlds);
    let base_shape = build_base_shape(params, cache)?;
    let vertices = build_vertices(&base_shape, params, &lights);
    let indices = build_indices(base_shape.len(), lights.len(), FRUSTUM_EDGES)?;
    debug!(
        "barn filter frustum: {} vertices, {} lines, {} lights",
        vertices.len(),
        indices.len() / 2,
        lights.len()
    );

    return Ok(FrustumGeometry {
        vertices,
        indices,
        base_vertex_count: base_shape.len(),
        light_count: lights.len(),
    });
}
