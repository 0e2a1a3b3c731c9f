use log::debug;

use crate::error::{FrustumError, Result};

/// Number of lines joining the near and far shapes of each light.
pub const FRUSTUM_EDGES: usize = 4;

/// Write the lines of one polyline into a pre-allocated line-list index buffer.
///
/// `start_vtx` is the first vertex of the polyline in the vertex buffer, `start_idx` the first slot
/// to write in `indices`. A closed loop writes `num_vtx` lines, the last one going back to
/// `start_vtx`, an open one writes `num_vtx - 1` lines.
/// Returns the slot right after the last written index.
pub fn append_line_loop(
    indices: &mut [u32],
    start_vtx: usize,
    num_vtx: usize,
    start_idx: usize,
    close_loop: bool,
) -> usize {
    let num_lines = match close_loop {
        true => num_vtx,
        false => num_vtx.saturating_sub(1),
    };

    for line in 0..num_lines {
        let i = start_idx + 2 * line;
        let vtx = start_vtx + line;
        indices[i] = vtx as u32;
        indices[i + 1] = match close_loop && line + 1 == num_lines {
            true => start_vtx as u32,
            false => (vtx + 1) as u32,
        };
    }

    return start_idx + 2 * num_lines;
}

/// Number of lines drawn for a frustum, see `build_indices`.
pub fn line_count(vertex_count: usize, light_count: usize, frustum_edges: usize) -> usize {
    return 2 * vertex_count + light_count * (2 * vertex_count + frustum_edges);
}

/// Index buffer matching the vertex layout of `build_vertices`: near and soft near loops, then for
/// every light its far and soft far loops plus `frustum_edges` lines going from the soft near shape
/// to the soft far shape.
///
/// `vertex_count` is the size of one shape block. Connector lines are spread every
/// `vertex_count / frustum_edges` vertices, so the block has to split evenly.
pub fn build_indices(
    vertex_count: usize,
    light_count: usize,
    frustum_edges: usize,
) -> Result<Vec<u32>> {
    if frustum_edges == 0 || vertex_count % frustum_edges != 0 {
        return Err(FrustumError::UnevenStride {
            vertex_count,
            edge_count: frustum_edges,
        });
    }

    let n_indices = 2 * line_count(vertex_count, light_count, frustum_edges);
    let mut indices = vec![0u32; n_indices];

    // near shape
    let mut idx_start = append_line_loop(&mut indices, 0, vertex_count, 0, true);
    // near soft shape
    idx_start = append_line_loop(&mut indices, vertex_count, vertex_count, idx_start, true);

    let mut vtx_start = 2 * vertex_count;
    let stride = vertex_count / frustum_edges;
    for _ in 0..light_count {
        // far shape
        idx_start = append_line_loop(&mut indices, vtx_start, vertex_count, idx_start, true);
        vtx_start += vertex_count;
        // far soft shape
        idx_start = append_line_loop(&mut indices, vtx_start, vertex_count, idx_start, true);

        // frustum edges, soft near to the soft far shape just written
        let mut near_vtx = vertex_count;
        let mut far_vtx = vtx_start;
        for _ in 0..frustum_edges {
            indices[idx_start] = near_vtx as u32;
            indices[idx_start + 1] = far_vtx as u32;
            near_vtx += stride;
            far_vtx += stride;
            idx_start += 2;
        }
        vtx_start += vertex_count;
    }

    debug!(
        "index buffer: {} lines for {} lights",
        n_indices / 2,
        light_count
    );
    return Ok(indices);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(indices: &[u32]) -> Vec<[u32; 2]> {
        return indices.chunks_exact(2).map(|pair| [pair[0], pair[1]]).collect();
    }

    #[test]
    fn closed_loop_wraps_to_start() {
        let mut indices = vec![0u32; 8];
        let next = append_line_loop(&mut indices, 10, 4, 0, true);
        assert_eq!(next, 8);
        assert_eq!(lines(&indices), vec![[10, 11], [11, 12], [12, 13], [13, 10]]);
    }

    #[test]
    fn open_loop_skips_last_line() {
        let mut indices = vec![u32::MAX; 8];
        let next = append_line_loop(&mut indices, 0, 4, 2, false);
        assert_eq!(next, 8);
        assert_eq!(lines(&indices), vec![[u32::MAX, u32::MAX], [0, 1], [1, 2], [2, 3]]);

        // Nothing to draw, nothing written.
        assert_eq!(append_line_loop(&mut indices, 0, 0, 0, false), 0);
    }

    #[test]
    fn no_lights_gives_two_loops() {
        let indices = build_indices(36, 0, FRUSTUM_EDGES).unwrap();
        let lines = lines(&indices);
        assert_eq!(lines.len(), 72);
        assert_eq!(lines[35], [35, 0]);
        assert_eq!(lines[36], [36, 37]);
        assert_eq!(lines[71], [71, 36]);
    }

    #[test]
    fn connectors_join_soft_shapes() {
        let b = 36;
        let indices = build_indices(b, 2, FRUSTUM_EDGES).unwrap();
        let lines = lines(&indices);
        assert_eq!(lines.len(), line_count(b, 2, FRUSTUM_EDGES));
        assert_eq!(lines.len(), 2 * b + 2 * (2 * b + 4));

        // First light: far loop at 72, soft far loop at 108, then 4 connectors.
        let first = 2 * b;
        assert_eq!(lines[first], [72, 73]);
        assert_eq!(lines[first + b - 1], [107, 72]);
        assert_eq!(lines[first + 2 * b - 1], [143, 108]);
        let connectors = &lines[first + 2 * b..first + 2 * b + 4];
        assert_eq!(connectors, &[[36, 108], [45, 117], [54, 126], [63, 135]]);

        // Second light starts right after.
        let second = first + 2 * b + 4;
        assert_eq!(lines[second], [144, 145]);
        let connectors = &lines[second + 2 * b..];
        assert_eq!(connectors, &[[36, 180], [45, 189], [54, 198], [63, 207]]);
    }

    #[test]
    fn indices_stay_inside_vertex_buffer() {
        for light_count in 0..4 {
            let b = 36;
            let indices = build_indices(b, light_count, FRUSTUM_EDGES).unwrap();
            let vertex_count = 2 * b * (1 + light_count);
            assert_eq!(*indices.iter().max().unwrap() as usize, vertex_count - 1);
        }
    }

    #[test]
    fn uneven_stride_is_rejected() {
        assert!(matches!(
            build_indices(37, 1, FRUSTUM_EDGES),
            Err(FrustumError::UnevenStride { vertex_count: 37, edge_count: 4 })
        ));
        assert!(build_indices(36, 1, 0).is_err());
    }
}
