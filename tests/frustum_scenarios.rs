use approx::assert_abs_diff_eq;
use nalgebra::{vector, Matrix4};

use barn_frustum::config::SceneConfig;
use barn_frustum::frustum::builder::build_base_shape;
use barn_frustum::frustum::shape::ShapeCache;
use barn_frustum::frustum::build_frustum_with_cache;
use barn_frustum::{build_frustum, BarnMode, FilterParameters};

fn light_above(x: f32) -> Matrix4<f32> {
    return Matrix4::new_translation(&vector![x, 0.0, 5.0]);
}

#[test]
fn default_shape_sizes() {
    let cache = ShapeCache::new();
    let shape = cache.shape(32, 2).unwrap();
    assert_eq!(shape.len(), 37);
    assert_eq!(shape.vertex_count(), 36);

    let params = FilterParameters::default();
    let geometry = build_frustum_with_cache(&params, &Matrix4::identity(), &[], &cache).unwrap();
    assert_eq!(geometry.base_vertex_count, shape.vertex_count());
}

#[test]
fn lone_filter_draws_its_own_outline() {
    let geometry = build_frustum(&FilterParameters::default(), &Matrix4::identity(), &[]).unwrap();
    let b = geometry.base_vertex_count;
    assert_eq!(geometry.light_count, 0);
    assert_eq!(geometry.vertices.len(), 2 * b);

    let edges: Vec<[u32; 2]> = geometry.edges().collect();
    assert_eq!(edges.len(), 2 * b);
    // Both loops close on their own first vertex.
    assert_eq!(edges[b - 1], [b as u32 - 1, 0]);
    assert_eq!(edges[2 * b - 1], [2 * b as u32 - 1, b as u32]);
}

#[test]
fn two_lights_layout() {
    let lights = [light_above(-1.0), light_above(1.0)];
    let params = FilterParameters::default();
    let geometry = build_frustum(&params, &Matrix4::identity(), &lights).unwrap();
    let b = geometry.base_vertex_count;
    assert_eq!(geometry.vertices.len(), 6 * b);
    assert_eq!(geometry.edge_count(), 2 * b + 2 * (2 * b + 4));

    let max_index = geometry.indices.iter().copied().max().unwrap() as usize;
    assert_eq!(max_index, geometry.vertices.len() - 1);
}

#[test]
fn builds_are_repeatable() {
    let params = FilterParameters {
        barn_mode: BarnMode::Analytic,
        shear_y: 0.2,
        edge: 0.3,
        ..Default::default()
    };
    let filter = Matrix4::new_translation(&vector![0.5, 0.0, 1.0]);
    let lights = [light_above(0.0)];
    let first = build_frustum(&params, &filter, &lights).unwrap();
    let second = build_frustum(&params, &filter, &lights).unwrap();
    assert_eq!(first, second);
}

#[test]
fn degenerate_depths_stay_finite() {
    for barn_mode in [BarnMode::Physical, BarnMode::Analytic] {
        for depth in [0.0, -3.0, 1.0e4] {
            let params = FilterParameters {
                barn_mode,
                depth,
                ..Default::default()
            };
            // Light turned on its side, some rays run almost parallel to the filter.
            let light = Matrix4::new_rotation(vector![std::f32::consts::FRAC_PI_2, 0.0, 0.0]);
            let geometry = build_frustum(&params, &Matrix4::identity(), &[light]).unwrap();
            assert!(geometry
                .vertices
                .iter()
                .all(|v| v.coords.iter().all(|c| c.is_finite())));
        }
    }
}

#[test]
fn zero_depth_collapses_far_rect_onto_filter_corners() {
    let params = FilterParameters {
        width: 1.0,
        height: 1.0,
        radius: 0.0,
        depth: 0.0,
        ..Default::default()
    };
    let geometry = build_frustum(&params, &Matrix4::identity(), &[light_above(0.0)]).unwrap();
    let b = geometry.base_vertex_count;
    // Far shape sits on the filter plane with the near shape's outline.
    for (near, far) in geometry.vertices[..b].iter().zip(&geometry.vertices[2 * b..3 * b]) {
        assert_abs_diff_eq!(near.x, far.x, epsilon = 1e-5);
        assert_abs_diff_eq!(near.y, far.y, epsilon = 1e-5);
        assert_abs_diff_eq!(far.z, 0.0, epsilon = 1e-5);
    }
}

#[test]
fn base_shape_matches_filter_rect() {
    let params = FilterParameters {
        width: 1.0,
        height: 1.0,
        radius: 0.1,
        ..Default::default()
    };
    let base = build_base_shape(&params, &ShapeCache::new()).unwrap();
    let half_extent = (params.width + params.radius) / 2.0;
    assert_abs_diff_eq!(base[0].x, half_extent, epsilon = 1e-6);
    assert_abs_diff_eq!(base[9].y, half_extent, epsilon = 1e-6);
}

#[test]
fn light_direction_rays_follow_light_position_frame() {
    // Light position is mapped by the filter frame while the corners use its inverse. For a light
    // straight above, rays aimed at the position run along the filter plane.
    let params = FilterParameters {
        barn_mode: BarnMode::Analytic,
        use_light_direction: true,
        directional: true,
        ..Default::default()
    };
    let geometry = build_frustum(&params, &Matrix4::identity(), &[light_above(0.0)]).unwrap();
    let b = geometry.base_vertex_count;
    let far = &geometry.vertices[2 * b..3 * b];
    assert!(far.iter().all(|v| v.z.abs() < 1e-3));
    assert_abs_diff_eq!(far[0].x, 2.0, epsilon = 1e-3);
    assert_abs_diff_eq!(far[0].y, 10001.0, epsilon = 1e-1);
}

#[test]
fn sample_scene_builds() {
    let scene = SceneConfig::from_toml(include_str!("../assets/two_filters.toml")).unwrap();
    assert_eq!(scene.filters.len(), 2);
    for filter in &scene.filters {
        let lights = filter.light_matrices();
        let filter_world = filter.transform.to_matrix();
        let geometry = build_frustum(&filter.params, &filter_world, &lights).unwrap();
        assert_eq!(geometry.light_count, lights.len());
        assert_eq!(
            geometry.vertices.len(),
            2 * geometry.base_vertex_count * (1 + lights.len())
        );
    }
    assert_eq!(scene.filters[1].params.barn_mode, BarnMode::Analytic);
}
