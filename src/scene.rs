pub mod camera;

use image::{ImageBuffer, Rgb, RgbImage};
use na::{Point3, Vector2};
use nalgebra as na;

use camera::Camera;

/// Struct, representing raw rgb8 pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Color = Color { r: 0,   g: 0,   b: 0,   };
pub const WHITE: Color = Color { r: 255, g: 255, b: 255, };
pub const GREY:  Color = Color { r: 110, g: 110, b: 110, };
pub const AMBER: Color = Color { r: 255, g: 190, b: 60,  };

impl Color {
    /// Get convex combination of two colors: t * c_1 + (1 - t) * c_2.
    /// t is unrestricted.
    pub fn blend(color_1: Color, color_2: Color, t: f32) -> Color {
        return Color {
            r: (t * color_1.r as f32 + (1.0 - t) * color_2.r as f32) as u8,
            g: (t * color_1.g as f32 + (1.0 - t) * color_2.g as f32) as u8,
            b: (t * color_1.b as f32 + (1.0 - t) * color_2.b as f32) as u8,
        }
    }
}

/// Scene, holding its width, height and private flat array(vec) of rgb8 pixel data.
/// (0, 0) is the bottom left coordinate.
pub struct Scene {
    pub width: u32,
    pub height: u32,
    render_data: Vec<u8>, // Storing flat array.
}

impl Scene {
    /// Generates new Scene struct with specified width and height.
    pub fn new(width: u32, height: u32) -> Scene {
        let n_pixels = (width * height) as usize;
        return Scene {
            width,
            height,
            render_data: vec![0; 3 * n_pixels],
        };
    }

    /// Get rendered scene as a slice of color values of size 3 * (number of pixels).
    pub fn as_render_data(&self) -> &[u8] {
        return &self.render_data[..];
    }

    /// Copy of the rendered scene, top row first, ready to be saved.
    pub fn to_image(&self) -> Option<RgbImage> {
        let data = self.render_data.clone();
        return ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(self.width, self.height, data);
    }

    /// Fill every pixel with a color.
    pub fn clear(&mut self, color: Color) {
        for pixel in self.render_data.chunks_exact_mut(3) {
            pixel[0] = color.r;
            pixel[1] = color.g;
            pixel[2] = color.b;
        }
    }

    /// Checking if coordinate is in Scene bounds.
    fn coord_in_bounds(&self, p: Vector2<i32>) -> bool {
        return p.x >= 0 && p.y >= 0 && p.x < self.width as i32 && p.y < self.height as i32;
    }

    /// Tranfromation of a point with x, y in [-1.0, 1.0] to the pixel grid.
    fn to_raster(&self, v: Vector2<f32>) -> Vector2<i32> {
        // Transformtaion of a float in \[-1.0, 1.0\] to the pixel image coordinate
        // in range \[0, scale - 1\].
        fn to_rasterized_coord(float_coord: f32, scale: u32) -> i32 {
            return ((float_coord + 1.0) * ((scale - 1) as f32) / 2.0).round() as i32;
        }
        return Vector2::new(
            to_rasterized_coord(v.x, self.width),
            to_rasterized_coord(v.y, self.height),
        );
    }

    /// Sets Scene pixel to a color at specifed coordinate, pixels outside of the scene are dropped.
    pub fn set_pixel(&mut self, p: Vector2<i32>, color: Color) {
        if !self.coord_in_bounds(p) {
            return;
        }
        // Pixel data is rgb8 and stored top row first, so y is flipped here.
        let index = (3 * (p.x + (self.height as i32 - 1 - p.y) * self.width as i32)) as usize;
        self.render_data[index + 0] = color.r;
        self.render_data[index + 1] = color.g;
        self.render_data[index + 2] = color.b;
    }

    pub fn get_pixel(&self, p: Vector2<i32>) -> Option<Color> {
        if !self.coord_in_bounds(p) {
            return None;
        }
        let index = (3 * (p.x + (self.height as i32 - 1 - p.y) * self.width as i32)) as usize;
        return Some(Color {
            r: self.render_data[index + 0],
            g: self.render_data[index + 1],
            b: self.render_data[index + 2],
        });
    }

    /// Draws a line between coord_a and coord_b with specified color
    /// via Bresenham's algorithm as presented in https://en.wikipedia.org/wiki/Bresenham%27s_line_algorithm
    pub fn draw_line(&mut self, coord_a: Vector2<i32>, coord_b: Vector2<i32>, color: Color) {
        let mut x_0 = coord_a.x;
        let x_1 = coord_b.x;
        let mut y_0 = coord_a.y;
        let y_1 = coord_b.y;
        let dx: i32 = (x_1 - x_0).abs();
        let sx: i32 = match x_0 < x_1 {
            true  =>  1,
            false => -1,
        };
        let dy: i32 = -(y_1 - y_0).abs();
        let sy: i32 = match y_0 < y_1 {
            true  =>  1,
            false => -1,
        };
        let mut error: i32 = dx + dy;

        let mut e2;
        loop {
            self.set_pixel(Vector2::new(x_0, y_0), color);
            if (x_0 == x_1) && (y_0 == y_1) {
                break;
            }
            e2 = 2 * error;
            if e2 >= dy {
                if x_0 == x_1 {
                    break;
                }
                error += dy;
                x_0 += sx;
            }
            if e2 <= dx {
                if y_1 == y_0 {
                    break;
                }
                error += dx;
                y_0 += sy;
            }
        }
    }

    /// Draws a line list: every pair of indices is one line between two vertices.
    /// Lines are clipped to the view, lines with an end behind the camera are skipped.
    pub fn draw_line_list(
        &mut self,
        camera: &Camera,
        vertices: &[Point3<f32>],
        indices: &[u32],
        color: Color,
    ) {
        let projected: Vec<Option<Vector2<f32>>> =
            vertices.iter().map(|v| camera.project(v)).collect();
        for pair in indices.chunks_exact(2) {
            let (a, b) = match (projected[pair[0] as usize], projected[pair[1] as usize]) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };
            if let Some((a, b)) = clip_line(a, b) {
                self.draw_line(self.to_raster(a), self.to_raster(b), color);
            }
        }
    }
}

/// Liang-Barsky clipping of a segment to the [-1, 1] square.
fn clip_line(a: Vector2<f32>, b: Vector2<f32>) -> Option<(Vector2<f32>, Vector2<f32>)> {
    let d = b - a;
    let mut t_0: f32 = 0.0;
    let mut t_1: f32 = 1.0;
    let checks = [(-d.x, a.x + 1.0), (d.x, 1.0 - a.x), (-d.y, a.y + 1.0), (d.y, 1.0 - a.y)];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t_0 = t_0.max(t);
        } else {
            t_1 = t_1.min(t);
        }
        if t_0 > t_1 {
            return None;
        }
    }
    return Some((a + d * t_0, a + d * t_1));
}
