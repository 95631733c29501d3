//! Screen-space camera for pixel-based simulations

use glam::{Mat4, Vec2};

/// Orthographic camera that maps window pixels straight to clip space.
///
/// The origin sits at the top-left corner of the window and `y` grows
/// downward, matching pointer coordinates reported by the windowing system.
#[derive(Debug, Clone)]
pub struct ScreenCamera {
    pub width: f32,
    pub height: f32,
}

impl ScreenCamera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Get the projection matrix
    pub fn view_projection(&self) -> Mat4 {
        // top and bottom are swapped so that +y points down the screen
        Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, -1.0, 1.0)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_screen(camera: &ScreenCamera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
        }
    }
}
