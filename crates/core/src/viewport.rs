//! Keeping the drawable surface and the GL viewport in step with the window.

use crate::backend::GlBackend;
use serde::{Deserialize, Serialize};

/// Pixel size of the drawable surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Something with a settable pixel size: a canvas element, an offscreen
/// framebuffer.
pub trait Surface {
    fn set_size(&mut self, width: u32, height: u32);
}

/// Sizes `surface` to the window and, when a context is present, maps the
/// viewport transform onto the full surface.
///
/// Returns the new viewport. Dimensions beyond `i32::MAX` saturate when
/// handed to the backend.
pub fn resize<S, B>(surface: &mut S, window: Viewport, gl: Option<&B>) -> Viewport
where
    S: Surface + ?Sized,
    B: GlBackend,
{
    surface.set_size(window.width, window.height);
    if let Some(gl) = gl {
        gl.viewport(0, 0, clamp_i32(window.width), clamp_i32(window.height));
        log::debug!("viewport set to {}x{}", window.width, window.height);
    }
    window
}

fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSurface, RecordingBackend};

    #[test]
    fn resize_sets_surface_and_viewport() {
        let gl = RecordingBackend::new();
        let mut surface = FakeSurface::default();

        let vp = resize(&mut surface, Viewport::new(1280, 720), Some(&gl));

        assert_eq!(vp, Viewport::new(1280, 720));
        assert_eq!((surface.width, surface.height), (1280, 720));
        assert_eq!(gl.viewports(), vec![(0, 0, 1280, 720)]);
    }

    #[test]
    fn resize_without_context_only_touches_surface() {
        let mut surface = FakeSurface::default();

        resize::<_, RecordingBackend>(&mut surface, Viewport::new(640, 480), None);

        assert_eq!((surface.width, surface.height), (640, 480));
        assert_eq!(surface.resizes, 1);
    }

    #[test]
    fn zero_sized_window_is_passed_through() {
        let gl = RecordingBackend::new();
        let mut surface = FakeSurface::default();

        resize(&mut surface, Viewport::new(0, 0), Some(&gl));

        assert_eq!(gl.viewports(), vec![(0, 0, 0, 0)]);
    }

    #[test]
    fn oversized_dimensions_saturate() {
        let gl = RecordingBackend::new();
        let mut surface = FakeSurface::default();

        resize(&mut surface, Viewport::new(u32::MAX, 10), Some(&gl));

        assert_eq!(surface.width, u32::MAX);
        assert_eq!(gl.viewports(), vec![(0, 0, i32::MAX, 10)]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn viewport_always_matches_window(w in 0_u32..=8192, h in 0_u32..=8192) {
                let gl = RecordingBackend::new();
                let mut surface = FakeSurface::default();

                let vp = resize(&mut surface, Viewport::new(w, h), Some(&gl));

                prop_assert_eq!(vp, Viewport::new(w, h));
                prop_assert_eq!((surface.width, surface.height), (w, h));
                prop_assert_eq!(gl.viewports(), vec![(0, 0, w as i32, h as i32)]);
            }
        }
    }
}
