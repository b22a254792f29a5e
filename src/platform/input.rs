//! Pointer and surface geometry helpers shared by the browser host

use glam::Vec2;

/// Viewport width at or below which the game surface fills the viewport
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Pointer position relative to the canvas' top-left corner
#[inline]
pub fn surface_point(client: Vec2, canvas_origin: Vec2) -> Vec2 {
    client - canvas_origin
}

/// Size the canvas should take: its container on desktop, the whole
/// viewport on narrow screens.
pub fn surface_size(container: Vec2, viewport: Vec2) -> Vec2 {
    let size = if viewport.x <= MOBILE_BREAKPOINT {
        viewport
    } else {
        container
    };
    size.max(Vec2::ONE)
}
