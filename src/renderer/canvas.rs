//! Canvas 2D backend

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::scene::{AssetStatus, DrawCommand, Sprite};

const LABEL_FONT: &str = "bold 12px FKRasterGrotesk";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    player_image: HtmlImageElement,
    projectile_image: HtmlImageElement,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, player_src: &str, projectile_src: &str) -> Option<Self> {
        use wasm_bindgen::JsCast;

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let player_image = load_image(player_src)?;
        let projectile_image = load_image(projectile_src)?;
        Some(Self {
            canvas,
            ctx,
            player_image,
            projectile_image,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        log::info!("Canvas resized to {}x{}", width, height);
    }

    /// A sprite is usable once the image decoded with real dimensions
    pub fn assets(&self) -> AssetStatus {
        AssetStatus {
            player_ready: is_decoded(&self.player_image),
            projectile_ready: is_decoded(&self.projectile_image),
        }
    }

    pub fn draw(&self, commands: &[DrawCommand]) {
        let ctx = &self.ctx;
        let width = f64::from(self.canvas.width());
        let height = f64::from(self.canvas.height());

        for command in commands {
            match command {
                DrawCommand::Clear { color } => {
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(0.0, 0.0, width, height);
                }
                DrawCommand::Sprite {
                    sprite,
                    center,
                    size,
                    rotation,
                    alpha,
                } => {
                    let image = match sprite {
                        Sprite::Player => &self.player_image,
                        Sprite::Projectile => &self.projectile_image,
                    };
                    ctx.save();
                    ctx.set_global_alpha(f64::from(*alpha));
                    self.centre_on(center.x, center.y, *rotation);
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        image,
                        f64::from(-size.x / 2.0),
                        f64::from(-size.y / 2.0),
                        f64::from(size.x),
                        f64::from(size.y),
                    );
                    ctx.restore();
                }
                DrawCommand::Placeholder {
                    color,
                    center,
                    size,
                    rotation,
                    alpha,
                } => {
                    ctx.save();
                    ctx.set_global_alpha(f64::from(*alpha));
                    self.centre_on(center.x, center.y, *rotation);
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(
                        f64::from(-size.x / 2.0),
                        f64::from(-size.y / 2.0),
                        f64::from(size.x),
                        f64::from(size.y),
                    );
                    ctx.restore();
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    rotation,
                    color,
                    label,
                } => {
                    ctx.save();
                    self.centre_on(center.x, center.y, *rotation);
                    ctx.set_fill_style_str(color);
                    ctx.begin_path();
                    let _ = ctx.arc(0.0, 0.0, f64::from(*radius), 0.0, TAU);
                    ctx.fill();

                    ctx.set_fill_style_str(super::colors::INK);
                    ctx.set_font(LABEL_FONT);
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                    let _ = ctx.fill_text(label, 0.0, 0.0);
                    ctx.restore();
                }
                DrawCommand::Rect {
                    pos,
                    size,
                    color,
                    alpha,
                } => {
                    ctx.set_global_alpha(f64::from(*alpha));
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(
                        f64::from(pos.x),
                        f64::from(pos.y),
                        f64::from(size.x),
                        f64::from(size.y),
                    );
                    ctx.set_global_alpha(1.0);
                }
                DrawCommand::Crosshair {
                    at,
                    arm,
                    line_width,
                    color,
                } => {
                    let (x, y, arm) = (f64::from(at.x), f64::from(at.y), f64::from(*arm));
                    ctx.set_stroke_style_str(color);
                    ctx.set_line_width(f64::from(*line_width));
                    ctx.begin_path();
                    ctx.move_to(x - arm, y);
                    ctx.line_to(x + arm, y);
                    ctx.move_to(x, y - arm);
                    ctx.line_to(x, y + arm);
                    ctx.stroke();
                }
                DrawCommand::Overlay { color, alpha } => {
                    ctx.save();
                    ctx.set_global_alpha(f64::from(*alpha));
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(0.0, 0.0, width, height);
                    ctx.restore();
                }
            }
        }
    }

    /// Move the origin to (x, y) and rotate about it
    fn centre_on(&self, x: f32, y: f32, rotation: f32) {
        let _ = self.ctx.translate(f64::from(x), f64::from(y));
        if rotation != 0.0 {
            let _ = self.ctx.rotate(f64::from(rotation));
        }
    }
}

fn load_image(src: &str) -> Option<HtmlImageElement> {
    let image = HtmlImageElement::new().ok()?;
    image.set_src(src);
    Some(image)
}

fn is_decoded(image: &HtmlImageElement) -> bool {
    image.complete() && image.natural_width() > 0
}
