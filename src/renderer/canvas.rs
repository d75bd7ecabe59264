//! Canvas 2D backend and DOM overlay/HUD updates

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use super::{HudText, Overlay, Scene, fit_scale};
use crate::colors;
use crate::error::{GameError, Result};

fn js_err(context: &str, err: JsValue) -> GameError {
    GameError::Render {
        reason: format!("{context}: {err:?}"),
    }
}

/// Owns the canvas context and the scale between logical and CSS pixels
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    document: Document,
    /// Logical game size (pixels)
    logical: Vec2,
    scale: f32,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, logical: Vec2) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| js_err("getContext", e))?
            .ok_or_else(|| GameError::Render {
                reason: "2D context unavailable".to_string(),
            })?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|e| js_err("not a 2D context", e.into()))?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| GameError::Render {
                reason: "no document".to_string(),
            })?;

        let mut renderer = Self {
            canvas,
            ctx,
            document,
            logical,
            scale: 1.0,
        };
        renderer.resize();
        Ok(renderer)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Fit the canvas to its container and reset the transform
    pub fn resize(&mut self) {
        let container = self
            .canvas
            .parent_element()
            .map(|p| Vec2::new(p.client_width() as f32, p.client_height() as f32))
            .unwrap_or(self.logical);
        self.scale = fit_scale(container, self.logical);

        let css = self.logical * self.scale;
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", css.x));
        let _ = style.set_property("height", &format!("{}px", css.y));

        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        self.canvas.set_width((css.x as f64 * dpr) as u32);
        self.canvas.set_height((css.y as f64 * dpr) as u32);

        let s = dpr * self.scale as f64;
        let _ = self.ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0);
        self.ctx.set_image_smoothing_enabled(false);
        log::debug!("Canvas resized: scale {:.3}, dpr {}", self.scale, dpr);
    }

    /// Client coordinates to game coordinates
    pub fn screen_to_game(&self, client: Vec2) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        super::screen_to_game(
            client,
            Vec2::new(rect.left() as f32, rect.top() as f32),
            self.scale,
        )
    }

    pub fn clear(&self) {
        self.ctx.save();
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.set_fill_style_str(colors::BACKGROUND);
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        self.ctx.restore();
    }

    pub fn draw_scene(&self, scene: &Scene) -> Result<()> {
        let ctx = &self.ctx;

        ctx.save();
        ctx.set_fill_style_str(colors::WALL);
        ctx.set_stroke_style_str(colors::WALL_STROKE);
        ctx.set_line_width(1.0);
        for wall in &scene.walls {
            let (x, y) = (wall.min.x as f64, wall.min.y as f64);
            let (w, h) = (wall.width() as f64, wall.height() as f64);
            ctx.fill_rect(x, y, w, h);
            ctx.stroke_rect(x, y, w, h);
        }

        ctx.set_fill_style_str(colors::PELLET);
        for pellet in &scene.pellets {
            self.fill_circle(pellet.center, pellet.radius)?;
        }
        ctx.set_fill_style_str(colors::POWER_PELLET);
        for pellet in &scene.power_pellets {
            self.fill_circle(pellet.center, pellet.radius)?;
        }
        ctx.restore();

        if let Some(player) = &scene.player {
            ctx.save();
            ctx.translate(player.center.x as f64, player.center.y as f64)
                .map_err(|e| js_err("translate", e))?;
            ctx.rotate(player.rotation as f64)
                .map_err(|e| js_err("rotate", e))?;
            ctx.set_fill_style_str(colors::PLAYER);
            ctx.set_stroke_style_str(colors::PLAYER_OUTLINE);
            ctx.set_line_width(1.0);

            let mouth = player.mouth as f64;
            ctx.begin_path();
            ctx.arc(0.0, 0.0, player.radius as f64, mouth, TAU - mouth)
                .map_err(|e| js_err("arc", e))?;
            ctx.line_to(0.0, 0.0);
            ctx.close_path();
            ctx.fill();
            ctx.stroke();

            // Eye
            ctx.set_fill_style_str(colors::BACKGROUND);
            ctx.begin_path();
            ctx.arc(-2.0, -3.0, 2.0, 0.0, TAU)
                .map_err(|e| js_err("arc", e))?;
            ctx.fill();
            ctx.restore();
        }

        Ok(())
    }

    fn fill_circle(&self, center: Vec2, radius: f32) -> Result<()> {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .map_err(|e| js_err("arc", e))?;
        self.ctx.fill();
        Ok(())
    }

    pub fn draw_fps(&self, fps: u32) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
        ctx.fill_rect(10.0, 10.0, 80.0, 30.0);
        ctx.set_fill_style_str(colors::TEXT);
        ctx.set_font("14px Arial");
        ctx.set_text_align("left");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(&format!("FPS: {}", fps), 15.0, 25.0);
        ctx.restore();
    }

    /// Show `overlay`, or hide the overlay element when None
    pub fn set_overlay(&self, overlay: Option<&Overlay>) {
        let Some(root) = self.document.get_element_by_id("gameOverlay") else {
            return;
        };
        let Some(overlay) = overlay else {
            let _ = root.class_list().add_1("hidden");
            return;
        };

        let _ = root.class_list().remove_1("hidden");
        if let Some(title) = self.document.get_element_by_id("overlayTitle") {
            title.set_text_content(Some(&overlay.title));
        }
        if let Some(message) = self.document.get_element_by_id("overlayMessage") {
            message.set_text_content(Some(&overlay.message));
        }
        if let Some(button) = self
            .document
            .get_element_by_id("startButton")
            .and_then(|b| b.dyn_into::<HtmlElement>().ok())
        {
            let display = if overlay.show_button { "block" } else { "none" };
            let _ = button.style().set_property("display", display);
        }
    }

    pub fn update_hud(&self, hud: &HudText) {
        for (id, text) in [
            ("score", &hud.score),
            ("level", &hud.level),
            ("lives", &hud.lives),
        ] {
            if let Some(el) = self.document.get_element_by_id(id) {
                if el.text_content().as_deref() != Some(text.as_str()) {
                    el.set_text_content(Some(text));
                }
            }
        }
    }
}
