//! Canvas 2D backend
//!
//! Executes a display list on a `CanvasRenderingContext2d`. The pursuer
//! portrait is the only external asset; until it has decoded, or if it fails
//! to, portraits are drawn as a flat fill inside the same circular clip.

use std::cell::Cell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::shapes::Shape;
use crate::sim::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Loading,
    Ready,
    Failed,
}

/// Asynchronously decoded image with a shared status flag
pub struct PortraitImage {
    image: HtmlImageElement,
    status: Rc<Cell<ImageStatus>>,
}

impl PortraitImage {
    /// Start loading `src`; drawing falls back until decode succeeds
    pub fn load(src: &str) -> Result<Self, JsValue> {
        let image = HtmlImageElement::new()?;
        image.set_src(src);
        let status = Rc::new(Cell::new(ImageStatus::Loading));

        let decode = image.decode();
        let flag = status.clone();
        let src = src.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(decode).await {
                Ok(_) => {
                    log::info!("Portrait loaded: {}", src);
                    flag.set(ImageStatus::Ready);
                }
                Err(e) => {
                    log::warn!("Portrait {} failed to load, using flat fill: {:?}", src, e);
                    flag.set(ImageStatus::Failed);
                }
            }
        });

        Ok(Self { image, status })
    }

    pub fn status(&self) -> ImageStatus {
        self.status.get()
    }
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    portrait: Option<PortraitImage>,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, portrait: Option<PortraitImage>) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            canvas,
            ctx,
            portrait,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Match the backing store to the given size in canvas units
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn draw(&self, shapes: &[Shape]) {
        for shape in shapes {
            self.draw_shape(shape);
        }
    }

    fn draw_shape(&self, shape: &Shape) {
        let ctx = &self.ctx;
        match shape {
            Shape::Clear { width, height } => {
                ctx.clear_rect(0.0, 0.0, *width as f64, *height as f64);
            }
            Shape::Line {
                from,
                to,
                color,
                width,
            } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*width as f64);
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            Shape::GlowRect { rect, color, blur } => {
                ctx.set_fill_style_str(color);
                ctx.set_shadow_blur(*blur as f64);
                ctx.set_shadow_color(color);
                fill_rect(ctx, rect);
                ctx.set_shadow_blur(0.0);
            }
            Shape::Portrait {
                rect,
                fallback,
                ring,
                ring_width,
            } => self.draw_portrait(rect, fallback, ring, *ring_width),
            Shape::Disc {
                center,
                radius,
                fill,
                stroke,
                stroke_width,
            } => {
                ctx.begin_path();
                let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                ctx.set_fill_style_str(fill);
                ctx.fill();
                ctx.set_stroke_style_str(stroke);
                ctx.set_line_width(*stroke_width as f64);
                ctx.stroke();
                ctx.close_path();
            }
        }
    }

    fn draw_portrait(&self, rect: &Rect, fallback: &str, ring: &str, ring_width: f32) {
        let ctx = &self.ctx;
        let center = rect.center();
        let radius = (rect.size.x / 2.0) as f64;

        ctx.save();
        circle_path(ctx, center.x as f64, center.y as f64, radius);
        ctx.clip();

        let drawn = match &self.portrait {
            Some(p) if p.status() == ImageStatus::Ready => ctx
                .draw_image_with_html_image_element_and_dw_and_dh(
                    &p.image,
                    rect.left() as f64,
                    rect.top() as f64,
                    rect.size.x as f64,
                    rect.size.y as f64,
                )
                .is_ok(),
            _ => false,
        };
        if !drawn {
            ctx.set_fill_style_str(fallback);
            fill_rect(ctx, rect);
        }
        ctx.restore();

        circle_path(ctx, center.x as f64, center.y as f64, radius);
        ctx.set_stroke_style_str(ring);
        ctx.set_line_width(ring_width as f64);
        ctx.stroke();
    }
}

fn fill_rect(ctx: &CanvasRenderingContext2d, rect: &Rect) {
    ctx.fill_rect(
        rect.left() as f64,
        rect.top() as f64,
        rect.size.x as f64,
        rect.size.y as f64,
    );
}

fn circle_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64) {
    ctx.begin_path();
    let _ = ctx.arc(x, y, radius, 0.0, TAU);
    ctx.close_path();
}
