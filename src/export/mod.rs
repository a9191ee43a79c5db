//! Plan export to image and document formats.
//!
//! The visible surface is described as SVG, rasterized with resvg/tiny-skia,
//! and optionally wrapped into a single-page PDF.

use std::fmt::Write;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use resvg::{tiny_skia, usvg};
use thiserror::Error;

use crate::geometry::hit_testing::CORNER_RADIUS;
use crate::plan::FloorPlan;
use crate::renderer;
use crate::viewport::Viewport;

mod sink;
#[cfg(target_arch = "wasm32")]
mod web;

pub use sink::export_file_name;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build SVG: {0}")]
    Svg(String),

    #[error("Failed to rasterize plan: {0}")]
    Raster(String),

    #[error("PNG encoding failed: {0}")]
    Png(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Failed to write export: {0}")]
    Write(#[from] std::io::Error),

    #[error("Sharing is not supported on this device/browser.")]
    ShareUnsupported,

    #[error("Saving files is not supported on this platform.")]
    Unsupported,

    #[error("Browser rejected the export: {0}")]
    Browser(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Raster pixels per surface pixel (2.0 for retina-quality exports)
    pub pixel_ratio: f32,
    /// DPI used to size the PDF page
    pub dpi: f32,
    /// Background color as RGBA bytes
    pub background: [u8; 4],
    /// Where files are written; the user's download directory when unset
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let [r, g, b, a] = renderer::BACKGROUND.to_array();
        Self {
            pixel_ratio: 2.0,
            dpi: 96.0,
            background: [r, g, b, a],
            output_dir: None,
        }
    }
}

impl ExportConfig {
    /// Defaults, with `FLOORPLAN_EXPORT_DIR` overriding the output directory.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            output_dir: lookup("FLOORPLAN_EXPORT_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            ..Self::default()
        }
    }
}

/// What is on screen at the moment of export.
#[derive(Debug, Clone)]
pub struct Surface {
    pub plan: FloorPlan,
    pub viewport: Viewport,
    /// Canvas size in screen pixels
    pub width: f32,
    pub height: f32,
}

pub struct PlanExporter {
    config: ExportConfig,
    /// System fonts, scanned on the first export and shared afterwards
    fonts: OnceLock<Arc<usvg::fontdb::Database>>,
}

impl PlanExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            fonts: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Encode the surface in `format`.
    pub fn export(&self, surface: &Surface, format: ExportFormat) -> ExportResult<Vec<u8>> {
        match format {
            ExportFormat::Png => self.render_to_png(surface),
            ExportFormat::Pdf => self.render_to_pdf(surface),
        }
    }

    /// Raster size in pixels.
    pub fn output_dimensions(&self, surface: &Surface) -> (u32, u32) {
        let out_w = (surface.width.max(1.0) * self.config.pixel_ratio) as u32;
        let out_h = (surface.height.max(1.0) * self.config.pixel_ratio) as u32;
        (out_w.max(1), out_h.max(1))
    }

    pub fn render_to_svg(&self, surface: &Surface) -> ExportResult<String> {
        let (out_w, out_h) = self.output_dimensions(surface);
        let plan = &surface.plan;
        let viewport = &surface.viewport;
        let mut svg = String::with_capacity(4096);

        write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {} {}\">",
            surface.width, surface.height,
        )
        .map_err(|e| ExportError::Svg(e.to_string()))?;

        let [r, g, b, a] = self.config.background;
        write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"rgb({r},{g},{b})\" fill-opacity=\"{}\"/>",
            f32::from(a) / 255.0,
        )
        .map_err(|e| ExportError::Svg(e.to_string()))?;

        write!(
            svg,
            "<g transform=\"translate({} {}) scale({})\">",
            viewport.offset.x, viewport.offset.y, viewport.scale,
        )
        .map_err(|e| ExportError::Svg(e.to_string()))?;

        write_plan(&mut svg, plan).map_err(|e| ExportError::Svg(e.to_string()))?;

        svg.push_str("</g></svg>");
        Ok(svg)
    }

    pub fn render_to_png(&self, surface: &Surface) -> ExportResult<Vec<u8>> {
        let svg = self.render_to_svg(surface)?;
        let pixmap = self.rasterize_svg(&svg)?;
        pixmap.encode_png().map_err(|e| ExportError::Png(e.to_string()))
    }

    /// A single page the size of the surface, with the raster filling it.
    pub fn render_to_pdf(&self, surface: &Surface) -> ExportResult<Vec<u8>> {
        let png_data = self.render_to_png(surface)?;
        let (out_w, out_h) = self.output_dimensions(surface);

        let image_dpi = self.config.dpi * self.config.pixel_ratio;
        let page_width_mm = out_w as f32 / image_dpi * 25.4;
        let page_height_mm = out_h as f32 / image_dpi * 25.4;

        let (doc, page1, layer1) = printpdf::PdfDocument::new(
            surface.plan.name.as_str(),
            printpdf::Mm(page_width_mm),
            printpdf::Mm(page_height_mm),
            "Plan",
        );
        let current_layer = doc.get_page(page1).get_layer(layer1);

        // printpdf bundles its own image crate; decode with that one
        let dynamic_image = printpdf::image_crate::load_from_memory(&png_data)
            .map_err(|e| ExportError::Pdf(format!("Failed to decode PNG: {e}")))?;
        let pdf_image = printpdf::Image::from_dynamic_image(&dynamic_image);

        pdf_image.add_to_layer(
            current_layer,
            printpdf::ImageTransform {
                translate_x: Some(printpdf::Mm(0.0)),
                translate_y: Some(printpdf::Mm(0.0)),
                dpi: Some(image_dpi),
                ..Default::default()
            },
        );

        doc.save_to_bytes().map_err(|e| ExportError::Pdf(e.to_string()))
    }

    fn fonts(&self) -> Arc<usvg::fontdb::Database> {
        self.fonts
            .get_or_init(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                log::debug!("Loaded {} font faces for export", db.len());
                Arc::new(db)
            })
            .clone()
    }

    fn rasterize_svg(&self, svg: &str) -> ExportResult<tiny_skia::Pixmap> {
        let opt = usvg::Options {
            fontdb: self.fonts(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| ExportError::Raster(e.to_string()))?;

        let px_w = tree.size().width() as u32;
        let px_h = tree.size().height() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| ExportError::Raster("Failed to create pixmap".to_owned()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

impl Default for PlanExporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

fn hex(color: egui::Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Same layering as the on-screen renderer, in surface pixels.
fn write_plan(svg: &mut String, plan: &FloorPlan) -> std::fmt::Result {
    let wall_color = hex(renderer::WALL);
    let label_color = hex(renderer::LENGTH_LABEL);

    for wall in plan.walls.values() {
        let Some((start, end)) = plan.wall_endpoints(wall) else {
            continue;
        };
        write!(
            svg,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{wall_color}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>",
            start.x, start.y, end.x, end.y, plan.wall_stroke_width(wall),
        )?;

        let mid = start.position().midpoint(end.position());
        let length = start.position().distance(end.position());
        write!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"{label_color}\" font-family=\"sans-serif\" dominant-baseline=\"hanging\">{}</text>",
            mid.x + renderer::LENGTH_LABEL_OFFSET.x,
            mid.y + renderer::LENGTH_LABEL_OFFSET.y,
            escape_xml(&plan.format_length(length)),
        )?;
    }

    for opening in plan.openings.values() {
        let Some((from, to)) = plan.opening_span(opening) else {
            continue;
        };
        let width = plan
            .walls
            .get(&opening.wall_id)
            .map_or(2.0, |wall| plan.wall_stroke_width(wall));
        let color = hex(renderer::opening_color(opening.kind));
        write!(
            svg,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{color}\" stroke-width=\"{width}\"/>",
            from.x, from.y, to.x, to.y,
        )?;
    }

    for room in plan.rooms.values() {
        write!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-size=\"16\" font-weight=\"bold\" fill=\"#ffffff\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"sans-serif\">{}</text>",
            room.label_position.x,
            room.label_position.y,
            escape_xml(&room.name),
        )?;
    }

    let corner_color = hex(renderer::CORNER);
    for corner in plan.corners.values() {
        write!(
            svg,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{CORNER_RADIUS}\" fill=\"{corner_color}\" stroke=\"#ffffff\" stroke-width=\"2\"/>",
            corner.x, corner.y,
        )?;
    }
    Ok(())
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
