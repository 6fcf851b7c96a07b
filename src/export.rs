use std::path::Path;

use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

use crate::error::LayoutError;

/// Rasterise an SVG document to PNG bytes, scaling both dimensions by `scale`.
pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, LayoutError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(LayoutError::Render(format!("Invalid PNG scale: {}", scale)));
    }

    let mut opts = usvg::Options::default();
    load_fonts(opts.fontdb_mut());

    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| LayoutError::Render(format!("Failed to parse SVG: {}", e)))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| LayoutError::Render(format!("Cannot allocate a {width}x{height} pixmap")))?;

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| LayoutError::Render(format!("Failed to encode PNG: {}", e)))
}

/// System fonts plus `./fonts`, with `sans-serif` pointed at a family that exists.
fn load_fonts(fontdb: &mut usvg::fontdb::Database) {
    fontdb.load_system_fonts();

    let local_fonts = Path::new("fonts");
    if local_fonts.is_dir() {
        fontdb.load_fonts_dir(local_fonts);
    }

    let families: Vec<String> = fontdb
        .faces()
        .flat_map(|face| face.families.iter().map(|(family, _)| family.clone()))
        .collect();
    let sans = families
        .iter()
        .find(|f| f.to_ascii_lowercase().contains("sans"))
        .or_else(|| families.first());

    if let Some(family) = sans {
        fontdb.set_sans_serif_family(family.as_str());
    }
}
