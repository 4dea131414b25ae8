//! PDF rasterization: one PNG per PDF page, written into the book's cache.

use crate::book_loader::LoadToken;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub trait PageRasterizer: Send + Sync {
    /// Render every page of `pdf`, returning the image paths in page order.
    /// Stops between pages once `token` is cancelled.
    fn rasterize(&self, pdf: &Path, token: &LoadToken) -> Result<Vec<PathBuf>>;
}

/// Rasterizer used for `out_dir`, depending on how the binary was built.
pub fn default_rasterizer(out_dir: PathBuf) -> Box<dyn PageRasterizer> {
    #[cfg(feature = "pdf")]
    {
        Box::new(pdfium::PdfiumRasterizer::new(out_dir, pdfium::RASTER_WIDTH))
    }
    #[cfg(not(feature = "pdf"))]
    {
        Box::new(UnsupportedRasterizer { out_dir })
    }
}

#[cfg(not(feature = "pdf"))]
struct UnsupportedRasterizer {
    out_dir: PathBuf,
}

#[cfg(not(feature = "pdf"))]
impl PageRasterizer for UnsupportedRasterizer {
    fn rasterize(&self, pdf: &Path, _token: &LoadToken) -> Result<Vec<PathBuf>> {
        tracing::warn!(
            pdf = %pdf.display(),
            out_dir = %self.out_dir.display(),
            "PDF support not compiled in"
        );
        anyhow::bail!(
            "cannot open {}: this build has no PDF support (rebuild with `--features pdf`)",
            pdf.display()
        )
    }
}

#[cfg(feature = "pdf")]
mod pdfium {
    use super::PageRasterizer;
    use crate::book_loader::LoadToken;
    use anyhow::{Context, Result, anyhow};
    use pdfium_render::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tracing::{debug, info};

    /// Target render width for rasterized pages, in pixels.
    pub const RASTER_WIDTH: u16 = 1200;

    /// Bind pdfium, preferring a vendored copy under `vendor/pdfium/lib`.
    pub fn init_pdfium() -> Result<Pdfium, PdfiumError> {
        let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
            p.push("vendor/pdfium/lib");
            if p.exists() { Some(p) } else { None }
        });

        if let Some(vendor_path) = vendor_path {
            if let Ok(binding) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
            {
                return Ok(Pdfium::new(binding));
            }
        }

        Pdfium::bind_to_system_library().map(Pdfium::new)
    }

    pub struct PdfiumRasterizer {
        out_dir: PathBuf,
        target_width: u16,
    }

    impl PdfiumRasterizer {
        pub fn new(out_dir: PathBuf, target_width: u16) -> Self {
            Self {
                out_dir,
                target_width,
            }
        }

        fn page_path(&self, index: usize) -> PathBuf {
            self.out_dir.join(format!("page-{:04}.png", index + 1))
        }
    }

    impl PageRasterizer for PdfiumRasterizer {
        fn rasterize(&self, pdf: &Path, token: &LoadToken) -> Result<Vec<PathBuf>> {
            let pdfium = init_pdfium().map_err(|err| anyhow!("binding pdfium: {err}"))?;
            let document = pdfium
                .load_pdf_from_file(pdf, None)
                .map_err(|err| anyhow!("opening {}: {err}", pdf.display()))?;
            fs::create_dir_all(&self.out_dir)
                .with_context(|| format!("creating {}", self.out_dir.display()))?;

            let config = PdfRenderConfig::new().set_target_width(self.target_width as i32);
            let page_count = document.pages().len() as usize;
            let mut paths = Vec::with_capacity(page_count);
            for (index, page) in document.pages().iter().enumerate() {
                token.check("rasterize")?;
                let path = self.page_path(index);
                if !path.exists() {
                    let bitmap = page
                        .render_with_config(&config)
                        .map_err(|err| anyhow!("rendering page {}: {err}", index + 1))?;
                    let rgba = bitmap.as_rgba_bytes().to_vec();
                    let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
                    let buffer = image::RgbaImage::from_raw(width, height, rgba)
                        .ok_or_else(|| anyhow!("page {} bitmap has wrong size", index + 1))?;
                    buffer
                        .save(&path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    debug!(page = index + 1, width, height, "Rasterized PDF page");
                }
                paths.push(path);
            }
            info!(pdf = %pdf.display(), pages = paths.len(), "Rasterized PDF");
            Ok(paths)
        }
    }
}
