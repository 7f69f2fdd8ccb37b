mod raster;

use crate::i18n::{I18n, Language};
use anyhow::{Context as _, Result, anyhow};
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::Path;
use std::sync::OnceLock;

pub use self::raster::to_render_image;

static PDFIUM_INSTANCE: OnceLock<std::result::Result<Pdfium, String>> = OnceLock::new();

/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

/// Page-level introspection of an opened document.
pub trait PageSource {
    fn page_count(&self) -> usize;

    fn page_size(&self, index: usize) -> Result<PageSize>;

    /// Rasterizes a page into an RGBA canvas of exactly `width` x `height`.
    fn render_page(&self, index: usize, width: u32, height: u32) -> Result<RgbaImage>;
}

/// Builds a document handle from a path on disk.
pub trait DocumentLoader {
    type Document: PageSource;

    fn load(&self, path: &Path) -> Result<Self::Document>;
}

fn shared_pdfium(language: Language) -> Result<&'static Pdfium> {
    match PDFIUM_INSTANCE.get_or_init(|| init_pdfium(language).map_err(|err| format!("{err:#}"))) {
        Ok(pdfium) => Ok(pdfium),
        Err(message) => Err(anyhow!("{message}")),
    }
}

fn init_pdfium(language: Language) -> Result<Pdfium> {
    let i18n = I18n::new(language);

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./lib"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .context(i18n.pdfium_not_found)?;

    crate::debug_log!("[pdfium] library bound");
    Ok(Pdfium::new(bindings))
}

/// Binds pdfium up front so the first open does not pay for it.
pub fn ensure_pdfium_ready(language: Language) -> Result<()> {
    shared_pdfium(language).map(|_| ())
}

#[derive(Clone, Copy)]
pub struct PdfiumLoader {
    language: Language,
}

impl PdfiumLoader {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl DocumentLoader for PdfiumLoader {
    type Document = PdfiumDocument;

    fn load(&self, path: &Path) -> Result<PdfiumDocument> {
        let i18n = I18n::new(self.language);
        if !path.is_file() {
            return Err(anyhow!(i18n.cannot_open_file(path)));
        }

        let pdfium = shared_pdfium(self.language)?;
        let document = pdfium
            .load_pdf_from_file(path, None)
            .with_context(|| i18n.pdfium_cannot_open_file(path))?;

        crate::debug_log!(
            "[pdf][load] {} pages={}",
            path.display(),
            document.pages().len()
        );

        Ok(PdfiumDocument {
            language: self.language,
            document,
        })
    }
}

pub struct PdfiumDocument {
    language: Language,
    document: PdfDocument<'static>,
}

impl PdfiumDocument {
    fn page(&self, index: usize) -> Result<PdfPage<'_>> {
        let index = checked_page_index(self.language, index, self.page_count())?;
        Ok(self.document.pages().get(index)?)
    }
}

/// pdfium addresses pages with `u16`.
fn checked_page_index(language: Language, index: usize, count: usize) -> Result<u16> {
    match u16::try_from(index) {
        Ok(index) if (index as usize) < count => Ok(index),
        _ => Err(anyhow!(I18n::new(language).page_out_of_range(index, count))),
    }
}

impl PageSource for PdfiumDocument {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<PageSize> {
        let page = self.page(index)?;
        Ok(PageSize {
            width_pt: page.width().value,
            height_pt: page.height().value,
        })
    }

    fn render_page(&self, index: usize, width: u32, height: u32) -> Result<RgbaImage> {
        let i18n = I18n::new(self.language);
        let page = self.page(index)?;
        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32);
        let bitmap = page.render_with_config(&config)?;

        let rendered_width = bitmap.width() as u32;
        let rendered_height = bitmap.height() as u32;
        if rendered_width == 0 || rendered_height == 0 {
            return Err(anyhow!(
                i18n.invalid_bitmap_size(rendered_width, rendered_height)
            ));
        }

        RgbaImage::from_raw(rendered_width, rendered_height, bitmap.as_rgba_bytes()).ok_or_else(
            || {
                anyhow!(i18n.cannot_create_image_buffer(rendered_width, rendered_height))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error_not_a_crash() {
        let loader = PdfiumLoader::new(Language::EnUs);
        let result = loader.load(Path::new("/no/such/dir/missing.pdf"));
        assert!(result.is_err());
    }

    #[test]
    fn directory_is_not_a_document() {
        let loader = PdfiumLoader::new(Language::EnUs);
        assert!(loader.load(&std::env::temp_dir()).is_err());
    }

    #[test]
    fn page_index_must_be_below_the_page_count() {
        assert_eq!(checked_page_index(Language::EnUs, 0, 3).ok(), Some(0));
        assert_eq!(checked_page_index(Language::EnUs, 2, 3).ok(), Some(2));
        assert!(checked_page_index(Language::EnUs, 3, 3).is_err());
        assert!(checked_page_index(Language::EnUs, 0, 0).is_err());
    }

    #[test]
    fn page_index_beyond_pdfium_range_is_rejected() {
        let huge = u16::MAX as usize + 1;
        assert!(checked_page_index(Language::EnUs, huge, usize::MAX).is_err());
    }
}
