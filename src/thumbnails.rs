use crate::pdf::{PageSize, PageSource, to_render_image};
use anyhow::Result;
use gpui::RenderImage;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 180;
pub const THUMBNAIL_SIZE_STEP: i32 = 40;
const MIN_THUMBNAIL_SIDE: u32 = 60;
const MAX_THUMBNAIL_SIDE: u32 = 480;

// A4 portrait, used when a page reports a degenerate size.
const FALLBACK_PAGE_SIZE: PageSize = PageSize {
    width_pt: 595.0,
    height_pt: 842.0,
};

/// Which side of the thumbnail canvas is held constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailFit {
    Width(u32),
    Height(u32),
}

impl Default for ThumbnailFit {
    fn default() -> Self {
        Self::Width(DEFAULT_THUMBNAIL_WIDTH)
    }
}

impl fmt::Display for ThumbnailFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width(px) => write!(f, "w:{px}"),
            Self::Height(px) => write!(f, "h:{px}"),
        }
    }
}

impl ThumbnailFit {
    /// Parses the stored form, `w:<px>` or `h:<px>`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (side, value) = raw.trim().split_once(':')?;
        let px = value.trim().parse::<u32>().ok().filter(|px| *px > 0)?;
        match side.trim() {
            "w" => Some(Self::Width(px)),
            "h" => Some(Self::Height(px)),
            _ => None,
        }
    }

    /// Grows or shrinks the fixed side by `delta` pixels, within bounds.
    pub fn step(self, delta: i32) -> Self {
        let resize = |px: u32| {
            (px as i64 + delta as i64).clamp(MIN_THUMBNAIL_SIDE as i64, MAX_THUMBNAIL_SIDE as i64)
                as u32
        };
        match self {
            Self::Width(px) => Self::Width(resize(px)),
            Self::Height(px) => Self::Height(resize(px)),
        }
    }

    /// Canvas size in pixels for a page, keeping the page's aspect ratio.
    pub fn canvas_size(self, page: PageSize) -> (u32, u32) {
        let page = if page.width_pt > 1.0 && page.height_pt > 1.0 {
            page
        } else {
            FALLBACK_PAGE_SIZE
        };

        match self {
            Self::Width(width) => {
                let height = width as f32 * page.height_pt / page.width_pt;
                (width, (height.round() as u32).max(1))
            }
            Self::Height(height) => {
                let width = height as f32 * page.width_pt / page.height_pt;
                ((width.round() as u32).max(1), height)
            }
        }
    }
}

/// One clickable preview in the thumbnail panel.
#[derive(Clone)]
pub struct Thumbnail {
    pub page_index: usize,
    pub width: u32,
    pub height: u32,
    /// `None` when the page could not be rasterized.
    pub image: Option<Arc<RenderImage>>,
}

pub struct ThumbnailGenerator {
    fit: ThumbnailFit,
}

impl ThumbnailGenerator {
    pub fn new(fit: ThumbnailFit) -> Self {
        Self { fit }
    }

    pub fn fit(&self) -> ThumbnailFit {
        self.fit
    }

    /// Rasterizes every page of `document`, in page order. A page that fails
    /// still yields an entry, without an image.
    pub fn generate<D: PageSource + ?Sized>(&self, document: &D) -> Vec<Thumbnail> {
        let started_at = Instant::now();
        let page_count = document.page_count();
        let thumbnails: Vec<Thumbnail> = (0..page_count)
            .map(|page_index| self.generate_one(document, page_index))
            .collect();

        let failed = thumbnails.iter().filter(|t| t.image.is_none()).count();
        crate::debug_log!(
            "[thumbs] generated {} thumbnails ({} failed) fit={} | {}ms",
            thumbnails.len(),
            failed,
            self.fit,
            started_at.elapsed().as_millis()
        );
        thumbnails
    }

    fn generate_one<D: PageSource + ?Sized>(&self, document: &D, page_index: usize) -> Thumbnail {
        let page_size = match document.page_size(page_index) {
            Ok(size) => size,
            Err(err) => {
                crate::debug_log!("[thumbs] p{} size failed: {:#}", page_index + 1, err);
                FALLBACK_PAGE_SIZE
            }
        };
        let (width, height) = self.fit.canvas_size(page_size);

        let image = match render_thumbnail(document, page_index, width, height) {
            Ok(image) => Some(image),
            Err(err) => {
                crate::debug_log!("[thumbs] p{} render failed: {:#}", page_index + 1, err);
                None
            }
        };

        Thumbnail {
            page_index,
            width,
            height,
            image,
        }
    }
}

fn render_thumbnail<D: PageSource + ?Sized>(
    document: &D,
    page_index: usize,
    width: u32,
    height: u32,
) -> Result<Arc<RenderImage>> {
    let raster = document.render_page(page_index, width, height)?;
    to_render_image(&raster)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::anyhow;
    use image::RgbaImage;
    use std::cell::Cell;

    /// In-memory document: one size per page, optional failing pages.
    pub(crate) struct FakeDocument {
        pub sizes: Vec<PageSize>,
        pub failing_pages: Vec<usize>,
        pub renders: Cell<usize>,
    }

    impl FakeDocument {
        pub fn uniform(page_count: usize, width_pt: f32, height_pt: f32) -> Self {
            Self {
                sizes: vec![PageSize { width_pt, height_pt }; page_count],
                failing_pages: Vec::new(),
                renders: Cell::new(0),
            }
        }
    }

    impl PageSource for FakeDocument {
        fn page_count(&self) -> usize {
            self.sizes.len()
        }

        fn page_size(&self, index: usize) -> Result<PageSize> {
            self.sizes
                .get(index)
                .copied()
                .ok_or_else(|| anyhow!("page {index} out of range"))
        }

        fn render_page(&self, index: usize, width: u32, height: u32) -> Result<RgbaImage> {
            self.renders.set(self.renders.get() + 1);
            if self.failing_pages.contains(&index) {
                return Err(anyhow!("page {index} is broken"));
            }
            Ok(RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255])))
        }
    }

    fn ratio(width: u32, height: u32) -> f32 {
        width as f32 / height as f32
    }

    #[test]
    fn fixed_width_keeps_aspect_ratio() {
        let page = PageSize {
            width_pt: 612.0,
            height_pt: 792.0,
        };
        let (width, height) = ThumbnailFit::Width(180).canvas_size(page);
        assert_eq!(width, 180);
        assert_eq!(height, 233);
        assert!((ratio(width, height) - 612.0 / 792.0).abs() < 0.01);
    }

    #[test]
    fn fixed_height_keeps_aspect_ratio() {
        let page = PageSize {
            width_pt: 842.0,
            height_pt: 595.0,
        };
        let (width, height) = ThumbnailFit::Height(120).canvas_size(page);
        assert_eq!(height, 120);
        assert_eq!(width, 170);
        assert!((ratio(width, height) - 842.0 / 595.0).abs() < 0.01);
    }

    #[test]
    fn extreme_pages_never_collapse_to_zero() {
        let strip = PageSize {
            width_pt: 10_000.0,
            height_pt: 2.0,
        };
        assert_eq!(ThumbnailFit::Width(100).canvas_size(strip), (100, 1));
    }

    #[test]
    fn degenerate_page_uses_fallback_ratio() {
        let empty = PageSize {
            width_pt: 0.0,
            height_pt: 0.0,
        };
        assert_eq!(ThumbnailFit::Width(595).canvas_size(empty), (595, 842));
    }

    #[test]
    fn fit_round_trips_through_its_stored_form() {
        for fit in [ThumbnailFit::Width(180), ThumbnailFit::Height(64)] {
            assert_eq!(ThumbnailFit::parse(&fit.to_string()), Some(fit));
        }
        assert_eq!(ThumbnailFit::parse("x:10"), None);
        assert_eq!(ThumbnailFit::parse("w:0"), None);
        assert_eq!(ThumbnailFit::parse("w"), None);
    }

    #[test]
    fn step_keeps_the_fixed_side_within_bounds() {
        assert_eq!(ThumbnailFit::Width(180).step(40), ThumbnailFit::Width(220));
        assert_eq!(ThumbnailFit::Height(100).step(-80), ThumbnailFit::Height(60));
        assert_eq!(ThumbnailFit::Width(460).step(40), ThumbnailFit::Width(480));
    }

    #[test]
    fn generates_one_entry_per_page_in_order() {
        let document = FakeDocument::uniform(4, 612.0, 792.0);
        let thumbnails = ThumbnailGenerator::new(ThumbnailFit::default()).generate(&document);

        let indices: Vec<usize> = thumbnails.iter().map(|t| t.page_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(thumbnails.iter().all(|t| t.image.is_some()));
        assert!(thumbnails.iter().all(|t| t.width == DEFAULT_THUMBNAIL_WIDTH));
    }

    #[test]
    fn failed_page_keeps_its_slot() {
        let mut document = FakeDocument::uniform(3, 612.0, 792.0);
        document.failing_pages = vec![1];
        let thumbnails = ThumbnailGenerator::new(ThumbnailFit::default()).generate(&document);

        assert_eq!(thumbnails.len(), 3);
        assert!(thumbnails[0].image.is_some());
        assert!(thumbnails[1].image.is_none());
        assert_eq!(thumbnails[1].page_index, 1);
        assert!(thumbnails[2].image.is_some());
    }

    #[test]
    fn empty_document_yields_nothing() {
        let document = FakeDocument::uniform(0, 612.0, 792.0);
        let thumbnails = ThumbnailGenerator::new(ThumbnailFit::default()).generate(&document);
        assert!(thumbnails.is_empty());
        assert_eq!(document.renders.get(), 0);
    }
}
