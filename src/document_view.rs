#[cfg(any(target_os = "macos", target_os = "windows"))]
mod web;

use crate::i18n::I18n;
use crate::navigation::NavigationCommand;
use crate::pdf::{PageSize, PageSource, to_render_image};
use crate::thumbnails::ThumbnailFit;
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::*;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[cfg(any(target_os = "macos", target_os = "windows"))]
use gpui_component::webview::WebView;

const NATIVE_PAGE_WIDTH: u32 = 1400;
const WEB_VIEW_AVAILABLE: bool = cfg!(any(target_os = "macos", target_os = "windows"));

/// `file://` URI for a local path, each segment percent-encoded.
pub fn file_uri(path: &Path) -> String {
    let mut segments: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                segments.push(prefix.as_os_str().to_string_lossy().replace('\\', "/"))
            }
            Component::RootDir => {}
            Component::CurDir => {}
            Component::ParentDir => segments.push("..".to_string()),
            Component::Normal(segment) => {
                segments.push(urlencoding::encode(&segment.to_string_lossy()).into_owned())
            }
        }
    }
    format!("file:///{}", segments.join("/"))
}

struct NativePage {
    page_index: usize,
    image: Option<Arc<RenderImage>>,
}

impl NativePage {
    fn render<D: PageSource + ?Sized>(document: &D, page_index: usize) -> Self {
        let page_size = document.page_size(page_index).unwrap_or(PageSize {
            width_pt: 0.0,
            height_pt: 0.0,
        });
        let (width, height) = ThumbnailFit::Width(NATIVE_PAGE_WIDTH).canvas_size(page_size);

        let image = document
            .render_page(page_index, width, height)
            .and_then(|raster| to_render_image(&raster));
        let image = match image {
            Ok(image) => Some(image),
            Err(err) => {
                crate::debug_log!("[pdf][render] p{} failed: {:#}", page_index + 1, err);
                None
            }
        };

        Self { page_index, image }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceKind {
    Web,
    Native,
}

/// Surfaces to try for a file, in order. The web view needs only the path;
/// rasterized pages need an opened document.
fn surface_candidates(web_view: bool, has_document: bool) -> Vec<SurfaceKind> {
    let mut candidates = Vec::with_capacity(2);
    if web_view {
        candidates.push(SurfaceKind::Web);
    }
    if has_document {
        candidates.push(SurfaceKind::Native);
    }
    candidates
}

enum Surface {
    Empty,
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    Web(Entity<WebView>),
    Native(NativePage),
}

/// Shows the open document. An embedded web view renders the file where the
/// platform has one; elsewhere pages are rasterized through pdfium.
pub struct DocumentView {
    surface: Surface,
    path: Option<PathBuf>,
    visible: bool,
}

impl DocumentView {
    pub fn new() -> Self {
        Self {
            surface: Surface::Empty,
            path: None,
            visible: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.surface, Surface::Empty)
    }

    /// File currently shown, whichever surface displays it.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Points the view at `path`. `document` is only needed for rasterized
    /// pages; the web view loads the file on its own. Returns `false` when no
    /// surface could show the file.
    pub fn load<D: PageSource + ?Sized>(
        &mut self,
        path: &Path,
        document: Option<&D>,
        window: &mut Window,
        cx: &mut App,
    ) -> bool {
        self.clear(cx);

        for kind in surface_candidates(WEB_VIEW_AVAILABLE, document.is_some()) {
            let surface = match kind {
                SurfaceKind::Web => self.build_web(path, window, cx),
                SurfaceKind::Native => document.map(|document| {
                    crate::debug_log!("[webview] native surface for {}", path.display());
                    Surface::Native(NativePage::render(document, 0))
                }),
            };
            if let Some(surface) = surface {
                self.surface = surface;
                self.path = Some(path.to_path_buf());
                self.apply_visibility(cx);
                return true;
            }
        }

        crate::debug_log!("[webview] no surface can show {}", path.display());
        false
    }

    #[cfg(any(target_os = "macos", target_os = "windows"))]
    fn build_web(&self, path: &Path, window: &mut Window, cx: &mut App) -> Option<Surface> {
        match web::build(path, window, cx) {
            Ok(view) => Some(Surface::Web(view)),
            Err(err) => {
                crate::debug_log!("[webview] {:#}; falling back to rendered pages", err);
                None
            }
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    fn build_web(&self, _path: &Path, _window: &mut Window, _cx: &mut App) -> Option<Surface> {
        None
    }

    /// Moves the surface to the page of `command`.
    pub fn navigate<D: PageSource + ?Sized>(
        &mut self,
        command: NavigationCommand,
        document: &D,
        cx: &mut App,
    ) {
        match &mut self.surface {
            Surface::Empty => {}
            #[cfg(any(target_os = "macos", target_os = "windows"))]
            Surface::Web(view) => web::navigate(view, command, cx),
            Surface::Native(page) => {
                let _ = cx;
                if page.page_index != command.page_index || page.image.is_none() {
                    *page = NativePage::render(document, command.page_index);
                }
            }
        }
    }

    pub fn set_visible(&mut self, visible: bool, cx: &mut App) {
        self.visible = visible;
        self.apply_visibility(cx);
    }

    pub fn clear(&mut self, cx: &mut App) {
        #[cfg(any(target_os = "macos", target_os = "windows"))]
        if let Surface::Web(view) = &self.surface {
            web::set_visible(view, false, cx);
        }
        let _ = cx;
        self.surface = Surface::Empty;
        self.path = None;
    }

    fn apply_visibility(&self, cx: &mut App) {
        #[cfg(any(target_os = "macos", target_os = "windows"))]
        if let Surface::Web(view) = &self.surface {
            web::set_visible(view, self.visible, cx);
        }
        let _ = cx;
    }

    pub fn render(&self, i18n: I18n, cx: &App) -> AnyElement {
        match &self.surface {
            Surface::Empty => div().size_full().into_any_element(),
            #[cfg(any(target_os = "macos", target_os = "windows"))]
            Surface::Web(view) => div().size_full().child(view.clone()).into_any_element(),
            Surface::Native(page) => div()
                .id("native-page")
                .size_full()
                .v_flex()
                .bg(cx.theme().muted)
                .child(
                    div()
                        .w_full()
                        .px_3()
                        .py_1()
                        .text_xs()
                        .text_color(cx.theme().muted_foreground)
                        .child(i18n.webview_unavailable_hint),
                )
                .child(
                    div()
                        .flex_1()
                        .min_h(px(0.))
                        .p_3()
                        .flex()
                        .items_center()
                        .justify_center()
                        .when_some(page.image.clone(), |this, image| {
                            this.child(img(image).size_full().object_fit(ObjectFit::Contain))
                        })
                        .when(page.image.is_none(), |this| {
                            this.child(
                                div()
                                    .text_sm()
                                    .text_color(cx.theme().muted_foreground)
                                    .child(i18n.page_render_failed),
                            )
                        }),
                )
                .into_any_element(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::core::prelude::v1::test;

    #[cfg(unix)]
    #[test]
    fn plain_unix_path() {
        assert_eq!(
            file_uri(Path::new("/home/user/report.pdf")),
            "file:///home/user/report.pdf"
        );
    }

    #[cfg(unix)]
    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(
            file_uri(Path::new("/tmp/my files/a#1?.pdf")),
            "file:///tmp/my%20files/a%231%3F.pdf"
        );
        assert_eq!(
            file_uri(Path::new("/tmp/文档.pdf")),
            "file:///tmp/%E6%96%87%E6%A1%A3.pdf"
        );
    }

    #[cfg(windows)]
    #[test]
    fn drive_letter_is_kept() {
        assert_eq!(
            file_uri(Path::new(r"C:\Users\me\My Doc.pdf")),
            "file:///C:/Users/me/My%20Doc.pdf"
        );
    }

    #[test]
    fn web_view_does_not_need_an_opened_document() {
        assert_eq!(surface_candidates(true, false), vec![SurfaceKind::Web]);
        assert_eq!(
            surface_candidates(true, true),
            vec![SurfaceKind::Web, SurfaceKind::Native]
        );
    }

    #[test]
    fn rasterized_pages_need_an_opened_document() {
        assert_eq!(surface_candidates(false, true), vec![SurfaceKind::Native]);
        assert!(surface_candidates(false, false).is_empty());
    }

    #[test]
    fn native_page_keeps_failed_render_as_placeholder() {
        let mut document = crate::thumbnails::tests::FakeDocument::uniform(2, 612.0, 792.0);
        document.failing_pages = vec![1];

        let first = NativePage::render(&document, 0);
        assert_eq!(first.page_index, 0);
        assert!(first.image.is_some());

        let second = NativePage::render(&document, 1);
        assert_eq!(second.page_index, 1);
        assert!(second.image.is_none());
    }
}
