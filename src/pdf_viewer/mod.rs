mod menu_bar;
mod thumbnail_list;

use crate::document_view::DocumentView;
use crate::i18n::{I18n, Language};
use crate::pdf::{PdfiumLoader, ensure_pdfium_ready};
use crate::session::ViewerSession;
use crate::settings::Settings;
use crate::thumbnails::THUMBNAIL_SIZE_STEP;
use crate::{
    DisableLoggingMenu, DisableStartupDialogMenu, EnableLoggingMenu, EnableStartupDialogMenu,
    LargerThumbnails, OpenFile, OpenLogsMenu, SmallerThumbnails, ToggleThumbnails,
    configure_app_menus,
};
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{button::*, *};
use std::path::PathBuf;

const TOOLBAR_HEIGHT: f32 = 40.0;

pub struct PdfViewer {
    focus_handle: FocusHandle,
    language: Language,
    settings: Settings,
    session: ViewerSession<PdfiumLoader>,
    document_view: DocumentView,
    thumbnail_scroll: VirtualListScrollHandle,
    last_window_size: Option<(f32, f32)>,
    load_failure: Option<PathBuf>,
    pending_open: Option<PathBuf>,
    dialog_open: bool,
    needs_initial_focus: bool,
    needs_startup_dialog: bool,
}

impl PdfViewer {
    pub fn new(settings: Settings, _window: &mut Window, cx: &mut Context<Self>) -> Self {
        let language = Language::detect();
        if let Err(err) = ensure_pdfium_ready(language) {
            crate::debug_log!("[pdfium] pre-init failed: {:#}", err);
        }

        let session = ViewerSession::new(PdfiumLoader::new(language), settings.thumbnail_fit());
        let needs_startup_dialog = settings.open_dialog_on_startup();

        Self {
            focus_handle: cx.focus_handle(),
            language,
            settings,
            session,
            document_view: DocumentView::new(),
            thumbnail_scroll: VirtualListScrollHandle::new(),
            last_window_size: None,
            load_failure: None,
            pending_open: None,
            dialog_open: false,
            needs_initial_focus: true,
            needs_startup_dialog,
        }
    }

    fn i18n(&self) -> I18n {
        I18n::new(self.language)
    }

    fn set_thumbnail_mode(&mut self, enabled: bool, cx: &mut Context<Self>) {
        if !self.session.set_thumbnail_mode(enabled) {
            return;
        }
        self.document_view.set_visible(!enabled, cx);
        if enabled {
            self.thumbnail_scroll
                .scroll_to_item(self.session.current_page(), ScrollStrategy::Top);
        }
        crate::debug_log!(
            "[thumbs] mode={:?} entries={}",
            self.session.mode(),
            self.session.thumbnails().len()
        );
        cx.notify();
    }

    fn toggle_thumbnails(&mut self, cx: &mut Context<Self>) {
        let enabled = !self.session.is_thumbnail_mode();
        self.set_thumbnail_mode(enabled, cx);
    }

    fn resize_thumbnails(&mut self, delta: i32, cx: &mut Context<Self>) {
        let fit = self.session.thumbnail_fit().step(delta);
        if fit == self.session.thumbnail_fit() {
            return;
        }
        self.session.set_thumbnail_fit(fit);
        self.settings.set_thumbnail_fit(fit);
        crate::debug_log!("[thumbs] fit={}", fit);
        cx.notify();
    }

    fn set_startup_dialog(&mut self, enabled: bool, cx: &mut Context<Self>) {
        self.settings.set_open_dialog_on_startup(enabled);
        self.refresh_menus(cx);
    }

    fn refresh_menus(&self, cx: &mut Context<Self>) {
        configure_app_menus(cx, self.i18n(), self.settings.open_dialog_on_startup());
    }

    fn select_thumbnail(&mut self, page_index: usize, cx: &mut Context<Self>) {
        let Some(command) = self.session.click_thumbnail(page_index) else {
            return;
        };
        if let Some(document) = self.session.document() {
            self.document_view.navigate(command, document, cx);
        }
        cx.notify();
    }

    fn handle_key_down(&mut self, event: &gpui::KeyDownEvent, cx: &mut Context<Self>) {
        if !event.keystroke.modifiers.secondary() {
            return;
        }

        match event.keystroke.key.as_str() {
            "o" => {
                self.open_pdf_dialog(cx);
                cx.stop_propagation();
            }
            "t" => {
                self.toggle_thumbnails(cx);
                cx.stop_propagation();
            }
            _ => {}
        }
    }

    /// File name of what is on screen, even when only the web view could
    /// open it.
    fn shown_file_name(&self) -> Option<String> {
        self.session.file_name().or_else(|| {
            self.document_view
                .path()
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().into_owned())
        })
    }

    fn window_title(&self) -> String {
        let app_title = self.i18n().app_title;
        match self.shown_file_name() {
            Some(file_name) => format!("{file_name} - {app_title}"),
            None => app_title.to_string(),
        }
    }

    fn render_empty_state(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let i18n = self.i18n();
        let hint = match self.load_failure.as_ref() {
            Some(path) => i18n.load_failed_hint(path),
            None => i18n.no_document_hint.to_string(),
        };

        div()
            .size_full()
            .v_flex()
            .items_center()
            .justify_center()
            .gap_3()
            .child(
                Icon::new(crate::icons::IconName::File)
                    .size_8()
                    .text_color(cx.theme().muted_foreground),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(cx.theme().muted_foreground)
                    .child(hint),
            )
            .child(
                Button::new("empty-open-pdf")
                    .small()
                    .label(i18n.open_button)
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.open_pdf_dialog(cx);
                    })),
            )
    }
}

include!("file_actions.rs");

impl Focusable for PdfViewer {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for PdfViewer {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if self.needs_initial_focus {
            self.needs_initial_focus = false;
            cx.focus_self(window);
        }
        if self.needs_startup_dialog {
            self.needs_startup_dialog = false;
            if self.session.path().is_none() {
                self.open_pdf_dialog(cx);
            }
        }
        if let Some(path) = self.pending_open.take() {
            self.open_pdf_path(path, window, cx);
        }

        window.set_window_title(&self.window_title());

        let bounds = window.bounds();
        let current_size = (f32::from(bounds.size.width), f32::from(bounds.size.height));
        if self.last_window_size != Some(current_size) {
            self.last_window_size = Some(current_size);
            if !window.is_maximized() && !window.is_fullscreen() {
                self.settings.save_window_size(current_size.0, current_size.1);
            }
        }

        let show_thumbnails = self.session.is_thumbnail_mode();
        let content = if show_thumbnails {
            self.render_thumbnail_panel(cx).into_any_element()
        } else if self.document_view.is_empty() {
            self.render_empty_state(cx).into_any_element()
        } else {
            self.document_view.render(self.i18n(), cx)
        };

        div()
            .size_full()
            .on_action(cx.listener(|this, _: &OpenFile, _, cx| {
                this.open_pdf_dialog(cx);
            }))
            .on_action(cx.listener(|this, _: &ToggleThumbnails, _, cx| {
                this.toggle_thumbnails(cx);
            }))
            .on_action(cx.listener(|this, _: &LargerThumbnails, _, cx| {
                this.resize_thumbnails(THUMBNAIL_SIZE_STEP, cx);
            }))
            .on_action(cx.listener(|this, _: &SmallerThumbnails, _, cx| {
                this.resize_thumbnails(-THUMBNAIL_SIZE_STEP, cx);
            }))
            .on_action(cx.listener(|this, _: &EnableStartupDialogMenu, _, cx| {
                this.set_startup_dialog(true, cx);
            }))
            .on_action(cx.listener(|this, _: &DisableStartupDialogMenu, _, cx| {
                this.set_startup_dialog(false, cx);
            }))
            .on_action(cx.listener(|this, _: &EnableLoggingMenu, _, cx| {
                if crate::logger::enable_file_logging() {
                    this.refresh_menus(cx);
                }
            }))
            .on_action(cx.listener(|this, _: &DisableLoggingMenu, _, cx| {
                crate::logger::disable_file_logging();
                this.refresh_menus(cx);
            }))
            .on_action(cx.listener(|this, _: &OpenLogsMenu, _, _| {
                this.open_logs_directory();
            }))
            .child(
                div()
                    .v_flex()
                    .size_full()
                    .bg(cx.theme().background)
                    .track_focus(&self.focus_handle)
                    .capture_key_down(cx.listener(
                        |this, event: &gpui::KeyDownEvent, _window, cx| {
                            this.handle_key_down(event, cx);
                        },
                    ))
                    .child(self.render_menu_bar(cx))
                    .child(
                        div()
                            .id("content")
                            .flex_1()
                            .min_h(px(0.))
                            .w_full()
                            .when(show_thumbnails, |this| this.bg(cx.theme().sidebar))
                            .child(content),
                    ),
            )
    }
}
