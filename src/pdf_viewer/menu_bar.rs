use crate::icons;

use super::{PdfViewer, TOOLBAR_HEIGHT};
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::checkbox::Checkbox;
use gpui_component::{button::*, *};

impl PdfViewer {
    pub(super) fn render_menu_bar(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let i18n = self.i18n();
        let page_count = self.session.page_count();
        let current_page_num = if page_count == 0 {
            0
        } else {
            self.session.current_page() + 1
        };
        let file_name = self
            .shown_file_name()
            .unwrap_or_else(|| i18n.file_not_opened.to_string());

        div()
            .id("menu-bar")
            .h(px(TOOLBAR_HEIGHT))
            .w_full()
            .flex_none()
            .px_2()
            .flex()
            .items_center()
            .justify_between()
            .gap_2()
            .border_b_1()
            .border_color(cx.theme().title_bar_border)
            .bg(cx.theme().title_bar)
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .child(
                        Button::new("open-pdf")
                            .ghost()
                            .small()
                            .icon(
                                Icon::new(icons::IconName::FolderOpen)
                                    .text_color(cx.theme().foreground),
                            )
                            .label(i18n.open_button)
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.open_pdf_dialog(cx);
                            })),
                    )
                    .child(
                        Checkbox::new("thumbnails-toggle")
                            .label(i18n.thumbnails_toggle)
                            .checked(self.session.is_thumbnail_mode())
                            .on_click(cx.listener(|this, checked: &bool, _, cx| {
                                this.set_thumbnail_mode(*checked, cx);
                            })),
                    ),
            )
            .child(
                div()
                    .flex_1()
                    .min_w(px(0.))
                    .flex()
                    .justify_center()
                    .overflow_hidden()
                    .text_sm()
                    .text_color(cx.theme().foreground)
                    .child(file_name),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .when(page_count > 0, |this| {
                        this.child(
                            Icon::new(icons::IconName::PanelLeftDashed)
                                .size_4()
                                .text_color(cx.theme().muted_foreground),
                        )
                        .child(
                            div()
                                .text_sm()
                                .text_color(cx.theme().muted_foreground)
                                .child(i18n.page_indicator(current_page_num, page_count)),
                        )
                    }),
            )
    }
}
