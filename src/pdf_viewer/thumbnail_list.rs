use super::PdfViewer;
use crate::icons::IconName;
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::scroll::{Scrollbar, ScrollbarShow};
use gpui_component::*;
use std::rc::Rc;

const THUMB_ROW_VERTICAL_PADDING: f32 = 16.0;
const THUMB_LABEL_HEIGHT: f32 = 20.0;

impl PdfViewer {
    fn thumbnail_row_sizes(&self) -> Rc<Vec<gpui::Size<Pixels>>> {
        Rc::new(
            self.session
                .thumbnails()
                .iter()
                .map(|thumb| {
                    size(
                        px(0.),
                        px(thumb.height as f32 + THUMB_LABEL_HEIGHT + THUMB_ROW_VERTICAL_PADDING),
                    )
                })
                .collect(),
        )
    }

    pub(super) fn render_thumbnail_panel(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let i18n = self.i18n();
        let row_sizes = self.thumbnail_row_sizes();
        let is_empty = row_sizes.is_empty();

        div()
            .id("thumbnail-panel")
            .size_full()
            .bg(cx.theme().sidebar)
            .overflow_hidden()
            .when(is_empty, |this| {
                this.child(
                    div()
                        .size_full()
                        .flex()
                        .items_center()
                        .justify_center()
                        .text_xs()
                        .text_color(cx.theme().muted_foreground)
                        .child(i18n.no_pages),
                )
            })
            .when(!is_empty, |this| {
                this.child(
                    div()
                        .relative()
                        .size_full()
                        .child(
                            v_virtual_list(
                                cx.entity(),
                                "thumb-virtual-list",
                                row_sizes,
                                move |viewer, visible_range, _window, cx| {
                                    let current_page = viewer.session.current_page();
                                    visible_range
                                        .map(|ix| {
                                            let Some(thumb) = viewer.session.thumbnails().get(ix)
                                            else {
                                                return div().into_any_element();
                                            };
                                            let page_index = thumb.page_index;
                                            let is_selected = page_index == current_page;

                                            div()
                                                .id(("thumb-row", ix))
                                                .w_full()
                                                .py_2()
                                                .flex()
                                                .justify_center()
                                                .child(
                                                    div()
                                                        .v_flex()
                                                        .items_center()
                                                        .gap_1()
                                                        .p_1()
                                                        .rounded_md()
                                                        .cursor_pointer()
                                                        .when(is_selected, |this| {
                                                            this.bg(cx.theme().secondary.opacity(0.55))
                                                        })
                                                        .hover(|this| {
                                                            this.bg(cx.theme().secondary.opacity(0.35))
                                                        })
                                                        .child(
                                                            div()
                                                                .w(px(thumb.width as f32))
                                                                .h(px(thumb.height as f32))
                                                                .overflow_hidden()
                                                                .border_1()
                                                                .border_color(if is_selected {
                                                                    cx.theme().foreground
                                                                } else {
                                                                    cx.theme().sidebar_border
                                                                })
                                                                .bg(cx.theme().background)
                                                                .when_some(
                                                                    thumb.image.clone(),
                                                                    |this, image| {
                                                                        this.child(
                                                                            img(image)
                                                                                .size_full()
                                                                                .object_fit(
                                                                                    ObjectFit::Contain,
                                                                                ),
                                                                        )
                                                                    },
                                                                )
                                                                .when(thumb.image.is_none(), |this| {
                                                                    this.child(
                                                                        div()
                                                                            .size_full()
                                                                            .v_flex()
                                                                            .items_center()
                                                                            .justify_center()
                                                                            .gap_2()
                                                                            .text_color(
                                                                                cx.theme().muted_foreground,
                                                                            )
                                                                            .child(
                                                                                Icon::new(IconName::File)
                                                                                    .size_5(),
                                                                            )
                                                                            .child(
                                                                                div().text_xs().child(
                                                                                    i18n.thumbnail_render_failed,
                                                                                ),
                                                                            ),
                                                                    )
                                                                }),
                                                        )
                                                        .child(
                                                            div()
                                                                .h(px(THUMB_LABEL_HEIGHT))
                                                                .text_xs()
                                                                .font_medium()
                                                                .text_color(cx.theme().muted_foreground)
                                                                .child(format!("{}", page_index + 1)),
                                                        ),
                                                )
                                                .on_click(cx.listener(move |this, _, _, cx| {
                                                    this.select_thumbnail(page_index, cx);
                                                }))
                                                .into_any_element()
                                        })
                                        .collect::<Vec<_>>()
                                },
                            )
                            .track_scroll(&self.thumbnail_scroll)
                            .into_any_element(),
                        )
                        .child(
                            div()
                                .absolute()
                                .top_0()
                                .left_0()
                                .right_0()
                                .bottom_0()
                                .child(
                                    Scrollbar::vertical(&self.thumbnail_scroll)
                                        .scrollbar_show(ScrollbarShow::Always),
                                ),
                        )
                        .into_any_element(),
                )
            })
    }
}
