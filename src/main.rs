#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

mod document_view;
pub mod i18n;
pub mod icons;
pub mod logger;
mod navigation;
mod pdf;
mod pdf_viewer;
mod session;
mod settings;
mod thumbnails;

use gpui::*;
use gpui_component::*;
use pdf_viewer::PdfViewer;
use settings::Settings;

const DEFAULT_WINDOW_WIDTH: f32 = 1100.0;
const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;

gpui::actions!(
    pdfview,
    [
        OpenFile,
        ToggleThumbnails,
        LargerThumbnails,
        SmallerThumbnails,
        EnableStartupDialogMenu,
        DisableStartupDialogMenu,
        EnableLoggingMenu,
        DisableLoggingMenu,
        OpenLogsMenu,
        Quit
    ]
);

pub(crate) fn configure_app_menus(cx: &mut App, i18n: i18n::I18n, open_dialog_on_startup: bool) {
    let mut items = vec![if open_dialog_on_startup {
        MenuItem::action(i18n.disable_startup_dialog_button, DisableStartupDialogMenu)
    } else {
        MenuItem::action(i18n.enable_startup_dialog_button, EnableStartupDialogMenu)
    }];
    items.push(MenuItem::separator());

    if logger::file_logging_enabled() {
        items.extend([
            MenuItem::action(i18n.open_logs_button, OpenLogsMenu),
            MenuItem::separator(),
            MenuItem::action(i18n.disable_logging_button, DisableLoggingMenu),
        ]);
    } else {
        items.push(MenuItem::action(
            i18n.enable_logging_button,
            EnableLoggingMenu,
        ));
    }
    items.extend([MenuItem::separator(), MenuItem::action(i18n.menu_quit, Quit)]);

    cx.set_menus(vec![
        Menu {
            name: "pdfview".into(),
            items,
        },
        Menu {
            name: i18n.menu_file.into(),
            items: vec![MenuItem::action(i18n.menu_open, OpenFile)],
        },
        Menu {
            name: i18n.menu_view.into(),
            items: vec![
                MenuItem::action(i18n.menu_toggle_thumbnails, ToggleThumbnails),
                MenuItem::separator(),
                MenuItem::action(i18n.menu_larger_thumbnails, LargerThumbnails),
                MenuItem::action(i18n.menu_smaller_thumbnails, SmallerThumbnails),
            ],
        },
    ]);
}

fn main() {
    logger::initialize();

    let app = Application::new().with_assets(icons::Assets);
    let language = i18n::Language::detect();
    let i18n = i18n::I18n::new(language);

    app.run(move |cx| {
        let settings = Settings::open();
        configure_app_menus(cx, i18n, settings.open_dialog_on_startup());
        cx.on_action(|_: &Quit, cx| cx.quit());

        gpui_component::init(cx);
        Theme::change(cx.window_appearance(), None, cx);
        #[cfg(target_os = "macos")]
        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();

        cx.spawn(async move |cx| {
            let (width, height) = settings
                .window_size()
                .unwrap_or((DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));
            let window_bounds =
                cx.update(|app| WindowBounds::centered(size(px(width), px(height)), app))?;

            let window_options = WindowOptions {
                titlebar: Some(TitlebarOptions {
                    title: Some(i18n.app_title.into()),
                    ..Default::default()
                }),
                window_bounds: Some(window_bounds),
                ..WindowOptions::default()
            };

            cx.open_window(window_options, |window, cx| {
                let view = cx.new(|cx| PdfViewer::new(settings, window, cx));
                cx.new(|cx| Root::new(view, window, cx))
            })?;
            Ok::<_, anyhow::Error>(())
        })
        .detach();

        cx.activate(true);
    });
}
