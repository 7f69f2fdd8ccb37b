use super::file_uri;
use crate::navigation::{NavigationCommand, ScriptTarget, dispatch};
use anyhow::{Result, anyhow};
use gpui::*;
use gpui_component::webview::WebView;
use std::path::Path;
use wry::WebViewBuilder;

/// Builds a child web view pointed at the PDF at `path`.
pub(super) fn build(path: &Path, window: &mut Window, cx: &mut App) -> Result<Entity<WebView>> {
    let url = file_uri(path);
    let webview = WebViewBuilder::new()
        .with_url(&url)
        .build_as_child(window)
        .map_err(|err| anyhow!("failed to create web view for {url}: {err:?}"))?;

    crate::debug_log!("[webview] loading {}", url);
    Ok(cx.new(|cx| WebView::new(webview, window, cx)))
}

impl ScriptTarget for WebView {
    fn evaluate_script(&self, script: &str) -> Result<()> {
        let inner: &wry::WebView = self;
        inner
            .evaluate_script(script)
            .map_err(|err| anyhow!("evaluate_script failed: {err}"))
    }
}

pub(super) fn navigate(view: &Entity<WebView>, command: NavigationCommand, cx: &App) {
    dispatch(view.read(cx), command);
}

pub(super) fn set_visible(view: &Entity<WebView>, visible: bool, cx: &mut App) {
    view.update(cx, |webview, _| {
        if visible {
            webview.show();
        } else {
            webview.hide();
        }
    });
}
