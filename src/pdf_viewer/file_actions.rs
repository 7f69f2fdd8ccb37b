impl PdfViewer {
    fn open_pdf_dialog(&mut self, cx: &mut Context<Self>) {
        if self.dialog_open {
            return;
        }
        self.dialog_open = true;

        let i18n = self.i18n();
        let dialog = rfd::AsyncFileDialog::new()
            .set_title(i18n.open_pdf_prompt)
            .add_filter(i18n.pdf_filter_name, &["pdf"]);

        cx.spawn(async move |view, cx| {
            let picked = dialog.pick_file().await;
            let _ = view.update(cx, |this, cx| {
                this.dialog_open = false;
                match picked {
                    Some(file) => {
                        crate::debug_log!("[file] picked {}", file.path().display());
                        this.pending_open = Some(file.path().to_path_buf());
                        cx.notify();
                    }
                    None => crate::debug_log!("[file] open dialog cancelled"),
                }
            });
        })
        .detach();
    }

    /// Opens `path` in the session and, independently, points the document
    /// surface at it. The hint naming the file appears only when nothing can
    /// show it.
    fn open_pdf_path(&mut self, path: PathBuf, window: &mut Window, cx: &mut Context<Self>) {
        let path = path.canonicalize().unwrap_or(path);

        let page_count = self.session.open(&path).ok();
        let shown = self
            .document_view
            .load(&path, self.session.document(), window, cx);
        self.document_view
            .set_visible(!self.session.is_thumbnail_mode(), cx);
        self.thumbnail_scroll.scroll_to_item(0, ScrollStrategy::Top);

        if shown {
            self.load_failure = None;
            crate::debug_log!(
                "[file] showing {} (pages={:?})",
                path.display(),
                page_count
            );
        } else {
            self.load_failure = Some(path);
        }
        cx.notify();
    }

    fn open_logs_directory(&self) {
        let Some(log_file_path) = crate::logger::log_file_path() else {
            crate::debug_log!("[log] cannot open logs directory: unresolved log path");
            return;
        };

        let log_dir = log_file_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or(log_file_path);

        let status = {
            #[cfg(target_os = "macos")]
            {
                std::process::Command::new("open").arg(&log_dir).status()
            }
            #[cfg(target_os = "windows")]
            {
                std::process::Command::new("explorer").arg(&log_dir).status()
            }
            #[cfg(all(unix, not(target_os = "macos")))]
            {
                std::process::Command::new("xdg-open").arg(&log_dir).status()
            }
        };

        match status {
            Ok(exit_status) if exit_status.success() => {
                crate::debug_log!("[log] opened logs directory: {}", log_dir.display());
            }
            Ok(exit_status) => {
                crate::debug_log!(
                    "[log] failed to open logs directory: {} | exit={}",
                    log_dir.display(),
                    exit_status
                );
            }
            Err(err) => {
                crate::debug_log!(
                    "[log] failed to open logs directory: {} | {}",
                    log_dir.display(),
                    err
                );
            }
        }
    }
}
