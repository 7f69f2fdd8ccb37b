use crate::navigation::NavigationCommand;
use crate::pdf::{DocumentLoader, PageSource};
use crate::thumbnails::{Thumbnail, ThumbnailFit, ThumbnailGenerator};
use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    SinglePage,
    Thumbnails,
}

/// An opened document together with the path it came from.
pub struct LoadedDocument<D> {
    pub path: PathBuf,
    pub handle: D,
}

/// Viewer state that does not depend on any window: the live document, the
/// view mode, the thumbnail entries and the last page navigated to.
pub struct ViewerSession<L: DocumentLoader> {
    loader: L,
    generator: ThumbnailGenerator,
    document: Option<LoadedDocument<L::Document>>,
    mode: ViewMode,
    thumbnails: Vec<Thumbnail>,
    current_page: usize,
}

impl<L: DocumentLoader> ViewerSession<L> {
    pub fn new(loader: L, fit: ThumbnailFit) -> Self {
        Self {
            loader,
            generator: ThumbnailGenerator::new(fit),
            document: None,
            mode: ViewMode::SinglePage,
            thumbnails: Vec::new(),
            current_page: 0,
        }
    }

    /// Replaces the live document with the one at `path` and returns its page
    /// count. On failure the session is left empty.
    pub fn open(&mut self, path: &Path) -> Result<usize> {
        self.document = None;
        self.thumbnails.clear();
        self.current_page = 0;

        let handle = match self.loader.load(path) {
            Ok(handle) => handle,
            Err(err) => {
                crate::debug_log!("[pdf] open failed {}: {:#}", path.display(), err);
                return Err(err);
            }
        };

        let page_count = handle.page_count();
        self.document = Some(LoadedDocument {
            path: path.to_path_buf(),
            handle,
        });
        crate::debug_log!("[pdf] opened {} ({} pages)", path.display(), page_count);

        if self.mode == ViewMode::Thumbnails {
            self.regenerate_thumbnails();
        }
        Ok(page_count)
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_thumbnail_mode(&self) -> bool {
        self.mode == ViewMode::Thumbnails
    }

    /// Switches the view mode. Entering thumbnail mode rebuilds every entry.
    /// Returns `false` when `mode` was already active.
    pub fn set_mode(&mut self, mode: ViewMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        match mode {
            ViewMode::Thumbnails => self.regenerate_thumbnails(),
            ViewMode::SinglePage => self.thumbnails.clear(),
        }
        true
    }

    pub fn set_thumbnail_mode(&mut self, enabled: bool) -> bool {
        self.set_mode(if enabled {
            ViewMode::Thumbnails
        } else {
            ViewMode::SinglePage
        })
    }

    pub fn toggle_thumbnails(&mut self) -> ViewMode {
        let enabled = !self.is_thumbnail_mode();
        self.set_thumbnail_mode(enabled);
        self.mode
    }

    pub fn thumbnail_fit(&self) -> ThumbnailFit {
        self.generator.fit()
    }

    pub fn set_thumbnail_fit(&mut self, fit: ThumbnailFit) {
        if self.generator.fit() == fit {
            return;
        }
        self.generator = ThumbnailGenerator::new(fit);
        if self.is_thumbnail_mode() {
            self.regenerate_thumbnails();
        }
    }

    pub fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }

    /// Handles a click on the thumbnail tagged `page_index`. Yields a command
    /// only for a page of the live document. The view mode is left alone.
    pub fn click_thumbnail(&mut self, page_index: usize) -> Option<NavigationCommand> {
        let page_count = self.page_count();
        if page_index >= page_count {
            crate::debug_log!(
                "[nav] ignored click on page {} (count={})",
                page_index,
                page_count
            );
            return None;
        }
        self.current_page = page_index;
        Some(NavigationCommand::new(page_index))
    }

    pub fn page_count(&self) -> usize {
        self.document
            .as_ref()
            .map(|document| document.handle.page_count())
            .unwrap_or(0)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn document(&self) -> Option<&L::Document> {
        self.document.as_ref().map(|document| &document.handle)
    }

    pub fn path(&self) -> Option<&Path> {
        self.document.as_ref().map(|document| document.path.as_path())
    }

    pub fn file_name(&self) -> Option<String> {
        self.path()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().to_string())
    }

    fn regenerate_thumbnails(&mut self) {
        self.thumbnails = match self.document.as_ref() {
            Some(document) => self.generator.generate(&document.handle),
            None => Vec::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thumbnails::tests::FakeDocument;
    use anyhow::anyhow;
    use std::collections::HashMap;

    struct FakeLoader {
        page_counts: HashMap<PathBuf, usize>,
    }

    impl FakeLoader {
        fn with(files: &[(&str, usize)]) -> Self {
            Self {
                page_counts: files
                    .iter()
                    .map(|(path, count)| (PathBuf::from(path), *count))
                    .collect(),
            }
        }
    }

    impl DocumentLoader for FakeLoader {
        type Document = FakeDocument;

        fn load(&self, path: &Path) -> Result<FakeDocument> {
            let count = self
                .page_counts
                .get(path)
                .ok_or_else(|| anyhow!("no such file: {}", path.display()))?;
            Ok(FakeDocument::uniform(*count, 612.0, 792.0))
        }
    }

    fn session(files: &[(&str, usize)]) -> ViewerSession<FakeLoader> {
        ViewerSession::new(FakeLoader::with(files), ThumbnailFit::default())
    }

    fn indices(session: &ViewerSession<FakeLoader>) -> Vec<usize> {
        session.thumbnails().iter().map(|t| t.page_index).collect()
    }

    #[test]
    fn starts_in_single_page_mode_without_document() {
        let session = session(&[]);
        assert_eq!(session.mode(), ViewMode::SinglePage);
        assert_eq!(session.page_count(), 0);
        assert!(session.path().is_none());
        assert!(session.thumbnails().is_empty());
    }

    #[test]
    fn thumbnail_mode_yields_one_entry_per_page() {
        let mut session = session(&[("/docs/a.pdf", 5)]);
        assert_eq!(session.open(Path::new("/docs/a.pdf")).unwrap(), 5);
        assert!(session.thumbnails().is_empty());

        assert!(session.set_thumbnail_mode(true));
        assert_eq!(indices(&session), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn toggling_off_and_on_regenerates_every_entry() {
        let mut session = session(&[("/docs/a.pdf", 3)]);
        session.open(Path::new("/docs/a.pdf")).unwrap();

        session.set_thumbnail_mode(true);
        assert_eq!(session.document().unwrap().renders.get(), 3);

        assert_eq!(session.toggle_thumbnails(), ViewMode::SinglePage);
        assert!(session.thumbnails().is_empty());
        assert_eq!(session.toggle_thumbnails(), ViewMode::Thumbnails);

        assert_eq!(indices(&session), vec![0, 1, 2]);
        assert_eq!(session.document().unwrap().renders.get(), 6);
    }

    #[test]
    fn setting_the_current_mode_is_a_no_op() {
        let mut session = session(&[("/docs/a.pdf", 2)]);
        session.open(Path::new("/docs/a.pdf")).unwrap();
        session.set_thumbnail_mode(true);

        assert!(!session.set_thumbnail_mode(true));
        assert_eq!(session.document().unwrap().renders.get(), 2);
    }

    #[test]
    fn click_issues_one_command_for_that_page() {
        let mut session = session(&[("/docs/a.pdf", 4)]);
        session.open(Path::new("/docs/a.pdf")).unwrap();
        session.set_thumbnail_mode(true);

        let command = session.click_thumbnail(2);
        assert_eq!(command, Some(NavigationCommand { page_index: 2 }));
        assert_eq!(session.current_page(), 2);
        assert_eq!(session.mode(), ViewMode::Thumbnails);
    }

    #[test]
    fn click_outside_the_document_issues_nothing() {
        let mut session = session(&[("/docs/a.pdf", 2)]);
        assert_eq!(session.click_thumbnail(0), None);

        session.open(Path::new("/docs/a.pdf")).unwrap();
        assert_eq!(session.click_thumbnail(2), None);
        assert_eq!(session.current_page(), 0);
    }

    #[test]
    fn opening_a_second_file_replaces_the_first() {
        let mut session = session(&[("/docs/a.pdf", 6), ("/docs/b.pdf", 2)]);
        session.open(Path::new("/docs/a.pdf")).unwrap();
        session.set_thumbnail_mode(true);
        session.click_thumbnail(5);
        assert_eq!(session.thumbnails().len(), 6);

        session.open(Path::new("/docs/b.pdf")).unwrap();
        assert_eq!(session.page_count(), 2);
        assert_eq!(indices(&session), vec![0, 1]);
        assert_eq!(session.current_page(), 0);
        assert_eq!(session.file_name().as_deref(), Some("b.pdf"));
        assert_eq!(session.click_thumbnail(5), None);
    }

    #[test]
    fn opening_a_missing_file_leaves_an_empty_session() {
        let mut session = session(&[("/docs/a.pdf", 3)]);
        session.open(Path::new("/docs/a.pdf")).unwrap();
        session.set_thumbnail_mode(true);

        assert!(session.open(Path::new("/docs/missing.pdf")).is_err());
        assert_eq!(session.page_count(), 0);
        assert!(session.path().is_none());
        assert!(session.thumbnails().is_empty());
        assert_eq!(session.mode(), ViewMode::Thumbnails);
    }

    #[test]
    fn thumbnail_mode_without_document_is_empty() {
        let mut session = session(&[]);
        assert_eq!(session.toggle_thumbnails(), ViewMode::Thumbnails);
        assert!(session.thumbnails().is_empty());
    }

    #[test]
    fn changing_the_fit_rebuilds_visible_thumbnails() {
        let mut session = session(&[("/docs/a.pdf", 2)]);
        session.open(Path::new("/docs/a.pdf")).unwrap();
        session.set_thumbnail_mode(true);

        session.set_thumbnail_fit(ThumbnailFit::Height(100));
        assert!(session.thumbnails().iter().all(|t| t.height == 100));
        assert_eq!(session.thumbnails().len(), 2);
    }
}
