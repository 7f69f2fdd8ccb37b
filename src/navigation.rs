use anyhow::Result;

/// Request to bring a page of the embedded document into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationCommand {
    /// Zero-based page index.
    pub page_index: usize,
}

impl NavigationCommand {
    pub fn new(page_index: usize) -> Self {
        Self { page_index }
    }

    /// Page number as the web renderer counts it, starting at 1.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    /// Script that asks the renderer's PDF viewer to jump to the page via its
    /// `#page=N` fragment. An unchanged fragment is cleared first so a repeat
    /// click still fires `hashchange`.
    ///
    /// WebView2's built-in PDF viewer follows fragment changes on the loaded
    /// document. WKWebView's PDF view may ignore them and stay on its page.
    pub fn script(&self) -> String {
        let fragment = format!("page={}", self.page_number());
        format!(
            "if (window.location.hash === \"#{fragment}\") {{ window.location.hash = \"\"; }} window.location.hash = \"{fragment}\";"
        )
    }
}

/// Something that can run script inside a loaded document.
pub trait ScriptTarget {
    fn evaluate_script(&self, script: &str) -> Result<()>;
}

/// Sends `command` to `target` without waiting for the renderer to act on
/// it. Failures are logged and otherwise ignored.
pub fn dispatch<T: ScriptTarget + ?Sized>(target: &T, command: NavigationCommand) {
    let script = command.script();
    match target.evaluate_script(&script) {
        Ok(()) => crate::debug_log!("[nav] -> page {}", command.page_number()),
        Err(err) => crate::debug_log!(
            "[nav] page {} script failed: {:#}",
            command.page_number(),
            err
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingTarget {
        scripts: RefCell<Vec<String>>,
        fail: bool,
    }

    impl ScriptTarget for RecordingTarget {
        fn evaluate_script(&self, script: &str) -> Result<()> {
            self.scripts.borrow_mut().push(script.to_string());
            if self.fail {
                return Err(anyhow!("renderer gone"));
            }
            Ok(())
        }
    }

    #[test]
    fn script_uses_one_based_page_fragment() {
        assert!(
            NavigationCommand::new(0)
                .script()
                .ends_with("window.location.hash = \"page=1\";")
        );
        assert!(
            NavigationCommand::new(41)
                .script()
                .ends_with("window.location.hash = \"page=42\";")
        );
    }

    #[test]
    fn script_resets_an_unchanged_fragment() {
        let script = NavigationCommand::new(6).script();
        assert!(script.starts_with(
            "if (window.location.hash === \"#page=7\") { window.location.hash = \"\"; }"
        ));
    }

    #[test]
    fn dispatch_sends_exactly_one_script() {
        let target = RecordingTarget::default();
        dispatch(&target, NavigationCommand::new(4));
        assert_eq!(
            target.scripts.borrow().as_slice(),
            [NavigationCommand::new(4).script()]
        );
    }

    #[test]
    fn dispatch_swallows_renderer_errors() {
        let target = RecordingTarget {
            fail: true,
            ..Default::default()
        };
        dispatch(&target, NavigationCommand::new(2));
        dispatch(&target, NavigationCommand::new(3));
        assert_eq!(target.scripts.borrow().len(), 2);
    }
}
