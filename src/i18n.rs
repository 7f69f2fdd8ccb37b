use serde::Deserialize;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Language {
    ZhCn,
    EnUs,
}

impl Language {
    pub fn detect() -> Self {
        if let Some(locale_tag) = sys_locale::get_locale() {
            return Self::from_locale_tag(&locale_tag);
        }

        Self::EnUs
    }

    fn from_locale_tag(raw: &str) -> Self {
        let tag = raw.trim().to_ascii_lowercase();
        if tag.is_empty() {
            return Self::EnUs;
        }

        let is_chinese = tag.starts_with("zh")
            || tag == "cn"
            || tag.starts_with("cn_")
            || tag.starts_with("cn-")
            || tag.contains("_zh")
            || tag.contains("-zh");
        if is_chinese {
            return Self::ZhCn;
        }

        Self::EnUs
    }

    fn file_name(self) -> &'static str {
        match self {
            Self::ZhCn => "zh_CN.json",
            Self::EnUs => "en_US.json",
        }
    }
}

macro_rules! locale_message_fields {
    ($macro:ident) => {
        $macro! {
            app_title,
            file_not_opened,
            open_button,
            thumbnails_toggle,
            page_indicator,
            no_pages,
            no_document_hint,
            load_failed_hint,
            webview_unavailable_hint,
            page_render_failed,
            thumbnail_render_failed,
            open_pdf_prompt,
            pdf_filter_name,
            menu_open,
            menu_toggle_thumbnails,
            menu_quit,
            menu_file,
            menu_view,
            menu_larger_thumbnails,
            menu_smaller_thumbnails,
            enable_startup_dialog_button,
            disable_startup_dialog_button,
            open_logs_button,
            enable_logging_button,
            disable_logging_button,
            pdfium_not_found,
            cannot_open_file,
            pdfium_cannot_open_file,
            page_out_of_range,
            invalid_bitmap_size,
            cannot_create_image_buffer,
        }
    };
}

macro_rules! define_raw_locale_messages {
    ($($field:ident),+ $(,)?) => {
        #[derive(Debug, Deserialize)]
        #[serde(deny_unknown_fields)]
        struct RawLocaleMessages {
            $(
                $field: String,
            )+
        }
    };
}

macro_rules! define_locale_messages {
    ($($field:ident),+ $(,)?) => {
        #[derive(Debug)]
        pub struct LocaleMessages {
            $(
                pub $field: &'static str,
            )+
        }
    };
}

macro_rules! impl_from_raw_locale_messages {
    ($($field:ident),+ $(,)?) => {
        impl From<RawLocaleMessages> for LocaleMessages {
            fn from(raw: RawLocaleMessages) -> Self {
                Self {
                    $(
                        $field: leak_str(raw.$field),
                    )+
                }
            }
        }
    };
}

locale_message_fields!(define_raw_locale_messages);
locale_message_fields!(define_locale_messages);
locale_message_fields!(impl_from_raw_locale_messages);

fn leak_str(value: String) -> &'static str {
    Box::leak(value.into_boxed_str())
}

static ZH_CN_MESSAGES: OnceLock<LocaleMessages> = OnceLock::new();
static EN_US_MESSAGES: OnceLock<LocaleMessages> = OnceLock::new();

#[derive(Clone, Copy, Debug)]
pub struct I18n {
    messages: &'static LocaleMessages,
}

impl I18n {
    pub fn new(lang: Language) -> Self {
        Self {
            messages: messages_for(lang),
        }
    }

    pub fn page_indicator(self, current: usize, total: usize) -> String {
        format_template(
            self.messages.page_indicator,
            &[("current", current.to_string()), ("total", total.to_string())],
        )
    }

    pub fn load_failed_hint(self, path: &Path) -> String {
        format_template(
            self.messages.load_failed_hint,
            &[("path", path.to_string_lossy().to_string())],
        )
    }

    pub fn cannot_open_file(self, path: &Path) -> String {
        format_template(
            self.messages.cannot_open_file,
            &[("path", path.to_string_lossy().to_string())],
        )
    }

    pub fn pdfium_cannot_open_file(self, path: &Path) -> String {
        format_template(
            self.messages.pdfium_cannot_open_file,
            &[("path", path.to_string_lossy().to_string())],
        )
    }

    pub fn page_out_of_range(self, index: usize, count: usize) -> String {
        format_template(
            self.messages.page_out_of_range,
            &[("index", index.to_string()), ("count", count.to_string())],
        )
    }

    pub fn invalid_bitmap_size(self, width: u32, height: u32) -> String {
        format_template(
            self.messages.invalid_bitmap_size,
            &[("width", width.to_string()), ("height", height.to_string())],
        )
    }

    pub fn cannot_create_image_buffer(self, width: u32, height: u32) -> String {
        format_template(
            self.messages.cannot_create_image_buffer,
            &[("width", width.to_string()), ("height", height.to_string())],
        )
    }
}

impl Deref for I18n {
    type Target = LocaleMessages;

    fn deref(&self) -> &Self::Target {
        self.messages
    }
}

fn messages_for(lang: Language) -> &'static LocaleMessages {
    match lang {
        Language::ZhCn => ZH_CN_MESSAGES.get_or_init(|| load_messages(Language::ZhCn)),
        Language::EnUs => EN_US_MESSAGES.get_or_init(|| load_messages(Language::EnUs)),
    }
}

const BUNDLED_EN_US: &str = include_str!("../assets/i18n/en_US.json");

fn load_messages(lang: Language) -> LocaleMessages {
    let primary_err = match try_load_messages(lang) {
        Ok(messages) => return messages,
        Err(err) => err,
    };
    crate::debug_log!(
        "[i18n] failed to load {}: {}",
        lang.file_name(),
        primary_err
    );

    if lang != Language::EnUs {
        match try_load_messages(Language::EnUs) {
            Ok(messages) => {
                crate::debug_log!(
                    "[i18n] fallback to {} after {} failed",
                    Language::EnUs.file_name(),
                    lang.file_name()
                );
                return messages;
            }
            Err(fallback_err) => crate::debug_log!(
                "[i18n] failed to load {}: {}",
                Language::EnUs.file_name(),
                fallback_err
            ),
        }
    }

    crate::debug_log!("[i18n] using bundled {}", Language::EnUs.file_name());
    match serde_json::from_str::<RawLocaleMessages>(BUNDLED_EN_US) {
        Ok(raw) => LocaleMessages::from(raw),
        Err(err) => panic!("bundled {} is invalid: {}", Language::EnUs.file_name(), err),
    }
}

fn try_load_messages(lang: Language) -> Result<LocaleMessages, String> {
    let (path, raw) = load_locale_file(lang.file_name())?;
    crate::debug_log!(
        "[i18n] loading locale {} from {}",
        lang.file_name(),
        path.display()
    );

    serde_json::from_str::<RawLocaleMessages>(&raw)
        .map(LocaleMessages::from)
        .map_err(|err| format!("{} parse failed: {}", path.display(), err))
}

fn load_locale_file(file_name: &str) -> Result<(PathBuf, String), String> {
    let candidates = collect_i18n_dirs();
    for dir in &candidates {
        let path = dir.join(file_name);
        if !path.is_file() {
            continue;
        }

        let raw = std::fs::read_to_string(&path)
            .map_err(|err| format!("{} read failed: {}", path.display(), err))?;
        return Ok((path, raw));
    }

    let searched = candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(format!(
        "{} not found; searched directories: {}",
        file_name, searched
    ))
}

fn app_resources_i18n_dir(current_exe: &Path) -> Option<PathBuf> {
    let macos_dir = current_exe.parent()?;
    if macos_dir.file_name()?.to_string_lossy() != "MacOS" {
        return None;
    }
    let contents_dir = macos_dir.parent()?;
    if contents_dir.file_name()?.to_string_lossy() != "Contents" {
        return None;
    }

    Some(contents_dir.join("Resources").join("i18n"))
}

fn push_i18n_dir(
    candidates: &mut Vec<PathBuf>,
    seen: &mut std::collections::HashSet<PathBuf>,
    candidate: PathBuf,
) {
    let normalized = if candidate.exists() {
        candidate.canonicalize().unwrap_or(candidate)
    } else if candidate.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&candidate))
            .unwrap_or(candidate)
    } else {
        candidate
    };

    if seen.insert(normalized.clone()) {
        candidates.push(normalized);
    }
}

fn collect_i18n_dirs() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let mut seen = std::collections::HashSet::new();

    if let Ok(current_exe) = std::env::current_exe() {
        if let Some(resources_i18n_dir) = app_resources_i18n_dir(&current_exe) {
            push_i18n_dir(&mut candidates, &mut seen, resources_i18n_dir);
        }

        if let Some(exe_dir) = current_exe.parent() {
            for ancestor in exe_dir.ancestors().take(6) {
                push_i18n_dir(
                    &mut candidates,
                    &mut seen,
                    ancestor.join("assets").join("i18n"),
                );
                push_i18n_dir(&mut candidates, &mut seen, ancestor.join("i18n"));
            }
        }
    }

    #[cfg(target_os = "linux")]
    push_i18n_dir(
        &mut candidates,
        &mut seen,
        PathBuf::from("/usr/lib/pdfview/i18n"),
    );

    push_i18n_dir(&mut candidates, &mut seen, PathBuf::from("./assets/i18n"));
    push_i18n_dir(&mut candidates, &mut seen, PathBuf::from("./i18n"));

    candidates
}

fn format_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut output = template.to_string();
    for (key, value) in vars {
        let token = format!("{{{key}}}");
        output = output.replace(&token, value);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_locale_tags() {
        for tag in ["zh-CN", "zh_TW", "ZH", "cn", "en-zh"] {
            assert_eq!(Language::from_locale_tag(tag), Language::ZhCn, "{tag}");
        }
    }

    #[test]
    fn other_locale_tags_fall_back_to_english() {
        for tag in ["en-US", "de_DE", "", "  "] {
            assert_eq!(Language::from_locale_tag(tag), Language::EnUs, "{tag:?}");
        }
    }

    #[test]
    fn template_substitutes_every_token() {
        let text = format_template(
            "{current} of {total} ({current})",
            &[("current", "2".into()), ("total", "9".into())],
        );
        assert_eq!(text, "2 of 9 (2)");
    }

    #[test]
    fn compiled_in_locale_is_complete() {
        assert!(serde_json::from_str::<RawLocaleMessages>(BUNDLED_EN_US).is_ok());
    }

    #[test]
    fn bundled_locales_parse() {
        let en = I18n::new(Language::EnUs);
        let zh = I18n::new(Language::ZhCn);
        assert_eq!(en.page_indicator(3, 10), "3 / 10");
        assert!(!zh.open_button.is_empty());
        assert!(en.cannot_open_file(Path::new("/tmp/a.pdf")).contains("/tmp/a.pdf"));
    }
}
