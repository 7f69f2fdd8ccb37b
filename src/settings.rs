use crate::thumbnails::ThumbnailFit;
use std::path::PathBuf;

const SETTINGS_DB_DIR_NAME: &str = "pdfview_db";
const SETTINGS_TREE: &str = "settings";
const KEY_WINDOW_WIDTH: &str = "width";
const KEY_WINDOW_HEIGHT: &str = "height";
const KEY_THUMBNAIL_FIT: &str = "thumbnail_fit";
const KEY_OPEN_DIALOG_ON_STARTUP: &str = "open_dialog_on_startup";

pub(crate) fn app_data_dir() -> Option<PathBuf> {
    if let Some(app_data) = std::env::var_os("APPDATA") {
        return Some(PathBuf::from(app_data).join("pdfview"));
    }
    if let Some(home) = std::env::var_os("HOME") {
        return Some(PathBuf::from(home).join(".pdfview"));
    }
    None
}

fn settings_db_path() -> PathBuf {
    app_data_dir()
        .unwrap_or_else(|| PathBuf::from(".pdfview"))
        .join(SETTINGS_DB_DIR_NAME)
}

/// Persisted preferences. Every read falls back to a default so a missing or
/// unreadable database never blocks startup.
pub struct Settings {
    store: Option<sled::Tree>,
}

impl Settings {
    pub fn open() -> Self {
        let db_path = settings_db_path();
        if let Some(parent) = db_path.parent()
            && std::fs::create_dir_all(parent).is_err()
        {
            crate::debug_log!("[store] create dir failed: {}", parent.display());
            return Self { store: None };
        }

        let db = match sled::open(&db_path) {
            Ok(db) => db,
            Err(err) => {
                crate::debug_log!("[store] open db failed: {} | {}", db_path.display(), err);
                return Self { store: None };
            }
        };

        let store = match db.open_tree(SETTINGS_TREE) {
            Ok(tree) => Some(tree),
            Err(err) => {
                crate::debug_log!("[store] open tree failed: {} | {}", SETTINGS_TREE, err);
                None
            }
        };

        crate::debug_log!(
            "[store] init settings={} path={}",
            store.is_some(),
            db_path.display()
        );
        Self { store }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        let store = sled::Config::new()
            .temporary(true)
            .open()
            .and_then(|db| db.open_tree(SETTINGS_TREE))
            .ok();
        Self { store }
    }

    fn get(&self, key: &str) -> Option<sled::IVec> {
        self.store.as_ref()?.get(key).ok().flatten()
    }

    fn set(&self, key: &str, value: impl Into<sled::IVec>) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if let Err(err) = store.insert(key, value) {
            crate::debug_log!("[store] write {} failed: {}", key, err);
        }
    }

    pub fn window_size(&self) -> Option<(f32, f32)> {
        let width = decode_f32(self.get(KEY_WINDOW_WIDTH)?.as_ref())?;
        let height = decode_f32(self.get(KEY_WINDOW_HEIGHT)?.as_ref())?;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some((width, height))
    }

    pub fn save_window_size(&self, width: f32, height: f32) {
        self.set(KEY_WINDOW_WIDTH, width.to_be_bytes().to_vec());
        self.set(KEY_WINDOW_HEIGHT, height.to_be_bytes().to_vec());
    }

    pub fn thumbnail_fit(&self) -> ThumbnailFit {
        self.get(KEY_THUMBNAIL_FIT)
            .and_then(|value| String::from_utf8(value.to_vec()).ok())
            .and_then(|raw| ThumbnailFit::parse(&raw))
            .unwrap_or_default()
    }

    pub fn set_thumbnail_fit(&self, fit: ThumbnailFit) {
        self.set(KEY_THUMBNAIL_FIT, fit.to_string().into_bytes());
    }

    pub fn open_dialog_on_startup(&self) -> bool {
        decode_bool(self.get(KEY_OPEN_DIALOG_ON_STARTUP), true)
    }

    pub fn set_open_dialog_on_startup(&self, enabled: bool) {
        self.set(KEY_OPEN_DIALOG_ON_STARTUP, vec![u8::from(enabled)]);
    }
}

fn decode_f32(bytes: &[u8]) -> Option<f32> {
    Some(f32::from_be_bytes(bytes.try_into().ok()?))
}

fn decode_bool(value: Option<sled::IVec>, default: bool) -> bool {
    match value.as_deref() {
        Some([byte]) => *byte != 0,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_an_empty_store() {
        let settings = Settings::in_memory();
        assert_eq!(settings.window_size(), None);
        assert_eq!(settings.thumbnail_fit(), ThumbnailFit::default());
        assert!(settings.open_dialog_on_startup());
    }

    #[test]
    fn values_survive_a_write() {
        let settings = Settings::in_memory();
        settings.save_window_size(1024.0, 768.5);
        settings.set_thumbnail_fit(ThumbnailFit::Height(240));
        settings.set_open_dialog_on_startup(false);

        assert_eq!(settings.window_size(), Some((1024.0, 768.5)));
        assert_eq!(settings.thumbnail_fit(), ThumbnailFit::Height(240));
        assert!(!settings.open_dialog_on_startup());
    }

    #[test]
    fn non_positive_window_size_is_ignored() {
        let settings = Settings::in_memory();
        settings.save_window_size(0.0, 600.0);
        assert_eq!(settings.window_size(), None);
    }

    #[test]
    fn missing_store_falls_back_to_defaults() {
        let settings = Settings { store: None };
        settings.save_window_size(800.0, 600.0);
        assert_eq!(settings.window_size(), None);
        assert!(settings.open_dialog_on_startup());
    }
}
