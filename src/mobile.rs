/* hosanna/src/mobile.rs
 *
 * UniFFI interface exposing the hymnbook core to mobile platforms.
 */

use crate::config::Config;
use crate::context::StandardContext;
use crate::library::{Library, Settings, SettingsPatch, Statistics, Theme};
use crate::model::{Bookmark, Catalog, ViewedEntry};
use crate::search::{Searcher, clean_voice_input};
use crate::viewer::Viewer;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, uniffi::Error)]
#[uniffi(flat_error)]
pub enum MobileError {
    Generic(String),
}
impl From<String> for MobileError {
    fn from(e: String) -> Self {
        Self::Generic(e)
    }
}
impl From<&str> for MobileError {
    fn from(e: &str) -> Self {
        Self::Generic(e.to_string())
    }
}
impl From<anyhow::Error> for MobileError {
    fn from(e: anyhow::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
impl From<serde_json::Error> for MobileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
impl std::fmt::Display for MobileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MobileError::Generic(s) => s,
            }
        )
    }
}
impl std::error::Error for MobileError {}

#[derive(uniffi::Record)]
pub struct MobileHymn {
    pub index: u32,
    pub title: String,
    pub number: Option<u32>,
    pub image_path: String,
    pub music_path: Option<String>,
}

#[derive(uniffi::Record)]
pub struct MobileBookmark {
    pub index: u32,
    pub page: u32,
    pub timestamp: i64,
    pub title: String,
}

#[derive(uniffi::Record)]
pub struct MobileViewed {
    pub index: u32,
    pub timestamp: i64,
    pub title: String,
}

#[derive(uniffi::Record)]
pub struct MobileNote {
    pub index: u32,
    pub title: String,
    pub text: String,
}

#[derive(uniffi::Record)]
pub struct MobileSettings {
    pub font_size: u8,
    pub dark_mode: bool,
    pub theme: String,
}

#[derive(uniffi::Record)]
pub struct MobileStatistics {
    pub total_hymns: u32,
    pub favorites: u32,
    pub viewed: u32,
    pub notes: u32,
    pub bookmarks: u32,
    pub progress_percent: u32,
}

/// Current viewer page as the sheet screen needs it.
#[derive(uniffi::Record)]
pub struct MobilePage {
    pub index: u32,
    pub title: String,
    pub page_label: String,
    pub image_path: String,
    pub scale: f32,
}

fn settings_to_mobile(s: Settings) -> MobileSettings {
    MobileSettings {
        font_size: s.font_size,
        dark_mode: s.dark_mode,
        theme: s.theme.to_string(),
    }
}

fn stats_to_mobile(s: Statistics) -> MobileStatistics {
    MobileStatistics {
        total_hymns: s.total_hymns as u32,
        favorites: s.favorites as u32,
        viewed: s.viewed as u32,
        notes: s.notes as u32,
        bookmarks: s.bookmarks as u32,
        progress_percent: s.progress_percent(),
    }
}

fn indices(list: Vec<usize>) -> Vec<u32> {
    list.into_iter().map(|i| i as u32).collect()
}

#[derive(uniffi::Object)]
pub struct HosannaMobile {
    catalog: Catalog,
    searcher: Searcher,
    library: Library,
    config: Config,
    viewer: Mutex<Option<Viewer>>,
}

impl HosannaMobile {
    fn hymn_to_mobile(&self, index: usize) -> MobileHymn {
        let hymn = self.catalog.get(index);
        MobileHymn {
            index: index as u32,
            title: self.catalog.title_or_placeholder(index),
            number: hymn.and_then(|h| h.number()),
            image_path: self
                .catalog
                .image_path(index)
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            music_path: self
                .catalog
                .music_path(index)
                .map(|p| p.to_string_lossy().to_string()),
        }
    }

    fn bookmark_to_mobile(&self, b: Bookmark) -> MobileBookmark {
        MobileBookmark {
            index: b.index as u32,
            page: b.page,
            timestamp: b.timestamp,
            title: self.catalog.title_or_placeholder(b.index),
        }
    }

    fn viewed_to_mobile(&self, v: ViewedEntry) -> MobileViewed {
        MobileViewed {
            index: v.index as u32,
            timestamp: v.timestamp,
            title: self.catalog.title_or_placeholder(v.index),
        }
    }

    fn lock_viewer(&self) -> Result<MutexGuard<'_, Option<Viewer>>, MobileError> {
        self.viewer
            .lock()
            .map_err(|_| MobileError::from("Viewer state poisoned"))
    }

    fn page(&self, viewer: &Viewer) -> MobilePage {
        let index = viewer.index();
        MobilePage {
            index: index as u32,
            title: viewer.current_title(&self.catalog),
            page_label: viewer.page_label(),
            image_path: self
                .catalog
                .image_path(index)
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            scale: viewer.scale(),
        }
    }

    /// Applies `f` to the open viewer and returns the resulting page.
    fn with_viewer<F: FnOnce(&mut Viewer)>(&self, f: F) -> Result<MobilePage, MobileError> {
        let mut guard = self.lock_viewer()?;
        let viewer = guard
            .as_mut()
            .ok_or_else(|| MobileError::from("Viewer is not open"))?;
        f(viewer);
        Ok(self.page(viewer))
    }
}

#[uniffi::export]
impl HosannaMobile {
    /// `files_dir` is the app's private storage. `catalog_path` overrides the
    /// configured catalog; the bundled demo catalog is used when neither is set.
    #[uniffi::constructor]
    pub fn new(files_dir: String, catalog_path: Option<String>) -> Result<Self, MobileError> {
        #[cfg(target_os = "android")]
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag("HosannaRust"),
        );
        let ctx = StandardContext::new(Some(PathBuf::from(files_dir)));
        let mut config = Config::load_or_init(&ctx)?;
        if let Some(p) = catalog_path {
            config.catalog = Some(PathBuf::from(p));
        }
        let catalog = config.open_catalog()?;
        let library = Library::open(&ctx)?;
        log::info!("Mobile core ready with {} hymns", catalog.len());
        Ok(Self {
            searcher: Searcher::new(&catalog),
            catalog,
            library,
            config,
            viewer: Mutex::new(None),
        })
    }

    // --- CATALOG & SEARCH ---

    pub fn hymn_count(&self) -> u32 {
        self.catalog.len() as u32
    }

    pub fn get_hymns(&self) -> Vec<MobileHymn> {
        (0..self.catalog.len())
            .map(|i| self.hymn_to_mobile(i))
            .collect()
    }

    pub fn get_hymn(&self, index: u32) -> Option<MobileHymn> {
        let index = index as usize;
        self.catalog.get(index).map(|_| self.hymn_to_mobile(index))
    }

    pub fn search(&self, query: String) -> Vec<MobileHymn> {
        self.searcher
            .search(&query)
            .into_iter()
            .map(|hit| self.hymn_to_mobile(hit.index))
            .collect()
    }

    /// Cleans dictated text before it is put in the search box.
    pub fn clean_voice_input(&self, text: String) -> String {
        clean_voice_input(&text)
    }

    /// Quick-access number entry. Returns the catalog index.
    pub fn resolve_number(&self, input: String) -> Option<u32> {
        self.catalog.resolve_number(&input).map(|i| i as u32)
    }

    // --- FAVORITES ---

    pub fn get_favorites(&self) -> Result<Vec<u32>, MobileError> {
        Ok(indices(self.library.get_favorites()?))
    }

    pub fn add_favorite(&self, index: u32) -> Result<(), MobileError> {
        Ok(self.library.add_favorite(index as usize)?)
    }

    pub fn remove_favorite(&self, index: u32) -> Result<(), MobileError> {
        Ok(self.library.remove_favorite(index as usize)?)
    }

    pub fn is_favorite(&self, index: u32) -> Result<bool, MobileError> {
        Ok(self.library.is_favorite(index as usize)?)
    }

    pub fn toggle_favorite(&self, index: u32) -> Result<bool, MobileError> {
        Ok(self.library.toggle_favorite(index as usize)?)
    }

    // --- RECENT ---

    pub fn get_recent(&self, max_items: Option<u32>) -> Result<Vec<u32>, MobileError> {
        let max = max_items
            .map(|m| m as usize)
            .unwrap_or(self.config.recent_limit);
        Ok(indices(self.library.get_recent(max)?))
    }

    pub fn add_recent(&self, index: u32) -> Result<(), MobileError> {
        Ok(self.library.add_recent(index as usize)?)
    }

    pub fn clear_recent(&self) -> Result<(), MobileError> {
        Ok(self.library.clear_recent()?)
    }

    // --- NOTES ---

    pub fn get_note(&self, index: u32) -> Result<String, MobileError> {
        Ok(self.library.get_note(index as usize)?)
    }

    pub fn save_note(&self, index: u32, text: String) -> Result<(), MobileError> {
        Ok(self.library.save_note(index as usize, &text)?)
    }

    pub fn delete_note(&self, index: u32) -> Result<(), MobileError> {
        Ok(self.library.delete_note(index as usize)?)
    }

    pub fn get_all_notes(&self) -> Result<Vec<MobileNote>, MobileError> {
        Ok(self
            .library
            .get_all_notes()?
            .into_iter()
            .map(|(index, text)| MobileNote {
                index: index as u32,
                title: self.catalog.title_or_placeholder(index),
                text,
            })
            .collect())
    }

    // --- BOOKMARKS ---

    pub fn get_bookmarks(&self) -> Result<Vec<MobileBookmark>, MobileError> {
        Ok(self
            .library
            .get_bookmarks()?
            .into_iter()
            .map(|b| self.bookmark_to_mobile(b))
            .collect())
    }

    pub fn add_bookmark(&self, index: u32, page: u32) -> Result<(), MobileError> {
        Ok(self.library.add_bookmark(index as usize, page)?)
    }

    pub fn remove_bookmark(&self, index: u32, page: u32) -> Result<(), MobileError> {
        Ok(self.library.remove_bookmark(index as usize, page)?)
    }

    pub fn is_bookmarked(&self, index: u32, page: u32) -> Result<bool, MobileError> {
        Ok(self.library.is_bookmarked(index as usize, page)?)
    }

    pub fn toggle_bookmark(&self, index: u32, page: u32) -> Result<bool, MobileError> {
        Ok(self.library.toggle_bookmark(index as usize, page)?)
    }

    // --- VIEWED ---

    pub fn add_viewed(&self, index: u32) -> Result<(), MobileError> {
        Ok(self.library.add_viewed(index as usize)?)
    }

    pub fn get_viewed(&self, max_items: Option<u32>) -> Result<Vec<MobileViewed>, MobileError> {
        let max = max_items
            .map(|m| m as usize)
            .unwrap_or(self.config.viewed_limit);
        Ok(self
            .library
            .get_viewed(max)?
            .into_iter()
            .map(|v| self.viewed_to_mobile(v))
            .collect())
    }

    pub fn clear_viewed(&self) -> Result<(), MobileError> {
        Ok(self.library.clear_viewed()?)
    }

    // --- SETTINGS & STATISTICS ---

    pub fn get_settings(&self) -> Result<MobileSettings, MobileError> {
        Ok(settings_to_mobile(self.library.get_settings()?))
    }

    pub fn update_settings(
        &self,
        font_size: Option<u8>,
        dark_mode: Option<bool>,
    ) -> Result<MobileSettings, MobileError> {
        let mut patch = match dark_mode {
            Some(on) => SettingsPatch::dark_mode(on),
            None => SettingsPatch::default(),
        };
        patch.font_size = font_size;
        Ok(settings_to_mobile(self.library.update_settings(&patch)?))
    }

    pub fn set_theme(&self, theme: String) -> Result<MobileSettings, MobileError> {
        let theme = match theme.as_str() {
            "dark" => Theme::Dark,
            "light" => Theme::Light,
            other => return Err(format!("Unknown theme '{}'", other).into()),
        };
        let patch = SettingsPatch {
            theme: Some(theme),
            ..Default::default()
        };
        Ok(settings_to_mobile(self.library.update_settings(&patch)?))
    }

    pub fn reset_settings(&self) -> Result<MobileSettings, MobileError> {
        Ok(settings_to_mobile(self.library.reset_settings()?))
    }

    pub fn get_statistics(&self) -> Result<MobileStatistics, MobileError> {
        Ok(stats_to_mobile(
            self.library.statistics(self.catalog.len())?,
        ))
    }

    // --- VIEWER ---

    /// Opens the sheet viewer and records the view.
    pub fn open_viewer(&self, index: u32) -> Result<MobilePage, MobileError> {
        if self.catalog.is_empty() {
            return Err(MobileError::from("The catalog is empty"));
        }
        let viewer = Viewer::open(index as usize, self.catalog.len());
        self.library.add_viewed(viewer.index())?;
        let page = self.page(&viewer);
        *self.lock_viewer()? = Some(viewer);
        Ok(page)
    }

    pub fn close_viewer(&self) -> Result<(), MobileError> {
        *self.lock_viewer()? = None;
        Ok(())
    }

    pub fn next_page(&self) -> Result<MobilePage, MobileError> {
        let mut moved = false;
        let page = self.with_viewer(|v| moved = v.next())?;
        if moved {
            self.library.add_viewed(page.index as usize)?;
        }
        Ok(page)
    }

    pub fn previous_page(&self) -> Result<MobilePage, MobileError> {
        let mut moved = false;
        let page = self.with_viewer(|v| moved = v.previous())?;
        if moved {
            self.library.add_viewed(page.index as usize)?;
        }
        Ok(page)
    }

    /// Pinch in progress; `factor` is the cumulative gesture scale.
    pub fn pinch_update(&self, factor: f32) -> Result<MobilePage, MobileError> {
        self.with_viewer(|v| {
            v.pinch_update(factor);
        })
    }

    pub fn pinch_end(&self) -> Result<MobilePage, MobileError> {
        self.with_viewer(|v| v.pinch_end())
    }

    pub fn reset_zoom(&self) -> Result<MobilePage, MobileError> {
        self.with_viewer(|v| v.reset_zoom())
    }

    // --- BACKUP ---

    pub fn export_data(&self) -> Result<String, MobileError> {
        Ok(serde_json::to_string_pretty(&self.library.export()?)?)
    }

    pub fn import_data(&self, json: String) -> Result<u32, MobileError> {
        let snapshot: serde_json::Value = serde_json::from_str(&json)?;
        Ok(self.library.import(&snapshot)? as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    fn core() -> (HosannaMobile, TestContext) {
        let ctx = TestContext::new();
        let m = HosannaMobile::new(ctx.root.to_string_lossy().to_string(), None).unwrap();
        (m, ctx)
    }

    #[test]
    fn test_viewer_records_views_and_zoom() {
        let (m, _ctx) = core();
        let page = m.open_viewer(1).unwrap();
        assert_eq!(page.page_label, "2 / 5");
        let page = m.pinch_update(2.0).unwrap();
        assert_eq!(page.scale, 2.0);
        m.pinch_end().unwrap();
        assert_eq!(m.pinch_update(3.0).unwrap().scale, 2.0);
        m.next_page().unwrap();

        let viewed = m.get_viewed(None).unwrap();
        assert_eq!(viewed.iter().map(|v| v.index).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(m.get_statistics().unwrap().viewed, 2);
    }

    #[test]
    fn test_viewer_must_be_open() {
        let (m, _ctx) = core();
        assert!(m.next_page().is_err());
    }

    #[test]
    fn test_empty_catalog_cannot_open_viewer() {
        let ctx = TestContext::new();
        let path = ctx.root.join("empty.json");
        std::fs::write(&path, "[]").unwrap();
        let m = HosannaMobile::new(
            ctx.root.to_string_lossy().to_string(),
            Some(path.to_string_lossy().to_string()),
        )
        .unwrap();
        assert_eq!(m.hymn_count(), 0);
        assert!(m.open_viewer(0).is_err());
        assert!(m.get_viewed(None).unwrap().is_empty());
    }

    #[test]
    fn test_settings_and_backup() {
        let (m, _ctx) = core();
        let s = m.update_settings(Some(18), Some(true)).unwrap();
        assert_eq!(s.theme, "dark");
        m.toggle_favorite(3).unwrap();
        let json = m.export_data().unwrap();
        m.remove_favorite(3).unwrap();
        assert_eq!(m.import_data(json).unwrap(), 2);
        assert_eq!(m.get_favorites().unwrap(), vec![3]);
        assert!(m.set_theme("sepia".into()).is_err());
    }
}
