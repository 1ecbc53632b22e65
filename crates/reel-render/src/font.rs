use std::path::{Path, PathBuf};

use reel_core::{FontFamily, FontsConfig};

use crate::text::Typeface;

/// Where a resolved face came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// The requested family's own file.
    Family(PathBuf),
    /// The configured fallback font.
    Fallback(PathBuf),
    /// The built-in bitmap face.
    Builtin,
}

/// Finds a face for a font family, degrading until something loads.
///
/// Resolution never fails: a missing family falls back to the configured
/// fallback font, and a missing fallback to the built-in face.
#[derive(Debug, Clone)]
pub struct FontResolver {
    search_dirs: Vec<PathBuf>,
    fallback: Option<PathBuf>,
}

impl FontResolver {
    pub fn new(search_dirs: Vec<PathBuf>, fallback: Option<PathBuf>) -> Self {
        Self {
            search_dirs,
            fallback,
        }
    }

    pub fn from_config(config: &FontsConfig) -> Self {
        Self::new(config.search_dirs.clone(), Some(config.fallback.clone()))
    }

    /// Candidate paths for `family`, in search order.
    pub fn candidates(&self, family: FontFamily) -> Vec<PathBuf> {
        let file = family.file_name();
        let upper = file.to_uppercase();
        let mut paths = Vec::new();
        for dir in &self.search_dirs {
            paths.push(dir.join(file));
            // Some installs ship the core fonts with upper-case names.
            paths.push(dir.join(&upper));
        }
        paths
    }

    pub fn resolve(&self, family: FontFamily) -> (Typeface, FontSource) {
        for path in self.candidates(family) {
            if let Some(face) = try_load(&path) {
                tracing::debug!(family = %family, path = %path.display(), "loaded font");
                return (face, FontSource::Family(path));
            }
        }

        if let Some(fallback) = &self.fallback {
            if let Some(face) = try_load(fallback) {
                tracing::warn!(
                    family = %family,
                    fallback = %fallback.display(),
                    "font family not found, using fallback font"
                );
                return (face, FontSource::Fallback(fallback.clone()));
            }
        }

        tracing::warn!(family = %family, "no font file could be loaded, using built-in face");
        (Typeface::Builtin, FontSource::Builtin)
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::from_config(&FontsConfig::default())
    }
}

fn try_load(path: &Path) -> Option<Typeface> {
    if !path.is_file() {
        return None;
    }
    match Typeface::load(path) {
        Ok(face) => Some(face),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fonts_gives_builtin() {
        let (face, source) = FontResolver::new(Vec::new(), None).resolve(FontFamily::ArialBold);
        assert!(face.is_builtin());
        assert_eq!(source, FontSource::Builtin);
    }

    #[test]
    fn test_missing_everything_falls_back_to_builtin() {
        let resolver = FontResolver::new(
            vec![PathBuf::from("/nonexistent/fonts")],
            Some(PathBuf::from("/nonexistent/fallback.ttf")),
        );
        let (face, source) = resolver.resolve(FontFamily::Impact);
        assert!(face.is_builtin());
        assert_eq!(source, FontSource::Builtin);
    }

    #[test]
    fn test_corrupt_font_is_skipped() {
        let dir = std::env::temp_dir().join(format!("reel-font-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("impact.ttf"), b"not a font").unwrap();

        let resolver = FontResolver::new(vec![dir.clone()], None);
        let (face, source) = resolver.resolve(FontFamily::Impact);
        assert!(face.is_builtin());
        assert_eq!(source, FontSource::Builtin);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_family_file_preferred_over_fallback() {
        let dir = std::env::temp_dir().join(format!("reel-font-real-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let data = include_bytes!("../assets/DejaVuSans-Bold.ttf");
        std::fs::write(dir.join("impact.ttf"), data).unwrap();
        std::fs::write(dir.join("fallback.ttf"), data).unwrap();

        let resolver = FontResolver::new(vec![dir.clone()], Some(dir.join("fallback.ttf")));
        let (face, source) = resolver.resolve(FontFamily::Impact);
        assert!(!face.is_builtin());
        assert_eq!(source, FontSource::Family(dir.join("impact.ttf")));

        let (face, source) = resolver.resolve(FontFamily::Georgia);
        assert!(!face.is_builtin());
        assert_eq!(source, FontSource::Fallback(dir.join("fallback.ttf")));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_candidates_follow_search_order() {
        let resolver = FontResolver::new(vec![PathBuf::from("a"), PathBuf::from("b")], None);
        let candidates = resolver.candidates(FontFamily::Arial);
        assert_eq!(candidates[0], PathBuf::from("a").join("arial.ttf"));
        assert_eq!(candidates[1], PathBuf::from("a").join("ARIAL.TTF"));
        assert_eq!(candidates[2], PathBuf::from("b").join("arial.ttf"));
    }
}
