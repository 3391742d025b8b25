use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::settings::Settings;

pub const PAGE_FILE_NAME: &str = "index.html";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("bundled page not found (looked in {})", display_candidates(.0))]
    NotFound(Vec<PathBuf>),

    #[error("cannot resolve {}: {source}", .path.display())]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Places the shell looks for the page, in order.
pub fn candidate_pages(settings: &Settings) -> Vec<PathBuf> {
    if let Some(path) = &settings.content_file {
        return vec![path.clone()];
    }
    let mut candidates = Vec::new();
    if let Some(exe_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(PAGE_FILE_NAME));
        candidates.push(
            exe_dir
                .join("..")
                .join("share")
                .join("textcompare")
                .join(PAGE_FILE_NAME),
        );
    }
    candidates.push(PathBuf::from(PAGE_FILE_NAME));
    candidates
}

pub fn locate_page(settings: &Settings) -> Result<PathBuf, ContentError> {
    first_existing(candidate_pages(settings))
}

fn first_existing(candidates: Vec<PathBuf>) -> Result<PathBuf, ContentError> {
    let Some(found) = candidates.iter().find(|p| p.is_file()) else {
        return Err(ContentError::NotFound(candidates));
    };
    found
        .canonicalize()
        .map_err(|source| ContentError::Unresolvable {
            path: found.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_override_is_the_only_candidate() {
        let settings = Settings {
            content_file: Some(PathBuf::from("/srv/page.html")),
            ..Settings::default()
        };
        assert_eq!(
            candidate_pages(&settings),
            vec![PathBuf::from("/srv/page.html")]
        );
    }

    #[test]
    fn test_default_candidates_end_with_working_dir() {
        let candidates = candidate_pages(&Settings::default());
        assert_eq!(candidates.last(), Some(&PathBuf::from(PAGE_FILE_NAME)));
    }

    #[test]
    fn test_locate_override() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("diff.html");
        fs::write(&page, "<html></html>").unwrap();
        let settings = Settings {
            content_file: Some(page.clone()),
            ..Settings::default()
        };
        assert_eq!(locate_page(&settings).unwrap(), page.canonicalize().unwrap());
    }

    #[test]
    fn test_missing_page_lists_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("missing.html");
        let settings = Settings {
            content_file: Some(page.clone()),
            ..Settings::default()
        };
        match locate_page(&settings) {
            Err(ContentError::NotFound(candidates)) => assert_eq!(candidates, vec![page]),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_is_not_a_page() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            content_file: Some(dir.path().to_path_buf()),
            ..Settings::default()
        };
        assert!(matches!(
            locate_page(&settings),
            Err(ContentError::NotFound(_))
        ));
    }
}
