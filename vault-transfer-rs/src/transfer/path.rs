//! Destination path resolution.

use crate::config::{OverridePath, TransferSettings};
use crate::error::{Result, TransferError};
use crate::host::VaultHost;
use crate::transfer::date::{expand_date_variables, has_date_variables, note_date};
use crate::types::{NoteRef, ResolvedDestination, path_to_slash};
use chrono::NaiveDateTime;
use regex::{NoExpand, Regex, RegexBuilder};
use std::path::{Path, PathBuf};

/// Improve consistency of slashes in a path.
///
/// Backslashes become forward slashes, and a single leading and trailing
/// slash is removed.
pub fn clean_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    let path = path.strip_prefix('/').unwrap_or(&path);
    path.strip_suffix('/').unwrap_or(path).to_string()
}

/// Like [`clean_path`], but an absolute root keeps its leading slash.
pub fn clean_root(root: &str) -> String {
    let root = root.trim().replace('\\', "/");
    if root == "/" {
        return root;
    }
    root.strip_suffix('/').unwrap_or(&root).to_string()
}

/// Join a root and a relative path, collapsing repeated separators.
pub fn join_clean(root: &str, relative: &str) -> PathBuf {
    let relative: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
    if relative.is_empty() {
        return PathBuf::from(root);
    }
    let relative = relative.join("/");
    if root.is_empty() {
        PathBuf::from(relative)
    } else if root.ends_with('/') {
        PathBuf::from(format!("{}{}", root, relative))
    } else {
        PathBuf::from(format!("{}/{}", root, relative))
    }
}

/// Compile a path pattern: `/regex/` or a literal, both case-insensitive.
pub fn compile_pattern(pattern: &str) -> Result<(Regex, bool)> {
    let (source, is_regex) = match pattern
        .strip_prefix('/')
        .and_then(|p| p.strip_suffix('/'))
    {
        Some(inner) if !inner.is_empty() => (inner.to_string(), true),
        _ => (regex::escape(pattern), false),
    };

    let regex = RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|e| TransferError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;
    Ok((regex, is_regex))
}

/// Strip every removal pattern from a path, in order.
///
/// Each pattern sees the output of the previous one.
pub fn strip_patterns(path: &str, patterns: &[String]) -> Result<String> {
    let mut path = path.to_string();
    for pattern in patterns.iter().filter(|p| !p.trim().is_empty()) {
        let (regex, _) = compile_pattern(pattern.trim())?;
        path = regex.replace_all(&path, NoExpand("")).into_owned();
    }
    Ok(path)
}

/// Apply override rules to a path, in order.
///
/// Regex rules may refer to capture groups in their replacement.
pub fn apply_overrides(
    path: &str,
    overrides: &[OverridePath],
    date: Option<&NaiveDateTime>,
) -> Result<String> {
    let mut path = path.to_string();
    for rule in overrides.iter().filter(|r| !r.source_path.trim().is_empty()) {
        let (regex, is_regex) = compile_pattern(rule.source_path.trim())?;
        let replacement = match date {
            Some(date) => expand_date_variables(&rule.replacement, date),
            None => rule.replacement.clone(),
        };
        path = if is_regex {
            regex.replace_all(&path, replacement.as_str()).into_owned()
        } else {
            regex.replace_all(&path, NoExpand(&replacement)).into_owned()
        };
    }
    Ok(path)
}

/// Computes where files land in the other vault.
///
/// One resolver serves a note and all of its attachments, so attachments
/// follow the same structural rules as the note.
#[derive(Debug, Clone)]
pub struct PathResolver<'a> {
    settings: &'a TransferSettings,
    explicit: Option<PathBuf>,
    date: Option<NaiveDateTime>,
}

impl<'a> PathResolver<'a> {
    pub fn new(
        settings: &'a TransferSettings,
        explicit: Option<&Path>,
        date: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            settings,
            explicit: explicit.map(Path::to_path_buf),
            date,
        }
    }

    /// A resolver for a note, with its date looked up only when a template needs it.
    pub fn for_note<H: VaultHost + ?Sized>(
        host: &H,
        note: &NoteRef,
        settings: &'a TransferSettings,
        explicit: Option<&Path>,
    ) -> Self {
        let needs_date = has_date_variables(&settings.target_subfolder)
            || settings
                .override_paths
                .iter()
                .any(|o| has_date_variables(&o.replacement));
        let date = needs_date.then(|| note_date(host, note, &settings.date_variable));
        Self::new(settings, explicit, date)
    }

    /// The folder everything is copied under.
    pub fn destination_root(&self) -> PathBuf {
        if let Some(ref explicit) = self.explicit {
            return PathBuf::from(clean_root(&path_to_slash(explicit)));
        }

        let root = clean_root(&self.settings.target_root);
        let subfolder = match self.date {
            Some(ref date) => expand_date_variables(&self.settings.target_subfolder, date),
            None => self.settings.target_subfolder.clone(),
        };
        join_clean(&root, &clean_path(&subfolder))
    }

    /// Where a file lands, without touching the filesystem.
    pub fn destination_for(&self, file: &NoteRef) -> Result<ResolvedDestination> {
        let root = self.destination_root();

        let path = if self.explicit.is_none() && self.settings.recreate_tree {
            let relative = apply_overrides(
                &file.path_str(),
                &self.settings.override_paths,
                self.date.as_ref(),
            )?;
            let relative = strip_patterns(&relative, &self.settings.remove_path)?;
            join_clean(&path_to_slash(&root), &relative)
        } else {
            root.join(&file.name)
        };

        let directory = path.parent().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
        if path == root || file.name.is_empty() {
            return Err(TransferError::Other(format!(
                "No destination file name for {}",
                file.path_str()
            )));
        }

        Ok(ResolvedDestination {
            directory,
            file: path,
        })
    }

    /// Whether destination folders are created rather than required.
    pub fn creates_directories(&self) -> bool {
        self.settings.automatic_create_output_folder
            || (self.explicit.is_none() && self.settings.recreate_tree)
    }

    /// Create the destination folder when the settings allow it.
    pub fn prepare<H: VaultHost + ?Sized>(
        &self,
        host: &H,
        destination: &ResolvedDestination,
    ) -> Result<()> {
        if self.creates_directories() && !host.target_is_dir(&destination.directory) {
            tracing::debug!("creating {}", destination.directory.display());
            host.create_target_dir(&destination.directory)?;
        }
        Ok(())
    }
}

/// Resolve a note's destination and create its folder when allowed.
pub fn resolve_note_destination<H: VaultHost + ?Sized>(
    host: &H,
    note: &NoteRef,
    settings: &TransferSettings,
    explicit: Option<&Path>,
) -> Result<ResolvedDestination> {
    let resolver = PathResolver::for_note(host, note, settings, explicit);
    let destination = resolver.destination_for(note)?;
    resolver.prepare(host, &destination)?;
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn settings(root: &str, subfolder: &str, recreate_tree: bool) -> TransferSettings {
        TransferSettings {
            target_root: root.to_string(),
            target_subfolder: subfolder.to_string(),
            recreate_tree,
            ..Default::default()
        }
    }

    fn dest(settings: &TransferSettings, path: &str) -> PathBuf {
        PathResolver::new(settings, None, None)
            .destination_for(&NoteRef::new(path))
            .unwrap()
            .file
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(" \\Unsorted\\Transfer\\ "), "Unsorted/Transfer");
        assert_eq!(clean_path("/a/b/"), "a/b");
        assert_eq!(clean_path(""), "");
    }

    #[test]
    fn test_clean_root_keeps_anchor() {
        assert_eq!(clean_root("/Vaults/Second/"), "/Vaults/Second");
        assert_eq!(clean_root("C:\\Vaults\\Second"), "C:/Vaults/Second");
        assert_eq!(clean_root("/"), "/");
    }

    #[test]
    fn test_flat_destination_ignores_source_folder() {
        let s = settings("/other", "Inbox/Transfer", false);
        assert_eq!(dest(&s, "deep/nested/x.md"), PathBuf::from("/other/Inbox/Transfer/x.md"));
        assert_eq!(dest(&s, "x.md"), PathBuf::from("/other/Inbox/Transfer/x.md"));
    }

    #[test]
    fn test_empty_subfolder() {
        let s = settings("/other/", "", false);
        let resolved = PathResolver::new(&s, None, None)
            .destination_for(&NoteRef::new("a.md"))
            .unwrap();
        assert_eq!(resolved.file, PathBuf::from("/other/a.md"));
        assert_eq!(resolved.directory, PathBuf::from("/other"));
    }

    #[test]
    fn test_recreate_tree_keeps_relative_path() {
        let s = settings("/other", "", true);
        assert_eq!(dest(&s, "Projects/Sub/b.md"), PathBuf::from("/other/Projects/Sub/b.md"));

        let s = settings("/other", "Archive", true);
        assert_eq!(dest(&s, "Projects/a.md"), PathBuf::from("/other/Archive/Projects/a.md"));
    }

    #[test]
    fn test_strip_patterns_in_order() {
        let patterns = vec!["draft".to_string(), "Draft".to_string()];
        assert_eq!(strip_patterns("Draft/Notes/x.md", &patterns).unwrap(), "/Notes/x.md");

        let s = TransferSettings {
            remove_path: patterns,
            ..settings("/other", "", true)
        };
        assert_eq!(dest(&s, "Draft/Notes/x.md"), PathBuf::from("/other/Notes/x.md"));
    }

    #[test]
    fn test_strip_patterns_order_matters() {
        let ab = vec!["ab".to_string(), "c".to_string()];
        let ba = vec!["c".to_string(), "ab".to_string()];
        assert_eq!(strip_patterns("acb/x", &ab).unwrap(), "ab/x");
        assert_eq!(strip_patterns("acb/x", &ba).unwrap(), "/x");
    }

    #[test]
    fn test_strip_regex_pattern() {
        let patterns = vec![r"/^\d{4}\//".to_string()];
        assert_eq!(strip_patterns("2024/Notes/x.md", &patterns).unwrap(), "Notes/x.md");
    }

    #[test]
    fn test_invalid_regex_pattern() {
        let patterns = vec!["/([/".to_string()];
        let err = strip_patterns("a/b", &patterns).unwrap_err();
        assert!(matches!(err, TransferError::InvalidPattern { .. }));
    }

    #[test]
    fn test_overrides_literal_and_regex() {
        let overrides = vec![
            OverridePath {
                source_path: "projects".to_string(),
                replacement: "Work".to_string(),
            },
            OverridePath {
                source_path: r"/^Work/(\w+)/".to_string(),
                replacement: "Clients/$1".to_string(),
            },
        ];
        let result = apply_overrides("Projects/Acme/plan.md", &overrides, None).unwrap();
        assert_eq!(result, "Clients/Acme/plan.md");
    }

    #[test]
    fn test_overrides_with_date() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let overrides = vec![OverridePath {
            source_path: "Daily".to_string(),
            replacement: "Journal/{{YYYY}}".to_string(),
        }];
        let s = TransferSettings {
            override_paths: overrides,
            ..settings("/other", "", true)
        };
        let resolved = PathResolver::new(&s, None, Some(date))
            .destination_for(&NoteRef::new("Daily/2023-11-02.md"))
            .unwrap();
        assert_eq!(resolved.file, PathBuf::from("/other/Journal/2023/2023-11-02.md"));
    }

    #[test]
    fn test_subfolder_date_variable() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let s = settings("/other", "Inbox/{{YYYY-MM}}", false);
        let resolver = PathResolver::new(&s, None, Some(date));
        assert_eq!(resolver.destination_root(), PathBuf::from("/other/Inbox/2023-11"));
    }

    #[test]
    fn test_explicit_destination_bypasses_tree() {
        let s = TransferSettings {
            remove_path: vec!["Projects".to_string()],
            ..settings("/other", "Inbox", true)
        };
        let resolver = PathResolver::new(&s, Some(Path::new("/elsewhere/Chosen/")), None);
        let resolved = resolver.destination_for(&NoteRef::new("Projects/Sub/b.md")).unwrap();
        assert_eq!(resolved.file, PathBuf::from("/elsewhere/Chosen/b.md"));
        assert!(!resolver.creates_directories());
    }
}
