//! Reader for javadoc search-index files.
//!
//! Javadoc writes one script per category, each assigning a JSON array to a
//! global variable:
//!
//! ```text
//! typeSearchIndex = [{"p":"imagingbook.common.math","l":"Arithmetic"},{"l":"All Classes","url":"allclasses-index.html"}];updateSearchResults();
//! ```
//!
//! The variable name tells us which category the entries came from. Bare JSON
//! arrays are accepted as well and carry no category hint.

use crate::error::LoadError;
use crate::record::{Category, RawEntry};
use ignore::WalkBuilder;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(?:var|let|const)\s+)?([A-Za-z_$][\w$]*)\s*=\s*\[")
        .expect("assignment pattern is valid")
});

/// Entries read from one search-index file.
#[derive(Debug, Clone)]
pub struct IndexFile {
    pub path: PathBuf,
    /// Category implied by the script's variable name.
    pub hint: Option<Category>,
    pub entries: Vec<RawEntry>,
}

/// Maps a javadoc index variable to the category of its entries.
pub fn hint_for_variable(name: &str) -> Option<Category> {
    match name {
        "packageSearchIndex" => Some(Category::Package),
        "typeSearchIndex" => Some(Category::Type),
        "memberSearchIndex" => Some(Category::Member),
        "tagSearchIndex" => Some(Category::Tag),
        _ => None,
    }
}

/// Parses the contents of a search-index script or JSON array.
///
/// Every entry gets the file's category hint and a resolved link target.
/// Only syntactically invalid JSON fails the file; an element that is not a
/// usable entry is kept as an empty entry for the index builder to reject.
pub fn parse_search_index(text: &str, path: &Path) -> Result<IndexFile, LoadError> {
    let missing = || LoadError::MissingArray {
        path: path.to_path_buf(),
    };

    let (hint, start) = if text.trim_start().starts_with('[') {
        (None, text.find('[').ok_or_else(missing)?)
    } else {
        let captures = ASSIGNMENT.captures(text).ok_or_else(missing)?;
        let whole = captures.get(0).ok_or_else(missing)?;
        (hint_for_variable(&captures[1]), whole.end() - 1)
    };
    let end = text.rfind(']').filter(|&end| end > start).ok_or_else(missing)?;

    let values: Vec<serde_json::Value> =
        serde_json::from_str(&text[start..=end]).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    // An unreadable entry becomes an unlabeled one so the normalizer drops and counts it
    let mut entries: Vec<RawEntry> = values
        .into_iter()
        .map(|value| {
            RawEntry::deserialize(value).unwrap_or_else(|e| {
                tracing::debug!("Unreadable entry in {}: {}", path.display(), e);
                RawEntry::default()
            })
        })
        .collect();

    for entry in &mut entries {
        entry.source_hint = hint;
        entry.target = resolve_target(entry);
    }

    Ok(IndexFile {
        path: path.to_path_buf(),
        hint,
        entries,
    })
}

/// Computes the page link for an entry the way the javadoc search script does.
///
/// Members link to `pkg/dir/Owner.html#anchor`, where the anchor is the entry's
/// `url` field or else its label. Other entries keep an explicit `url`, and
/// otherwise link to their class page or package summary. A module name, when
/// present, is prepended as a directory.
pub fn resolve_target(entry: &RawEntry) -> Option<String> {
    let label = present(entry.label.as_deref())?;
    let prefix = present(entry.module.as_deref())
        .map(|module| format!("{}/", module))
        .unwrap_or_default();
    let package_dir = present(entry.package.as_deref()).map(|p| p.replace('.', "/"));
    let explicit = present(entry.target.as_deref());

    match (package_dir, present(entry.owner.as_deref())) {
        (Some(dir), Some(owner)) => {
            let anchor = explicit.unwrap_or(label);
            Some(format!("{}{}/{}.html#{}", prefix, dir, owner, anchor))
        }
        _ if explicit.is_some() => explicit.map(str::to_string),
        (Some(dir), None) => Some(format!("{}{}/{}.html", prefix, dir, label)),
        (None, None)
            if entry.source_hint == Some(Category::Package)
                && !label.chars().any(char::is_whitespace) =>
        {
            Some(format!("{}{}/package-summary.html", prefix, label.replace('.', "/")))
        }
        _ => None,
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Reads and parses a single search-index file.
pub fn load_file(path: &Path) -> Result<IndexFile, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = parse_search_index(&text, path)?;
    tracing::debug!(
        "Read {} entries from {} ({})",
        file.entries.len(),
        path.display(),
        file.hint.map_or("no category hint", Category::as_str)
    );
    Ok(file)
}

/// Whether a file name looks like a search-index file.
pub fn is_search_index_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with("search-index.js") || name.ends_with("search-index.json"))
}

/// Finds every search-index file below `dir`, in sorted path order.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut paths = Vec::new();
    for entry in WalkBuilder::new(dir).hidden(false).build() {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_some_and(|t| t.is_file()) && is_search_index_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Loads entries from a mix of search-index files and documentation
/// directories, in the order given.
pub fn load_paths(paths: &[PathBuf]) -> Result<Vec<RawEntry>, LoadError> {
    let start = std::time::Instant::now();
    let mut entries = Vec::new();
    let mut files = 0;

    for path in paths {
        let targets = if path.is_dir() {
            discover(path)?
        } else {
            vec![path.clone()]
        };
        for target in targets {
            entries.extend(load_file(&target)?.entries);
            files += 1;
        }
    }

    tracing::info!(
        "Loaded {} search-index entries from {} files in {:?}",
        entries.len(),
        files,
        start.elapsed()
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    fn parse(text: &str) -> IndexFile {
        parse_search_index(text, Path::new("test.js")).expect("parses")
    }

    #[test]
    fn test_type_index_script() {
        let file = parse(
            r#"typeSearchIndex = [{"p":"imagingbook.common.math","l":"Arithmetic"},{"l":"All Classes","url":"allclasses-index.html"}];updateSearchResults();"#,
        );
        check!(file.hint == Some(Category::Type));
        check!(file.entries.len() == 2);
        check!(file.entries[0].target.as_deref() == Some("imagingbook/common/math/Arithmetic.html"));
        check!(file.entries[1].target.as_deref() == Some("allclasses-index.html"));
    }

    #[test]
    fn test_member_anchor_from_url_or_label() {
        let file = parse(
            r#"memberSearchIndex = [{"p":"imagingbook.spectral.dft","c":"Dft1d.Double","l":"checkSize(double[], double[])","url":"checkSize(double[],double[])"},{"p":"imagingbook.spectral.dft","c":"ScalingMode","l":"DEFAULT"}]"#,
        );
        check!(file.hint == Some(Category::Member));
        check!(
            file.entries[0].target.as_deref()
                == Some("imagingbook/spectral/dft/Dft1d.Double.html#checkSize(double[],double[])")
        );
        check!(
            file.entries[1].target.as_deref()
                == Some("imagingbook/spectral/dft/ScalingMode.html#DEFAULT")
        );
    }

    #[test]
    fn test_package_index_summary_links() {
        let file = parse(
            r#"packageSearchIndex = [{"l":"All Packages","url":"allpackages-index.html"},{"l":"imagingbook.common.color"}];"#,
        );
        check!(file.entries[0].target.as_deref() == Some("allpackages-index.html"));
        check!(
            file.entries[1].target.as_deref()
                == Some("imagingbook/common/color/package-summary.html")
        );
        check!(file.entries[1].source_hint == Some(Category::Package));
    }

    #[test]
    fn test_module_prefix() {
        let file = parse(r#"typeSearchIndex = [{"m":"imagingbook.core","p":"a.b","l":"Thing"}]"#);
        check!(file.entries[0].target.as_deref() == Some("imagingbook.core/a/b/Thing.html"));
    }

    #[test]
    fn test_bare_json_array() {
        let file = parse(r#" [{"p":"a","l":"Graph","u":"graph.html"}] "#);
        check!(file.hint == None);
        check!(file.entries[0].target.as_deref() == Some("graph.html"));
    }

    #[test]
    fn test_missing_label_kept_for_normalizer() {
        let file = parse(r#"typeSearchIndex = [{"p":"a"}]"#);
        check!(file.entries.len() == 1);
        check!(file.entries[0].target == None);
    }

    #[rstest]
    #[case("typeSearchIndex = {};")]
    #[case("no array here")]
    #[case("")]
    fn test_missing_array(#[case] text: &str) {
        let_assert!(Err(LoadError::MissingArray { .. }) = parse_search_index(text, Path::new("x.js")));
    }

    #[test]
    fn test_wrong_typed_entry_kept_as_empty() {
        let file = parse(r#"typeSearchIndex = [{"p":"a","l":"Graph"},{"p":"a","l":42},7,{"p":"a","l":"Tree"}]"#);
        check!(file.entries.len() == 4);
        check!(file.entries[0].label.as_deref() == Some("Graph"));
        check!(file.entries[1].label == None);
        check!(file.entries[2] == RawEntry { source_hint: Some(Category::Type), ..RawEntry::default() });
        check!(file.entries[3].target.as_deref() == Some("a/Tree.html"));
    }

    #[test]
    fn test_malformed_json() {
        let_assert!(
            Err(LoadError::Parse { .. }) =
                parse_search_index("typeSearchIndex = [{\"l\": }]", Path::new("x.js"))
        );
    }

    #[rstest]
    #[case("packageSearchIndex", Some(Category::Package))]
    #[case("tagSearchIndex", Some(Category::Tag))]
    #[case("moduleSearchIndex", None)]
    fn test_hint_for_variable(#[case] name: &str, #[case] expected: Option<Category>) {
        check!(hint_for_variable(name) == expected);
    }

    #[test]
    fn test_discover_and_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("type-search-index.js"),
            r#"typeSearchIndex = [{"p":"a","l":"Graph"}];updateSearchResults();"#,
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested/member-search-index.js"),
            r#"memberSearchIndex = [{"p":"a","c":"Graph","l":"size()"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("script.js"), "var x = [1];").unwrap();

        let_assert!(Ok(paths) = discover(dir.path()));
        check!(paths.len() == 2);

        let_assert!(Ok(entries) = load_paths(&[dir.path().to_path_buf()]));
        check!(entries.len() == 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let_assert!(
            Err(LoadError::Io { .. }) = load_paths(&[PathBuf::from("/nonexistent/type-search-index.js")])
        );
    }
}
