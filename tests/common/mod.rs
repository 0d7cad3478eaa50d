//! Shared test fixtures and utilities for integration tests.
//!
//! # Fixtures
//!
//! - `javadoc_dir`: a temp directory laid out like javadoc output, holding the
//!   package, type, member and tag search indexes of a small imaging library
//! - `loaded_state`: a [`LookupState`] with `javadoc_dir` already loaded
//!
//! # Shared Infrastructure
//!
//! [`TempWorkspace`] provides a reusable temp directory abstraction for any test
//! that needs filesystem isolation.

use docsearch::LookupConfig;
use docsearch::state::LookupState;
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

#[allow(dead_code)]
pub const PACKAGE_INDEX: &str = r#"packageSearchIndex = [{"l":"All Packages","url":"allpackages-index.html"},{"l":"imagingbook.common.corners"},{"l":"imagingbook.common.edges"},{"l":"imagingbook.common.graph"},{"l":"imagingbook.common.geometry.fitting"}];updateSearchResults();"#;

#[allow(dead_code)]
pub const TYPE_INDEX: &str = r#"typeSearchIndex = [{"l":"All Classes and Interfaces","url":"allclasses-index.html"},{"p":"imagingbook.common.geometry.fitting","l":"AffineFit2D"},{"p":"imagingbook.common.corners","l":"GradientCornerDetector"},{"p":"imagingbook.common.edges","l":"GrayscaleEdgeDetector"},{"p":"imagingbook.common.graph","l":"Graph"},{"p":"imagingbook.common.corners","l":"HarrisCornerDetector"},{"p":"imagingbook.common.corners","l":"HarrisCornerDetector.Parameters"}];updateSearchResults();"#;

/// The last entry has an owner but no package and gets dropped.
#[allow(dead_code)]
pub const MEMBER_INDEX: &str = r#"memberSearchIndex = [{"p":"imagingbook.common.corners","c":"GradientCornerDetector","l":"getCorners()"},{"p":"imagingbook.common.graph","c":"Graph","l":"addEdge(int, int)","u":"addEdge(int,int)"},{"p":"imagingbook.common.corners","c":"HarrisCornerDetector.Parameters","l":"alpha"},{"c":"Orphan","l":"broken()"}];updateSearchResults();"#;

#[allow(dead_code)]
pub const TAG_INDEX: &str = r#"tagSearchIndex = [{"l":"Constant Field Values","h":"","u":"constant-values.html"}];updateSearchResults();"#;

/// Symbols that survive normalization across all four fixture files.
#[allow(dead_code)]
pub const FIXTURE_SYMBOLS: usize = 5 + 7 + 3 + 1;

/// A temporary workspace directory for test isolation.
///
/// Provides basic filesystem operations within a temp directory that is
/// automatically cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Writes the four fixture search indexes under `dir`.
    pub fn create_javadoc(&self, dir: &str) {
        self.create_file(&format!("{}/package-search-index.js", dir), PACKAGE_INDEX);
        self.create_file(&format!("{}/type-search-index.js", dir), TYPE_INDEX);
        self.create_file(&format!("{}/member-search-index.js", dir), MEMBER_INDEX);
        self.create_file(&format!("{}/tag-search-index.js", dir), TAG_INDEX);
        self.create_file(&format!("{}/index.html", dir), "<html></html>");
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A javadoc output directory plus the lookup state it was loaded into.
///
/// Keep the whole struct alive for the test: dropping it removes the files.
#[allow(dead_code)] // Fields used across different integration test crates
pub struct LoadedJavadoc {
    pub workspace: TempWorkspace,
    pub state: Arc<LookupState>,
}

#[allow(dead_code)]
impl LoadedJavadoc {
    pub fn docs_dir(&self) -> PathBuf {
        self.workspace.path().join("apidocs")
    }
}

/// Creates a workspace with the fixture indexes under `apidocs/`.
#[allow(dead_code)]
#[fixture]
pub fn javadoc_dir() -> TempWorkspace {
    let workspace = TempWorkspace::new();
    workspace.create_javadoc("apidocs");
    workspace
}

/// Creates a lookup state with the fixture indexes loaded.
///
/// Requires a multi-threaded runtime since loading is awaited synchronously.
#[allow(dead_code)]
#[fixture]
pub fn loaded_state(javadoc_dir: TempWorkspace) -> LoadedJavadoc {
    let state = Arc::new(LookupState::new(LookupConfig::default()));
    let docs = javadoc_dir.path().join("apidocs");

    tokio::task::block_in_place(|| {
        tokio::runtime::Handle::current().block_on(async {
            state.load(vec![docs]).await.expect("fixture index loads");
        });
    });

    LoadedJavadoc {
        workspace: javadoc_dir,
        state,
    }
}
