//! Symbol records and the normalizer that produces them from raw entries.
//!
//! A [`RawEntry`] is whatever the documentation generator emitted: a label and
//! any subset of package, owner and link fields. [`normalize`] turns it into a
//! [`SymbolRecord`] whose category is a closed [`SymbolKind`] variant carrying
//! exactly the fields that category requires.

use crate::search::tokenize::{normalize_text, segment_initials};
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::fmt;

/// DO NOT add doc comments to individual variants - this causes schemars to generate
/// `oneOf` schemas instead of simple `enum` arrays, breaking MCP client enum handling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Package,
    Type,
    Member,
    Tag,
}

impl Category {
    /// All categories in ranking priority order.
    pub const BY_PRIORITY: [Self; 4] = [Self::Type, Self::Member, Self::Package, Self::Tag];

    /// Tie-break priority used by the index sort and the ranker; lower wins.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Type => 0,
            Self::Member => 1,
            Self::Package => 2,
            Self::Tag => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Type => "type",
            Self::Member => "member",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque link target handed back on selection. Never parsed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetRef(String);

impl TargetRef {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry as emitted by the documentation generator.
///
/// Field names follow the javadoc search-index short keys so index files
/// deserialize directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(rename = "l", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Dotted package name.
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Enclosing type of a member.
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Link target, or for members only the anchor part of it.
    #[serde(
        rename = "url",
        alias = "u",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target: Option<String>,
    /// Java module name, used only for link resolution.
    #[serde(rename = "m", default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Category implied by the file the entry came from.
    #[serde(skip)]
    pub source_hint: Option<Category>,
}

impl RawEntry {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_hint(mut self, hint: Category) -> Self {
        self.source_hint = Some(hint);
        self
    }
}

/// Category plus the fields that category requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Package { path: Vec<String> },
    Type { package: Vec<String> },
    Member { package: Vec<String>, owner: String },
    Tag,
}

impl SymbolKind {
    pub const fn category(&self) -> Category {
        match self {
            Self::Package { .. } => Category::Package,
            Self::Type { .. } => Category::Type,
            Self::Member { .. } => Category::Member,
            Self::Tag => Category::Tag,
        }
    }

    pub fn package_path(&self) -> &[String] {
        match self {
            Self::Package { path } => path,
            Self::Type { package } | Self::Member { package, .. } => package,
            Self::Tag => &[],
        }
    }

    pub fn owner_name(&self) -> Option<&str> {
        match self {
            Self::Member { owner, .. } => Some(owner),
            _ => None,
        }
    }
}

/// A normalized, immutable symbol.
///
/// The search key and segment initials are derived from the label in the
/// constructor and there is no way to change one without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    kind: SymbolKind,
    label: String,
    target: Option<TargetRef>,
    search_key: String,
    initials: String,
}

impl SymbolRecord {
    /// Returns `None` when the label is blank.
    pub fn new(
        kind: SymbolKind,
        label: impl Into<String>,
        target: Option<TargetRef>,
    ) -> Option<Self> {
        let label = label.into();
        let search_key = normalize_text(&label);
        if search_key.is_empty() {
            return None;
        }
        let initials = segment_initials(&label);
        Some(Self {
            kind,
            label,
            target,
            search_key,
            initials,
        })
    }

    pub const fn kind(&self) -> &SymbolKind {
        &self.kind
    }

    pub const fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn package_path(&self) -> &[String] {
        self.kind.package_path()
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.kind.owner_name()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub const fn target(&self) -> Option<&TargetRef> {
        self.target.as_ref()
    }

    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    /// Lower-cased first letters of the label's name segments.
    pub fn initials(&self) -> &str {
        &self.initials
    }

    /// Number of name segments in the label.
    pub fn segment_count(&self) -> usize {
        self.initials.chars().count()
    }

    /// Dotted package name, e.g. `imagingbook.common.math`.
    pub fn package_name(&self) -> String {
        self.package_path().join(".")
    }

    /// Fully qualified display path: `package.Owner.label`.
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<&str> = match &self.kind {
            // The package label already is the dotted path
            SymbolKind::Package { .. } => return self.label.clone(),
            _ => self.package_path().iter().map(String::as_str).collect(),
        };
        if let Some(owner) = self.owner_name() {
            parts.push(owner);
        }
        parts.push(&self.label);
        parts.join(".")
    }
}

/// Output-boundary view of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolView {
    pub category: Category,
    pub package_path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_ref: Option<TargetRef>,
}

impl From<&SymbolRecord> for SymbolView {
    fn from(record: &SymbolRecord) -> Self {
        Self {
            category: record.category(),
            package_path: record.package_path().to_vec(),
            owner_name: record.owner_name().map(str::to_string),
            label: record.label.clone(),
            target_ref: record.target.clone(),
        }
    }
}

/// Why a raw entry was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("entry has no usable label")]
    MissingLabel,
    #[error("cannot infer category for '{label}': owner '{owner}' given without a package")]
    OwnerWithoutPackage { label: String, owner: String },
    #[error("member entry '{label}' has no owning type")]
    MemberWithoutOwner { label: String },
}

/// Validates a raw entry and produces its normalized record.
pub fn normalize(raw: &RawEntry) -> Result<SymbolRecord, Rejection> {
    let label = non_blank(raw.label.as_deref()).ok_or(Rejection::MissingLabel)?;
    let package = non_blank(raw.package.as_deref()).map(split_package);
    let owner = non_blank(raw.owner.as_deref());

    let kind = match (package, owner) {
        (Some(package), Some(owner)) => SymbolKind::Member {
            package,
            owner: owner.to_string(),
        },
        (None, Some(owner)) => {
            return Err(Rejection::OwnerWithoutPackage {
                label: label.to_string(),
                owner: owner.to_string(),
            });
        }
        (Some(_), None) if raw.source_hint == Some(Category::Member) => {
            return Err(Rejection::MemberWithoutOwner {
                label: label.to_string(),
            });
        }
        (Some(package), None) => SymbolKind::Type { package },
        // Package names never contain whitespace; "All Packages" is a tag
        (None, None)
            if raw.source_hint == Some(Category::Package)
                && !label.chars().any(char::is_whitespace) =>
        {
            SymbolKind::Package {
                path: split_package(label),
            }
        }
        (None, None) => SymbolKind::Tag,
    };

    let target = non_blank(raw.target.as_deref()).map(TargetRef::new);
    SymbolRecord::new(kind, label, target).ok_or(Rejection::MissingLabel)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn split_package(dotted: &str) -> Vec<String> {
    dotted
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
