//! Editor configuration
//!
//! Loaded from TOML. Every section is optional; an empty file yields the
//! defaults, which reproduce the training-proposal editor: pages 2 and 3
//! locked, A4 output, a twelve-page canned document and `-edited` exports.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::locks::LockPolicy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub locks: LocksConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl EditorConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use docedit_core::config::EditorConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = EditorConfig::from_str(r#"
    ///     [locks]
    ///     locked_pages = [0]
    /// "#)?;
    /// assert!(config.lock_policy().is_content_locked(0));
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.document.page_count > 0,
            "document.page_count must be at least 1"
        );
        Ok(())
    }

    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy::with_locked_pages(self.locks.locked_pages.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocksConfig {
    /// Zero-based positions of pages whose whole content area is locked
    #[serde(default = "default_locked_pages")]
    pub locked_pages: BTreeSet<usize>,
}

impl Default for LocksConfig {
    fn default() -> Self {
        Self {
            locked_pages: default_locked_pages(),
        }
    }
}

fn default_locked_pages() -> BTreeSet<usize> {
    [1, 2].into_iter().collect()
}

/// Output page geometry and typography, in PDF points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_page_width")]
    pub page_width: f32,
    #[serde(default = "default_page_height")]
    pub page_height: f32,
    #[serde(default = "default_margin")]
    pub margin_top: f32,
    #[serde(default = "default_margin")]
    pub margin_left: f32,
    #[serde(default = "default_title_size")]
    pub title_size: f32,
    #[serde(default = "default_heading_size")]
    pub heading_size: f32,
    #[serde(default = "default_body_size")]
    pub body_size: f32,
    #[serde(default = "default_label_size")]
    pub label_size: f32,
    /// Line height as a multiple of font size
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: default_page_width(),
            page_height: default_page_height(),
            margin_top: default_margin(),
            margin_left: default_margin(),
            title_size: default_title_size(),
            heading_size: default_heading_size(),
            body_size: default_body_size(),
            label_size: default_label_size(),
            line_spacing: default_line_spacing(),
        }
    }
}

fn default_page_width() -> f32 {
    595.0
}

fn default_page_height() -> f32 {
    842.0
}

fn default_margin() -> f32 {
    50.0
}

fn default_title_size() -> f32 {
    18.0
}

fn default_heading_size() -> f32 {
    14.0
}

fn default_body_size() -> f32 {
    11.0
}

fn default_label_size() -> f32 {
    12.0
}

fn default_line_spacing() -> f32 {
    1.5
}

/// How uploaded bytes are turned into page content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Fixed demo content keyed by page number
    #[default]
    Canned,
    /// Text extracted from the PDF with lopdf
    PdfText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default)]
    pub extractor: ExtractorKind,
    /// Pages produced by the canned content generator
    #[serde(default = "default_page_count")]
    pub page_count: usize,
    #[serde(default = "default_accepted_types")]
    pub accepted_types: Vec<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            extractor: ExtractorKind::default(),
            page_count: default_page_count(),
            accepted_types: default_accepted_types(),
        }
    }
}

fn default_page_count() -> usize {
    12
}

fn default_accepted_types() -> Vec<String> {
    vec!["application/pdf".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_edited_suffix")]
    pub edited_suffix: String,
    #[serde(default = "default_producer")]
    pub producer: String,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            edited_suffix: default_edited_suffix(),
            producer: default_producer(),
            title: default_title(),
        }
    }
}

fn default_edited_suffix() -> String {
    "-edited".to_string()
}

fn default_producer() -> String {
    "docedit".to_string()
}

fn default_title() -> String {
    "Edited Document".to_string()
}
