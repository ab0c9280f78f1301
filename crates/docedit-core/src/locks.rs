//! Locked regions and the page lock policy
//!
//! Every page carries four fixed geometric regions (header, footer, logo and
//! contact information) that are rendered but never addressable as fields.
//! Whether a page's content area is editable is decided by [`LockPolicy`]
//! alone.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::field::FieldPath;

/// A length relative to the page box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Percent(f32),
    Px(f32),
}

impl Length {
    /// Resolve against a page dimension in points (1px treated as 1pt)
    pub fn resolve(&self, extent: f32) -> f32 {
        match self {
            Length::Percent(p) => extent * p / 100.0,
            Length::Px(px) => *px,
        }
    }
}

/// Rectangle described by offsets from the page edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedAreaSet {
    pub header: Region,
    pub footer: Region,
    pub logo: Region,
    pub contact_info: Region,
}

impl Default for LockedAreaSet {
    fn default() -> Self {
        Self {
            header: Region {
                top: Some(Length::Px(0.0)),
                left: Some(Length::Px(0.0)),
                width: Some(Length::Percent(100.0)),
                height: Some(Length::Percent(15.0)),
                ..Default::default()
            },
            footer: Region {
                top: Some(Length::Percent(85.0)),
                left: Some(Length::Px(0.0)),
                width: Some(Length::Percent(100.0)),
                height: Some(Length::Percent(15.0)),
                ..Default::default()
            },
            logo: Region {
                top: Some(Length::Percent(2.0)),
                right: Some(Length::Percent(5.0)),
                width: Some(Length::Px(120.0)),
                height: Some(Length::Px(60.0)),
                ..Default::default()
            },
            contact_info: Region {
                bottom: Some(Length::Percent(5.0)),
                right: Some(Length::Percent(5.0)),
                width: Some(Length::Px(200.0)),
                height: Some(Length::Px(80.0)),
                ..Default::default()
            },
        }
    }
}

/// Decides which page content may be edited.
///
/// A page listed in `locked_pages` (zero-based) has its whole content area
/// locked; every content field on any other page is editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockPolicy {
    locked_pages: BTreeSet<usize>,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self::with_locked_pages([1, 2])
    }
}

impl LockPolicy {
    /// Policy with every page editable
    pub fn unlocked() -> Self {
        Self {
            locked_pages: BTreeSet::new(),
        }
    }

    pub fn with_locked_pages(pages: impl IntoIterator<Item = usize>) -> Self {
        Self {
            locked_pages: pages.into_iter().collect(),
        }
    }

    pub fn is_content_locked(&self, page_index: usize) -> bool {
        self.locked_pages.contains(&page_index)
    }

    /// No partial-field locking exists, so the path only matters for logging
    pub fn is_editable(&self, page_index: usize, _path: &FieldPath) -> bool {
        !self.is_content_locked(page_index)
    }

    pub fn locked_pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.locked_pages.iter().copied()
    }
}
