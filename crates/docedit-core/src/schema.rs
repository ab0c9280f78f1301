//! Page content schema
//!
//! A page holds exactly one of three content layouts. The layout is decided
//! by which fields are present: a `modules` table, a `details` table, or
//! neither (free-form standard text fields).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::field::{DetailField, FieldPath, ModuleField, SignatoryField, TextField};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Content {
    Modules(ModulesContent),
    Details(DetailsContent),
    Standard(StandardContent),
}

/// The layout is picked by key presence, so a broken table reports its own
/// error instead of degrading to a standard page.
impl<'de> Deserialize<'de> for Content {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let has = |key: &str| value.get(key).is_some();

        if has("modules") {
            serde_json::from_value(value)
                .map(Content::Modules)
                .map_err(|e| D::Error::custom(format!("invalid modules page: {}", e)))
        } else if has("details") {
            serde_json::from_value(value)
                .map(Content::Details)
                .map_err(|e| D::Error::custom(format!("invalid details page: {}", e)))
        } else {
            serde_json::from_value(value)
                .map(Content::Standard)
                .map_err(D::Error::custom)
        }
    }
}

/// Free-form text fields. Any subset may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StandardContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whereas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub therefore: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compensation_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compensation_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelling_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelling_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publicity_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publicity_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modification_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modification_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatories: Option<Signatories>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Signatories {
    #[serde(default)]
    pub swipegen: String,
    #[serde(default)]
    pub dscasc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModulesContent {
    pub title: String,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Module {
    pub number: u32,
    pub topic: String,
    /// Hours, may be fractional
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: ModuleType,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModuleType {
    Theory,
    #[serde(rename = "Hands-On")]
    HandsOn,
    #[serde(rename = "Theory + Demo")]
    TheoryDemo,
    #[serde(rename = "Project-Based")]
    ProjectBased,
}

impl ModuleType {
    pub const ALL: [ModuleType; 4] = [
        ModuleType::Theory,
        ModuleType::HandsOn,
        ModuleType::TheoryDemo,
        ModuleType::ProjectBased,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ModuleType::Theory => "Theory",
            ModuleType::HandsOn => "Hands-On",
            ModuleType::TheoryDemo => "Theory + Demo",
            ModuleType::ProjectBased => "Project-Based",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ModuleType::ALL
            .iter()
            .copied()
            .find(|kind| kind.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                format!(
                    "expected one of Theory, Hands-On, Theory + Demo, Project-Based (got {:?})",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailsContent {
    pub title: String,
    pub details: Vec<Detail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Detail {
    pub attribute: String,
    pub value: String,
}

/// Content layout discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Standard,
    Modules,
    Details,
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Standard(_) => ContentKind::Standard,
            Content::Modules(_) => ContentKind::Modules,
            Content::Details(_) => ContentKind::Details,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Content::Standard(c) => c.title.as_deref(),
            Content::Modules(c) => Some(&c.title),
            Content::Details(c) => Some(&c.title),
        }
    }

    /// Populated leaves in display order; the fields a UI renders as clickable.
    pub fn field_paths(&self) -> Vec<FieldPath> {
        match self {
            Content::Standard(c) => {
                let mut paths: Vec<FieldPath> = TextField::STANDARD
                    .iter()
                    .filter(|field| c.text(**field).is_some())
                    .map(|field| FieldPath::Text(*field))
                    .collect();
                if c.signatories.is_some() {
                    paths.push(FieldPath::Signatory(SignatoryField::Swipegen));
                    paths.push(FieldPath::Signatory(SignatoryField::Dscasc));
                }
                paths
            }
            Content::Modules(c) => {
                let mut paths = vec![FieldPath::Text(TextField::Title)];
                for index in 0..c.modules.len() {
                    for field in [
                        ModuleField::Number,
                        ModuleField::Topic,
                        ModuleField::Duration,
                        ModuleField::Type,
                        ModuleField::Description,
                    ] {
                        paths.push(FieldPath::Module { index, field });
                    }
                }
                paths
            }
            Content::Details(c) => {
                let mut paths = vec![FieldPath::Text(TextField::Title)];
                for index in 0..c.details.len() {
                    paths.push(FieldPath::Detail {
                        index,
                        field: DetailField::Attribute,
                    });
                    paths.push(FieldPath::Detail {
                        index,
                        field: DetailField::Value,
                    });
                }
                if c.note.is_some() {
                    paths.push(FieldPath::Text(TextField::Note));
                }
                paths
            }
        }
    }
}

impl StandardContent {
    pub fn text(&self, field: TextField) -> Option<&str> {
        let slot = match field {
            TextField::Title => &self.title,
            TextField::Recipient => &self.recipient,
            TextField::Date => &self.date,
            TextField::Greeting => &self.greeting,
            TextField::Body => &self.body,
            TextField::ContractIntro => &self.contract_intro,
            TextField::Whereas => &self.whereas,
            TextField::Therefore => &self.therefore,
            TextField::TrainingTitle => &self.training_title,
            TextField::TrainingBody => &self.training_body,
            TextField::CompensationTitle => &self.compensation_title,
            TextField::CompensationBody => &self.compensation_body,
            TextField::CancellingTitle => &self.cancelling_title,
            TextField::CancellingBody => &self.cancelling_body,
            TextField::PublicityTitle => &self.publicity_title,
            TextField::PublicityBody => &self.publicity_body,
            TextField::ModificationTitle => &self.modification_title,
            TextField::ModificationBody => &self.modification_body,
            TextField::LawTitle => &self.law_title,
            TextField::LawBody => &self.law_body,
            TextField::WitnessTitle => &self.witness_title,
            TextField::WitnessBody => &self.witness_body,
            TextField::ProgramOutcome => &self.program_outcome,
            TextField::Note => return None,
        };
        slot.as_deref()
    }

    pub(crate) fn text_slot_mut(&mut self, field: TextField) -> Option<&mut Option<String>> {
        let slot = match field {
            TextField::Title => &mut self.title,
            TextField::Recipient => &mut self.recipient,
            TextField::Date => &mut self.date,
            TextField::Greeting => &mut self.greeting,
            TextField::Body => &mut self.body,
            TextField::ContractIntro => &mut self.contract_intro,
            TextField::Whereas => &mut self.whereas,
            TextField::Therefore => &mut self.therefore,
            TextField::TrainingTitle => &mut self.training_title,
            TextField::TrainingBody => &mut self.training_body,
            TextField::CompensationTitle => &mut self.compensation_title,
            TextField::CompensationBody => &mut self.compensation_body,
            TextField::CancellingTitle => &mut self.cancelling_title,
            TextField::CancellingBody => &mut self.cancelling_body,
            TextField::PublicityTitle => &mut self.publicity_title,
            TextField::PublicityBody => &mut self.publicity_body,
            TextField::ModificationTitle => &mut self.modification_title,
            TextField::ModificationBody => &mut self.modification_body,
            TextField::LawTitle => &mut self.law_title,
            TextField::LawBody => &mut self.law_body,
            TextField::WitnessTitle => &mut self.witness_title,
            TextField::WitnessBody => &mut self.witness_body,
            TextField::ProgramOutcome => &mut self.program_outcome,
            TextField::Note => return None,
        };
        Some(slot)
    }
}
