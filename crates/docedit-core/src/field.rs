//! Typed field addressing
//!
//! A [`FieldPath`] names exactly one scalar leaf of a page's content. Paths
//! travel across the UI boundary in their dotted string form
//! (`title`, `signatories.dscasc`, `modules.1.topic`, `details.0.value`) and
//! are parsed into this closed set of variants before touching the model.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::DocError;
use crate::schema::{Content, Signatories};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Text(TextField),
    Signatory(SignatoryField),
    Module { index: usize, field: ModuleField },
    Detail { index: usize, field: DetailField },
}

/// Named text leaves. `Title` exists on every content kind, `Note` only on
/// details pages, the rest only on standard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Title,
    Recipient,
    Date,
    Greeting,
    Body,
    ContractIntro,
    Whereas,
    Therefore,
    TrainingTitle,
    TrainingBody,
    CompensationTitle,
    CompensationBody,
    CancellingTitle,
    CancellingBody,
    PublicityTitle,
    PublicityBody,
    ModificationTitle,
    ModificationBody,
    LawTitle,
    LawBody,
    WitnessTitle,
    WitnessBody,
    ProgramOutcome,
    Note,
}

impl TextField {
    /// Standard-page fields in display order
    pub const STANDARD: [TextField; 23] = [
        TextField::Title,
        TextField::Recipient,
        TextField::Date,
        TextField::Greeting,
        TextField::ContractIntro,
        TextField::Whereas,
        TextField::Therefore,
        TextField::TrainingTitle,
        TextField::TrainingBody,
        TextField::CompensationTitle,
        TextField::CompensationBody,
        TextField::CancellingTitle,
        TextField::CancellingBody,
        TextField::PublicityTitle,
        TextField::PublicityBody,
        TextField::ModificationTitle,
        TextField::ModificationBody,
        TextField::LawTitle,
        TextField::LawBody,
        TextField::WitnessTitle,
        TextField::WitnessBody,
        TextField::Body,
        TextField::ProgramOutcome,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TextField::Title => "title",
            TextField::Recipient => "recipient",
            TextField::Date => "date",
            TextField::Greeting => "greeting",
            TextField::Body => "body",
            TextField::ContractIntro => "contractIntro",
            TextField::Whereas => "whereas",
            TextField::Therefore => "therefore",
            TextField::TrainingTitle => "trainingTitle",
            TextField::TrainingBody => "trainingBody",
            TextField::CompensationTitle => "compensationTitle",
            TextField::CompensationBody => "compensationBody",
            TextField::CancellingTitle => "cancellingTitle",
            TextField::CancellingBody => "cancellingBody",
            TextField::PublicityTitle => "publicityTitle",
            TextField::PublicityBody => "publicityBody",
            TextField::ModificationTitle => "modificationTitle",
            TextField::ModificationBody => "modificationBody",
            TextField::LawTitle => "lawTitle",
            TextField::LawBody => "lawBody",
            TextField::WitnessTitle => "witnessTitle",
            TextField::WitnessBody => "witnessBody",
            TextField::ProgramOutcome => "programOutcome",
            TextField::Note => "note",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        if key == "note" {
            return Some(TextField::Note);
        }
        TextField::STANDARD
            .iter()
            .copied()
            .find(|field| field.key() == key)
    }

    /// Section headings inside standard pages (`*Title` fields other than the page title)
    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            TextField::TrainingTitle
                | TextField::CompensationTitle
                | TextField::CancellingTitle
                | TextField::PublicityTitle
                | TextField::ModificationTitle
                | TextField::LawTitle
                | TextField::WitnessTitle
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatoryField {
    Swipegen,
    Dscasc,
}

impl SignatoryField {
    pub fn key(&self) -> &'static str {
        match self {
            SignatoryField::Swipegen => "swipegen",
            SignatoryField::Dscasc => "dscasc",
        }
    }

    fn of<'a>(&self, signatories: &'a Signatories) -> &'a String {
        match self {
            SignatoryField::Swipegen => &signatories.swipegen,
            SignatoryField::Dscasc => &signatories.dscasc,
        }
    }

    fn of_mut<'a>(&self, signatories: &'a mut Signatories) -> &'a mut String {
        match self {
            SignatoryField::Swipegen => &mut signatories.swipegen,
            SignatoryField::Dscasc => &mut signatories.dscasc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleField {
    Number,
    Topic,
    Duration,
    Type,
    Description,
}

impl ModuleField {
    pub fn key(&self) -> &'static str {
        match self {
            ModuleField::Number => "number",
            ModuleField::Topic => "topic",
            ModuleField::Duration => "duration",
            ModuleField::Type => "type",
            ModuleField::Description => "description",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "number" => Some(ModuleField::Number),
            "topic" => Some(ModuleField::Topic),
            "duration" => Some(ModuleField::Duration),
            "type" => Some(ModuleField::Type),
            "description" => Some(ModuleField::Description),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Attribute,
    Value,
}

impl DetailField {
    pub fn key(&self) -> &'static str {
        match self {
            DetailField::Attribute => "attribute",
            DetailField::Value => "value",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "attribute" => Some(DetailField::Attribute),
            "value" => Some(DetailField::Value),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Text(field) => f.write_str(field.key()),
            FieldPath::Signatory(field) => write!(f, "signatories.{}", field.key()),
            FieldPath::Module { index, field } => write!(f, "modules.{}.{}", index, field.key()),
            FieldPath::Detail { index, field } => write!(f, "details.{}.{}", index, field.key()),
        }
    }
}

impl FromStr for FieldPath {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let not_found = || DocError::PathNotFound(s.to_string());
        let segments: Vec<&str> = s.split('.').collect();

        match segments.as_slice() {
            [key] => TextField::from_key(key)
                .map(FieldPath::Text)
                .ok_or_else(not_found),
            ["signatories", "swipegen"] => Ok(FieldPath::Signatory(SignatoryField::Swipegen)),
            ["signatories", "dscasc"] => Ok(FieldPath::Signatory(SignatoryField::Dscasc)),
            ["modules", index, key] => {
                let index = parse_index(index).ok_or_else(not_found)?;
                let field = ModuleField::from_key(key).ok_or_else(not_found)?;
                Ok(FieldPath::Module { index, field })
            }
            ["details", index, key] => {
                let index = parse_index(index).ok_or_else(not_found)?;
                let field = DetailField::from_key(key).ok_or_else(not_found)?;
                Ok(FieldPath::Detail { index, field })
            }
            _ => Err(not_found()),
        }
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Table indices are plain decimal digits (`usize::from_str` would also take `+1`)
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// A scalar leaf value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(u32),
    Number(f64),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Why a write could not be applied to a leaf
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AssignError {
    Unresolved,
    Invalid(String),
}

impl Content {
    /// Read a leaf. `None` when the path names no populated leaf of this content.
    pub fn get(&self, path: &FieldPath) -> Option<FieldValue> {
        match (self, path) {
            (Content::Standard(c), FieldPath::Text(field)) => {
                c.text(*field).map(|text| FieldValue::Text(text.to_string()))
            }
            (Content::Standard(c), FieldPath::Signatory(field)) => c
                .signatories
                .as_ref()
                .map(|s| FieldValue::Text(field.of(s).clone())),
            (Content::Modules(c), FieldPath::Text(TextField::Title)) => {
                Some(FieldValue::Text(c.title.clone()))
            }
            (Content::Modules(c), FieldPath::Module { index, field }) => {
                let module = c.modules.get(*index)?;
                Some(match field {
                    ModuleField::Number => FieldValue::Integer(module.number),
                    ModuleField::Topic => FieldValue::Text(module.topic.clone()),
                    ModuleField::Duration => FieldValue::Number(module.duration),
                    ModuleField::Type => FieldValue::Text(module.kind.label().to_string()),
                    ModuleField::Description => FieldValue::Text(module.description.clone()),
                })
            }
            (Content::Details(c), FieldPath::Text(TextField::Title)) => {
                Some(FieldValue::Text(c.title.clone()))
            }
            (Content::Details(c), FieldPath::Text(TextField::Note)) => {
                c.note.clone().map(FieldValue::Text)
            }
            (Content::Details(c), FieldPath::Detail { index, field }) => {
                let detail = c.details.get(*index)?;
                Some(FieldValue::Text(match field {
                    DetailField::Attribute => detail.attribute.clone(),
                    DetailField::Value => detail.value.clone(),
                }))
            }
            _ => None,
        }
    }

    /// Replace a leaf from its text form.
    ///
    /// Optional standard fields, signatories and a details note are part of
    /// their layout's schema even when absent, so writing one populates it.
    pub(crate) fn assign(&mut self, path: &FieldPath, raw: &str) -> Result<(), AssignError> {
        match (self, path) {
            (Content::Standard(c), FieldPath::Text(field)) => {
                let slot = c.text_slot_mut(*field).ok_or(AssignError::Unresolved)?;
                *slot = Some(raw.to_string());
            }
            (Content::Standard(c), FieldPath::Signatory(field)) => {
                let signatories = c.signatories.get_or_insert_with(Signatories::default);
                *field.of_mut(signatories) = raw.to_string();
            }
            (Content::Modules(c), FieldPath::Text(TextField::Title)) => {
                c.title = raw.to_string();
            }
            (Content::Modules(c), FieldPath::Module { index, field }) => {
                let module = c.modules.get_mut(*index).ok_or(AssignError::Unresolved)?;
                match field {
                    ModuleField::Number => {
                        module.number = raw.trim().parse().map_err(|_| {
                            AssignError::Invalid("module number must be a whole number".into())
                        })?;
                    }
                    ModuleField::Topic => module.topic = raw.to_string(),
                    ModuleField::Duration => {
                        let hours: f64 = raw.trim().parse().map_err(|_| {
                            AssignError::Invalid("duration must be a number of hours".into())
                        })?;
                        if !hours.is_finite() || hours < 0.0 {
                            return Err(AssignError::Invalid(
                                "duration must be a non-negative number of hours".into(),
                            ));
                        }
                        module.duration = hours;
                    }
                    ModuleField::Type => {
                        module.kind = raw.parse().map_err(AssignError::Invalid)?;
                    }
                    ModuleField::Description => module.description = raw.to_string(),
                }
            }
            (Content::Details(c), FieldPath::Text(TextField::Title)) => {
                c.title = raw.to_string();
            }
            (Content::Details(c), FieldPath::Text(TextField::Note)) => {
                c.note = Some(raw.to_string());
            }
            (Content::Details(c), FieldPath::Detail { index, field }) => {
                let detail = c.details.get_mut(*index).ok_or(AssignError::Unresolved)?;
                match field {
                    DetailField::Attribute => detail.attribute = raw.to_string(),
                    DetailField::Value => detail.value = raw.to_string(),
                }
            }
            _ => return Err(AssignError::Unresolved),
        }
        Ok(())
    }
}
