//! # Land Cover Class
//!
//! A single class of a land-cover legend: an integer `code` that is unique
//! within its legend, plus display metadata.
//!
//! ## Mutation
//!
//! Classes are values. The public way to merge metadata from another
//! instance is [`LandCoverClass::with_updates`], which returns a copy. The
//! in-place form is crate-private and used only by the legend and
//! transition-matrix upserts, which own the instance being updated.

use serde::{Deserialize, Serialize};
use te_core::{
    translate_opt, validate_color, validate_max_len, Schema, Translate, Translations,
    ValidationError,
};

/// Integer code identifying a class within a legend.
pub type ClassCode = i32;

/// Maximum length of `name_short`, in characters.
pub const NAME_SHORT_MAX: usize = 20;

/// Maximum length of `name_long`, in characters.
pub const NAME_LONG_MAX: usize = 120;

/// A land-cover class.
///
/// Equality is structural over every field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LandCoverClass {
    code: ClassCode,
    name_short: Option<String>,
    name_long: Option<String>,
    description: Option<String>,
    color: Option<String>,
}

#[derive(Deserialize)]
struct ClassRecord {
    code: ClassCode,
    #[serde(default)]
    name_short: Option<String>,
    #[serde(default)]
    name_long: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

impl TryFrom<ClassRecord> for LandCoverClass {
    type Error = ValidationError;

    fn try_from(record: ClassRecord) -> Result<Self, Self::Error> {
        let mut lcc = Self::new(record.code);
        if let Some(s) = record.name_short {
            lcc = lcc.with_name_short(s)?;
        }
        if let Some(s) = record.name_long {
            lcc = lcc.with_name_long(s)?;
        }
        if let Some(s) = record.description {
            lcc = lcc.with_description(s);
        }
        if let Some(s) = record.color {
            lcc = lcc.with_color(s)?;
        }
        Ok(lcc)
    }
}

te_core::impl_validating_deserialize!(LandCoverClass, ClassRecord);

impl Schema for LandCoverClass {}

impl LandCoverClass {
    /// A class with a code and no metadata.
    pub fn new(code: ClassCode) -> Self {
        Self {
            code,
            name_short: None,
            name_long: None,
            description: None,
            color: None,
        }
    }

    /// A class with short and long names.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooLong`] if either name exceeds its limit.
    pub fn named(
        code: ClassCode,
        name_short: impl Into<String>,
        name_long: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(code).with_name_short(name_short)?.with_name_long(name_long)
    }

    /// Set `name_short` (at most [`NAME_SHORT_MAX`] characters).
    pub fn with_name_short(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_max_len("name_short", &name, NAME_SHORT_MAX)?;
        self.name_short = Some(name);
        Ok(self)
    }

    /// Set `name_long` (at most [`NAME_LONG_MAX`] characters).
    pub fn with_name_long(mut self, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_max_len("name_long", &name, NAME_LONG_MAX)?;
        self.name_long = Some(name);
        Ok(self)
    }

    /// Set the free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the display colour (`#RGB` or `#RRGGBB`).
    pub fn with_color(mut self, color: impl Into<String>) -> Result<Self, ValidationError> {
        let color = color.into();
        validate_color(&color)?;
        self.color = Some(color);
        Ok(self)
    }

    /// The class code.
    pub fn code(&self) -> ClassCode {
        self.code
    }

    /// The short name, if set.
    pub fn name_short(&self) -> Option<&str> {
        self.name_short.as_deref()
    }

    /// The long name, if set.
    pub fn name_long(&self) -> Option<&str> {
        self.name_long.as_deref()
    }

    /// The description, if set.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The display colour, if set.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Copy of `self` with every field except `code` taken from `other`.
    pub fn with_updates(&self, other: &LandCoverClass) -> Self {
        let mut out = self.clone();
        out.update(other);
        out
    }

    /// In-place form of [`with_updates`](Self::with_updates). `code` is the
    /// identity key and is never copied.
    pub(crate) fn update(&mut self, other: &LandCoverClass) {
        if self.name_short != other.name_short {
            self.name_short = other.name_short.clone();
        }
        if self.name_long != other.name_long {
            self.name_long = other.name_long.clone();
        }
        if self.description != other.description {
            self.description = other.description.clone();
        }
        if self.color != other.color {
            self.color = other.color.clone();
        }
    }

    /// Display name: the short name, or the long name when the short one is
    /// empty.
    pub fn get_name(&self) -> Option<&str> {
        non_empty(&self.name_short).or(self.name_long.as_deref())
    }

    /// Short display name. Falls back to the first [`NAME_SHORT_MAX`]
    /// characters of the long name, then to the empty string.
    pub fn get_name_short(&self) -> String {
        if let Some(s) = non_empty(&self.name_short) {
            return s.to_string();
        }
        match non_empty(&self.name_long) {
            Some(long) => long.chars().take(NAME_SHORT_MAX).collect(),
            None => String::new(),
        }
    }

    /// Long display name: the long name, or the short name when the long one
    /// is empty.
    pub fn get_name_long(&self) -> Option<&str> {
        non_empty(&self.name_long).or(self.name_short.as_deref())
    }

    /// Label used for style ramps: long name, else short name.
    pub(crate) fn ramp_label(&self) -> String {
        non_empty(&self.name_long)
            .or(self.name_short.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

impl Translate for LandCoverClass {
    fn translate(&mut self, translations: &Translations) {
        translate_opt(&mut self.name_short, translations);
        translate_opt(&mut self.name_long, translations);
        translate_opt(&mut self.description, translations);
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
