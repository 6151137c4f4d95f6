//! Style ramp items for rendering land-cover and transition layers in the
//! Trends.Earth QGIS plugin.

use serde::{Deserialize, Serialize};
use te_core::{Translations, ValidationError};

use crate::legend::Legend;

/// Colour assigned to the "No change" entry of a transitions ramp.
pub const NO_CHANGE_COLOR: &str = "#ffffe0";

/// One entry of a layer style: pixel value, legend label, colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RampItem {
    /// Pixel value.
    pub value: i32,
    /// Legend label.
    pub label: String,
    /// Hex colour, if the class has one.
    pub color: Option<String>,
}

impl Legend {
    /// One item per class, key first then nodata. The label is the long
    /// name, falling back to the short name.
    pub fn get_ramp_items(&self) -> Vec<RampItem> {
        self.key_with_nodata()
            .map(|c| RampItem {
                value: c.code(),
                label: c.ramp_label(),
                color: c.color().map(str::to_string),
            })
            .collect()
    }

    /// Items for a transitions layer: nodata (when the legend has one),
    /// "No change", then one "loss" item per class.
    ///
    /// The "No change" value is `len(key)`; a class's loss value is
    /// `class_index(c) * multiplier + len(key)`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::TransitionCodeOverflow`] if a loss value does not
    /// fit in an `i32`.
    pub fn get_transitions_ramp_items(
        &self,
        translations: &Translations,
    ) -> Result<Vec<RampItem>, ValidationError> {
        let tr = |s: String| translations.get(&s).cloned().unwrap_or(s);
        let multiplier = self.get_multiplier();
        let n = i32::try_from(self.len())
            .map_err(|_| ValidationError::TransitionCodeOverflow {
                legend: self.name().to_string(),
                classes: self.len(),
            })?;

        let mut out = Vec::with_capacity(self.len() + 2);
        if let Some(nodata) = self.nodata() {
            out.push(RampItem {
                value: nodata.code(),
                label: tr("No data".to_string()),
                color: nodata.color().map(str::to_string),
            });
        }
        out.push(RampItem {
            value: n,
            label: tr("No change".to_string()),
            color: Some(NO_CHANGE_COLOR.to_string()),
        });
        for (ordinal, c) in (1..).zip(self.key()) {
            out.push(RampItem {
                value: self.pack_checked(ordinal, n, multiplier)?,
                label: tr(format!("{} loss", c.ramp_label())),
                color: c.color().map(str::to_string),
            });
        }
        Ok(out)
    }
}
