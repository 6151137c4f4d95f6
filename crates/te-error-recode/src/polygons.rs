//! # Error-Recode Polygons
//!
//! A GeoJSON `FeatureCollection` of polygons drawn by an analyst to correct
//! indicator values. Each feature's properties name the reporting periods
//! it applies to and, per indicator state, the value to recode to.
//!
//! Geometry is carried opaquely; nothing here inspects it. Unknown
//! properties and unknown top-level members are ignored on load.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use te_core::{Schema, ValidationError};
use uuid::Uuid;

use crate::table::{self, RecodeTriple, TransCodeLists};

/// A reporting period an error-recode polygon can apply to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Period {
    /// The baseline period.
    #[serde(rename = "baseline")]
    Baseline,
    /// The first reporting period.
    #[serde(rename = "report_1")]
    Report1,
    /// The second reporting period.
    #[serde(rename = "report_2")]
    Report2,
}

/// Properties of one error-recode feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecodeProperties {
    uuid: Uuid,
    periods_affected: Vec<Period>,
    /// Free-text place name.
    pub location_name: Option<String>,
    /// Polygon area in square kilometres.
    pub area_km_sq: Option<f64>,
    /// Free-text description of the process driving the change.
    pub process_driving_change: Option<String>,
    /// Free-text basis for the analyst's judgement.
    pub basis_for_judgement: Option<String>,
    recode_deg_to: Option<i32>,
    recode_stable_to: Option<i32>,
    recode_imp_to: Option<i32>,
    /// Free-form statistics attached by the plugin.
    pub stats: Option<Map<String, Value>>,
    #[serde(skip)]
    trans_code: i32,
}

#[derive(Deserialize)]
struct PropertiesRecord {
    uuid: Uuid,
    periods_affected: Vec<Period>,
    #[serde(default)]
    location_name: Option<String>,
    #[serde(default)]
    area_km_sq: Option<f64>,
    #[serde(default)]
    process_driving_change: Option<String>,
    #[serde(default)]
    basis_for_judgement: Option<String>,
    #[serde(default)]
    recode_deg_to: Option<i32>,
    #[serde(default)]
    recode_stable_to: Option<i32>,
    #[serde(default)]
    recode_imp_to: Option<i32>,
    #[serde(default)]
    stats: Option<Map<String, Value>>,
}

impl TryFrom<PropertiesRecord> for ErrorRecodeProperties {
    type Error = ValidationError;

    fn try_from(r: PropertiesRecord) -> Result<Self, Self::Error> {
        let mut props = Self::new(r.uuid, r.periods_affected)?
            .with_recode((r.recode_deg_to, r.recode_stable_to, r.recode_imp_to))?;
        props.location_name = r.location_name;
        props.area_km_sq = r.area_km_sq;
        props.process_driving_change = r.process_driving_change;
        props.basis_for_judgement = r.basis_for_judgement;
        props.stats = r.stats;
        Ok(props)
    }
}

te_core::impl_validating_deserialize!(ErrorRecodeProperties, PropertiesRecord);

impl Schema for ErrorRecodeProperties {}

impl ErrorRecodeProperties {
    /// Properties that recode nothing.
    ///
    /// # Errors
    ///
    /// [`ValidationError::Empty`] if `periods_affected` is empty.
    pub fn new(uuid: Uuid, periods_affected: Vec<Period>) -> Result<Self, ValidationError> {
        if periods_affected.is_empty() {
            return Err(ValidationError::Empty("periods_affected"));
        }
        Ok(Self {
            uuid,
            periods_affected,
            location_name: None,
            area_km_sq: None,
            process_driving_change: None,
            basis_for_judgement: None,
            recode_deg_to: None,
            recode_stable_to: None,
            recode_imp_to: None,
            stats: None,
            trans_code: 0,
        })
    }

    /// Set the three recode targets.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidOption`] if a target is not one of its
    /// axis's options.
    pub fn with_recode(
        mut self,
        (deg, stable, imp): RecodeTriple,
    ) -> Result<Self, ValidationError> {
        self.trans_code = table::trans_code((deg, stable, imp))?;
        self.recode_deg_to = deg;
        self.recode_stable_to = stable;
        self.recode_imp_to = imp;
        Ok(self)
    }

    /// Feature identifier.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Periods the recode applies to. Never empty.
    pub fn periods_affected(&self) -> &[Period] {
        &self.periods_affected
    }

    /// True if the recode applies to `period`.
    pub fn affects(&self, period: Period) -> bool {
        self.periods_affected.contains(&period)
    }

    /// Value degraded pixels are recoded to; `None` leaves them unchanged.
    pub fn recode_deg_to(&self) -> Option<i32> {
        self.recode_deg_to
    }

    /// Value stable pixels are recoded to; `None` leaves them unchanged.
    pub fn recode_stable_to(&self) -> Option<i32> {
        self.recode_stable_to
    }

    /// Value improved pixels are recoded to; `None` leaves them unchanged.
    pub fn recode_imp_to(&self) -> Option<i32> {
        self.recode_imp_to
    }

    /// The `(deg, stable, imp)` recode targets.
    pub fn recode_triple(&self) -> RecodeTriple {
        (self.recode_deg_to, self.recode_stable_to, self.recode_imp_to)
    }

    /// Code of this feature's recode triple in the lookup tables.
    pub fn trans_code(&self) -> i32 {
        self.trans_code
    }
}

/// One GeoJSON feature of an error-recode layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecodeFeature {
    #[serde(rename = "type")]
    kind: String,
    /// GeoJSON geometry object, carried opaquely.
    pub geometry: Map<String, Value>,
    /// Recode properties.
    pub properties: ErrorRecodeProperties,
}

#[derive(Deserialize)]
struct FeatureRecord {
    #[serde(rename = "type")]
    kind: String,
    geometry: Map<String, Value>,
    properties: ErrorRecodeProperties,
}

impl TryFrom<FeatureRecord> for ErrorRecodeFeature {
    type Error = ValidationError;

    fn try_from(r: FeatureRecord) -> Result<Self, Self::Error> {
        check_type("Feature", &r.kind)?;
        Ok(Self::new(r.geometry, r.properties))
    }
}

te_core::impl_validating_deserialize!(ErrorRecodeFeature, FeatureRecord);

impl Schema for ErrorRecodeFeature {}

impl ErrorRecodeFeature {
    /// A feature with the given geometry and properties.
    pub fn new(geometry: Map<String, Value>, properties: ErrorRecodeProperties) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry,
            properties,
        }
    }
}

/// A GeoJSON `FeatureCollection` of error-recode polygons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecodePolygons {
    #[serde(rename = "type")]
    kind: String,
    /// The features.
    pub features: Vec<ErrorRecodeFeature>,
    /// Layer name.
    pub name: Option<String>,
    /// GeoJSON CRS member, carried opaquely.
    pub crs: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct PolygonsRecord {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<ErrorRecodeFeature>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    crs: Option<Map<String, Value>>,
}

impl TryFrom<PolygonsRecord> for ErrorRecodePolygons {
    type Error = ValidationError;

    fn try_from(r: PolygonsRecord) -> Result<Self, Self::Error> {
        check_type("FeatureCollection", &r.kind)?;
        tracing::debug!(features = r.features.len(), "loaded error recode polygons");
        Ok(Self {
            kind: r.kind,
            features: r.features,
            name: r.name,
            crs: r.crs,
        })
    }
}

te_core::impl_validating_deserialize!(ErrorRecodePolygons, PolygonsRecord);

impl Schema for ErrorRecodePolygons {}

impl ErrorRecodePolygons {
    /// A collection of features.
    pub fn new(features: Vec<ErrorRecodeFeature>, name: Option<String>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
            name,
            crs: None,
        }
    }

    /// The lookup table as four parallel lists; see [`table::trans_code_lists`].
    pub fn trans_code_lists() -> TransCodeLists {
        table::trans_code_lists()
    }

    /// The lookup table keyed by option triple; see
    /// [`table::recode_to_trans_code_dict`].
    pub fn recode_to_trans_code_dict() -> std::collections::BTreeMap<RecodeTriple, i32> {
        table::recode_to_trans_code_dict()
    }

    /// Features that apply to `period`.
    pub fn features_for_period(
        &self,
        period: Period,
    ) -> impl Iterator<Item = &ErrorRecodeFeature> + '_ {
        self.features
            .iter()
            .filter(move |f| f.properties.affects(period))
    }
}

fn check_type(expected: &'static str, actual: &str) -> Result<(), ValidationError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ValidationError::WrongType {
            expected,
            actual: actual.to_string(),
        })
    }
}
