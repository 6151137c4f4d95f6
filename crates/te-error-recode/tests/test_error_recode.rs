//! # Integration Tests for te-error-recode
//!
//! Loads an error-recode layer exported by the QGIS plugin and checks each
//! feature's recode code against both lookup table shapes.

use std::path::PathBuf;

use te_core::Schema;
use te_error_recode::{
    recode_to_trans_code_dict, trans_code_lists, ErrorRecodePolygons, Period, NO_RECODE,
};

fn layer() -> ErrorRecodePolygons {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("error_recode.geojson");
    ErrorRecodePolygons::loads(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_layer_loads_and_ignores_unknown_properties() {
    let polygons = layer();
    assert_eq!(polygons.features.len(), 3);
    assert_eq!(polygons.name.as_deref(), Some("error_recode"));
    let dumped = polygons.dump().unwrap();
    assert!(dumped["features"][0]["properties"].get("fid").is_none());
}

#[test]
fn test_feature_codes() {
    let codes: Vec<_> = layer()
        .features
        .iter()
        .map(|f| f.properties.trans_code())
        .collect();
    assert_eq!(codes, vec![4, 48, 43]);
}

#[test]
fn test_feature_codes_agree_with_both_tables() {
    let lists = trans_code_lists();
    let dict = recode_to_trans_code_dict();
    for feature in &layer().features {
        let props = &feature.properties;
        let code = props.trans_code();
        assert_eq!(dict[&props.recode_triple()], code);

        let idx = usize::try_from(code).unwrap();
        assert_eq!(lists.deg_to[idx], props.recode_deg_to().unwrap_or(NO_RECODE));
        assert_eq!(lists.stable_to[idx], props.recode_stable_to().unwrap_or(NO_RECODE));
        assert_eq!(lists.imp_to[idx], props.recode_imp_to().unwrap_or(NO_RECODE));
    }
}

#[test]
fn test_features_by_period() {
    let polygons = layer();
    let report_2: Vec<_> = polygons
        .features_for_period(Period::Report2)
        .map(|f| f.properties.location_name.clone())
        .collect();
    assert_eq!(report_2, vec![Some("Irrigation scheme".to_string()), None]);
    assert_eq!(polygons.features_for_period(Period::Baseline).count(), 1);
}

#[test]
fn test_layer_roundtrip() {
    let polygons = layer();
    let reloaded = ErrorRecodePolygons::loads(&polygons.dumps().unwrap()).unwrap();
    assert_eq!(reloaded, polygons);
    assert!(reloaded.validate().is_ok());
}

#[test]
fn test_table_helpers_on_polygons_match_free_functions() {
    assert_eq!(ErrorRecodePolygons::trans_code_lists(), trans_code_lists());
    assert_eq!(
        ErrorRecodePolygons::recode_to_trans_code_dict(),
        recode_to_trans_code_dict()
    );
}
