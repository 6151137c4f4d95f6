//! # Document Tests for te-land-cover
//!
//! Loads the UNCCD legend, the ESA CCI to UNCCD nesting, and the UNCCD
//! degradation matrix from `tests/data/`, checks their invariants, and
//! exercises the mutation sequences the QGIS plugin performs on them.

use std::path::PathBuf;

use te_core::{Schema, TeError, Translate, Translations, ValidationError};
use te_land_cover::{
    ClassAttr, DegradationDefinition, DegradationMeaning, Definitions, LandCoverClass, Legend,
    LegendNesting, NestingOptions, TransitionDefinition, TransitionMatrix, TransitionMeaning,
};

/// Helper: read a fixture from `tests/data/`.
fn fixture(name: &str) -> serde_json::Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name);
    let text = std::fs::read_to_string(&path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn unccd_legend() -> Legend {
    Legend::load(fixture("unccd_legend.json")).unwrap()
}

fn esa_nesting() -> LegendNesting {
    LegendNesting::load(fixture("esa_cci_unccd_nesting.json")).unwrap()
}

fn deg_matrix() -> DegradationDefinition {
    DegradationDefinition::load(fixture("unccd_deg_matrix.json")).unwrap()
}

// -- Legend -------------------------------------------------------------------

#[test]
fn test_unccd_legend_loads_sorted() {
    let legend = unccd_legend();
    assert_eq!(legend.len(), 7);
    assert_eq!(legend.codes(), vec![1, 2, 3, 4, 5, 6, 7, -32768]);
    assert_eq!(legend.get_multiplier(), 10);
    assert_eq!(
        legend
            .class_by_attr(ClassAttr::parse("name_long", "Artificial areas").unwrap())
            .unwrap()
            .code(),
        5
    );
}

#[test]
fn test_legend_roundtrip_is_validate_equal() {
    let legend = unccd_legend();
    let reloaded = Legend::loads(&legend.dumps().unwrap()).unwrap();
    assert_eq!(reloaded, legend);
    assert!(reloaded.validate().is_ok());
}

#[test]
fn test_wrong_document_type_rejected() {
    // A legend is not a nesting.
    assert!(LegendNesting::load(fixture("unccd_legend.json")).is_err());
}

// -- Nesting ------------------------------------------------------------------

#[test]
fn test_esa_nesting_loads() {
    let nesting = esa_nesting();
    assert_eq!(nesting.child().len(), 37);
    assert_eq!(nesting.parent().len(), 7);
    assert_eq!(nesting.get_multiplier(), 100);
    assert!(nesting.orphan_children().is_empty());

    let list = nesting.get_list();
    assert_eq!(list.len(), 38);
    assert_eq!(list.from_values()[0], -32768);
    assert_eq!(list.to_values()[0], -32768);

    let cropland = nesting.parent().class_by_code(3).unwrap();
    let children: Vec<_> = nesting
        .children_for_parent(cropland)
        .iter()
        .map(|c| c.code())
        .collect();
    assert_eq!(children, vec![10, 11, 12, 20, 30, 40]);

    let urban = nesting.child_class(190).unwrap();
    assert_eq!(nesting.parent_for_child(urban).unwrap().code(), 5);
}

#[test]
fn test_esa_nesting_roundtrip() {
    let nesting = esa_nesting();
    let reloaded = LegendNesting::loads(&nesting.dumps().unwrap()).unwrap();
    assert_eq!(reloaded, nesting);
    assert_eq!(reloaded.get_list(), nesting.get_list());
}

#[test]
fn test_esa_nesting_requires_nodata_bucket_by_default() {
    let mut doc = fixture("esa_cci_unccd_nesting.json");
    doc["nesting"].as_object_mut().unwrap().remove("-32768");

    let err = LegendNesting::load(doc.clone()).unwrap_err();
    assert!(format!("{err}").contains("parent"));

    let options = NestingOptions {
        nodata_in_nesting: false,
    };
    let nesting = LegendNesting::load_with_options(doc, options).unwrap();
    assert_eq!(nesting.get_list().len(), 37);
}

#[test]
fn test_nesting_reassignment_sequence() {
    let mut nesting = esa_nesting();
    let water = nesting.parent().class_by_code(7).unwrap().clone();

    // Drop "Water body", leaving class 210 orphaned, then re-home it.
    assert!(nesting.remove_parent_class(&water));
    let orphans: Vec<_> = nesting.orphan_children().iter().map(|c| c.code()).collect();
    assert_eq!(orphans, vec![210]);
    assert!(nesting.validate().is_err());

    let other = LandCoverClass::named(8, "Water", "Inland water").unwrap();
    let water_bodies = nesting.child_class(210).unwrap().clone();
    nesting.add_update_parent(other, &[water_bodies]);
    assert!(nesting.orphan_children().is_empty());
    assert!(nesting.validate().is_ok());
    assert_eq!(nesting.nesting()[&8], vec![210]);
}

#[test]
fn test_nesting_mutation_without_nodata() {
    let mut doc = fixture("esa_cci_unccd_nesting.json");
    doc["nesting"].as_object_mut().unwrap().remove("-32768");
    let options = NestingOptions {
        nodata_in_nesting: false,
    };
    let mut nesting = LegendNesting::load_with_options(doc, options).unwrap();
    let nodata = nesting.parent().nodata().unwrap().clone();

    nesting.add_update_parent(nodata.clone(), &[]);
    assert!(!nesting.nesting().contains_key(&nodata.code()));
    assert!(!nesting.remove_parent_class(&nodata));
    let urban = nesting.child_class(190).unwrap().clone();
    assert!(!nesting.add_update_children(&[urban], &nodata));
    assert!(nesting.orphan_children().is_empty());
    assert!(nesting.validate().is_ok());
}

// -- Transition matrices ------------------------------------------------------

#[test]
fn test_unccd_matrix_loads() {
    let def = deg_matrix();
    let list = def.get_list(None).unwrap();
    assert_eq!(list.len(), 49);
    // final outer, initial inner: first column is every class becoming
    // tree-covered.
    assert_eq!(&list.from_values()[..7], &[11, 21, 31, 41, 51, 61, 71]);
    assert_eq!(&list.to_values()[..7], &[0, 1, 1, -1, 1, 1, 0]);
}

#[test]
fn test_unccd_persistence_list() {
    let def = deg_matrix();
    let persistence = def.get_persistence_list().unwrap();
    let list = def.get_list(None).unwrap();
    let by_code: std::collections::HashMap<i32, i32> = list.pairs().collect();
    assert_eq!(persistence.len(), 49);
    for (from, to) in persistence.pairs() {
        let initial = from / 10;
        let final_ = from % 10;
        if initial == final_ {
            assert_eq!(to, initial);
        } else {
            assert_eq!(to, from);
            assert!(by_code.contains_key(&from));
        }
    }
}

#[test]
fn test_matrix_roundtrip() {
    let def = deg_matrix();
    let reloaded = DegradationDefinition::loads(&def.dumps().unwrap()).unwrap();
    assert_eq!(reloaded, def);
    assert!(reloaded.validate().is_ok());
    assert_eq!(reloaded.get_list(None).unwrap(), def.get_list(None).unwrap());
}

#[test]
fn test_matrix_with_missing_entry_rejected() {
    let mut doc = fixture("unccd_deg_matrix.json");
    doc["definitions"]["transitions"].as_array_mut().unwrap().remove(10);
    assert!(DegradationDefinition::load(doc).is_err());
}

#[test]
fn test_matrix_with_nodata_entry_rejected() {
    let mut doc = fixture("unccd_deg_matrix.json");
    let nodata = doc["legend"]["nodata"].clone();
    let transitions = doc["definitions"]["transitions"].as_array_mut().unwrap();
    let mut entry = transitions[0].clone();
    entry["final"] = nodata;
    transitions.push(entry);
    let err = DegradationDefinition::load(doc).unwrap_err();
    assert!(format!("{err}").contains("nodata"));
}

#[test]
fn test_named_matrices() {
    let def = deg_matrix();
    let matrix = def.matrix(None).unwrap().clone();
    let mut named = std::collections::BTreeMap::new();
    named.insert("default".to_string(), matrix.clone());
    named.insert("strict".to_string(), matrix);
    let multi = TransitionDefinition::new(def.legend().clone(), "Multi", Definitions::Named(named))
        .unwrap();

    assert!(matches!(multi.get_list(None), Err(TeError::Contract(_))));
    assert_eq!(multi.get_list(Some("strict")).unwrap(), def.get_list(None).unwrap());

    let reloaded = DegradationDefinition::load(multi.dump().unwrap()).unwrap();
    assert_eq!(reloaded.definitions().keys(), vec!["default", "strict"]);
}

#[test]
fn test_add_then_remove_class_restores_matrix() {
    let mut def = deg_matrix();
    let before = def.get_list(None).unwrap();

    let snow = LandCoverClass::named(8, "Snow", "Permanent snow and ice").unwrap();
    def.add_update_class(snow.clone(), None);
    assert_eq!(def.legend().len(), 8);
    assert_eq!(def.matrix(None).unwrap().transitions().len(), 64);
    assert!(def.validate().is_ok());
    assert!(def
        .matrix(None)
        .unwrap()
        .meanings_by_class(&snow)
        .iter()
        .all(|t| *t.meaning() == DegradationMeaning::Stable));

    assert!(def.remove_class(&snow));
    assert!(def.validate().is_ok());
    assert_eq!(def.get_list(None).unwrap(), before);
}

#[test]
fn test_translate_definition() {
    let mut def = deg_matrix();
    let mut translations = Translations::new();
    translations.insert("Cropland".into(), "Terres cultivées".into());
    def.translate(&translations);
    assert_eq!(
        def.legend().class_by_code(3).unwrap().name_short(),
        Some("Terres cultivées")
    );
    let crop = def.legend().class_by_code(3).unwrap();
    for t in def.matrix(None).unwrap().meanings_by_class(crop) {
        let side = if t.initial().code() == 3 { t.initial() } else { t.final_class() };
        assert_eq!(side.name_short(), Some("Terres cultivées"));
    }
}

// -- End to end ---------------------------------------------------------------

#[test]
fn test_two_class_scenario() {
    let forest = LandCoverClass::new(1).with_name_short("Forest").unwrap();
    let grass = LandCoverClass::new(2).with_name_short("Grassland").unwrap();
    let legend = Legend::new("Two", vec![grass.clone(), forest.clone()], None).unwrap();
    assert_eq!(legend.get_multiplier(), 10);

    let t = |i: &LandCoverClass, f: &LandCoverClass, m| TransitionMeaning::new(i.clone(), f.clone(), m);
    let matrix = TransitionMatrix::new(
        "deg",
        vec![
            t(&forest, &forest, DegradationMeaning::Stable),
            t(&forest, &grass, DegradationMeaning::Degradation),
            t(&grass, &forest, DegradationMeaning::Improvement),
            t(&grass, &grass, DegradationMeaning::Stable),
        ],
    );
    let def = TransitionDefinition::new(legend, "Two", Definitions::Single(matrix)).unwrap();
    let list = def.get_list(None).unwrap();
    assert_eq!(list.from_values(), vec![11, 21, 12, 22]);
    assert_eq!(list.to_values(), vec![0, 1, -1, 0]);
    assert_eq!(
        serde_json::to_value(&list).unwrap(),
        serde_json::json!([[11, 21, 12, 22], [0, 1, -1, 0]])
    );
}

#[test]
fn test_duplicate_codes_fail_load() {
    let mut doc = fixture("unccd_legend.json");
    let first = doc["key"][0].clone();
    doc["key"].as_array_mut().unwrap().push(first);
    let err = Legend::load(doc).unwrap_err();
    assert!(matches!(err, TeError::Json(_)));
    assert!(format!("{err}").contains(
        &ValidationError::DuplicateCode {
            legend: "UNCCD Land Cover".into(),
            code: 1
        }
        .to_string()
    ));
}
