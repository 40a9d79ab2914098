use super::*;

const SQUARE: &str = "[[[0,0],[1,0],[1,1],[0,1],[0,0]]]";

fn feature(id_part: &str, props: &str) -> String {
    format!(r#"{{"type":"Feature",{id_part}"geometry":{{"type":"Polygon","coordinates":{SQUARE}}},"properties":{props}}}"#)
}

fn collection(features: &[String]) -> String {
    format!(r#"{{"type":"FeatureCollection","features":[{}]}}"#, features.join(","))
}

#[test]
fn parses_top_level_string_id_and_name_full() {
    let text = collection(&[feature(r#""id":"p1","#, r#"{"name_full":"Parroquia Arias","name":"Arias"}"#)]);
    let ds = BoundaryDataset::from_geojson(&text).unwrap();
    assert_eq!(ds.len(), 1);
    let r = &ds.regions()[0];
    assert_eq!(r.id, "p1");
    assert_eq!(r.name, "Parroquia Arias");
}

#[test]
fn numeric_top_level_id_is_stringified() {
    let text = collection(&[feature(r#""id":7,"#, r#"{"name":"Sagrario"}"#)]);
    let ds = BoundaryDataset::from_geojson(&text).unwrap();
    assert_eq!(ds.regions()[0].id, "7");
    assert_eq!(ds.regions()[0].name, "Sagrario");
}

#[test]
fn falls_back_to_properties_id() {
    let text = collection(&[feature("", r#"{"id":12}"#)]);
    let ds = BoundaryDataset::from_geojson(&text).unwrap();
    assert_eq!(ds.regions()[0].id, "12");
    assert_eq!(ds.regions()[0].name, "PARROQUIA_12");
}

#[test]
fn skips_feature_without_id() {
    let text = collection(&[feature("", r#"{"name":"nameless"}"#), feature(r#""id":"ok","#, "{}")]);
    let ds = BoundaryDataset::from_geojson(&text).unwrap();
    assert_eq!(ds.len(), 1);
    assert!(ds.region("ok").is_some());
}

#[test]
fn skips_unsupported_geometry() {
    let line = r#"{"type":"Feature","id":"l","geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]},"properties":{}}"#;
    let point = r#"{"type":"Feature","id":"p","geometry":{"type":"Point","coordinates":[0,0]},"properties":{}}"#;
    let text = collection(&[line.to_owned(), point.to_owned(), feature(r#""id":"ok","#, "{}")]);
    let ds = BoundaryDataset::from_geojson(&text).unwrap();
    assert_eq!(ds.len(), 1);
}

#[test]
fn accepts_multipolygon() {
    let mp = r#"{"type":"Feature","id":"m","geometry":{"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[1,1],[0,0]]]]},"properties":{}}"#;
    let ds = BoundaryDataset::from_geojson(&collection(&[mp.to_owned()])).unwrap();
    assert!(matches!(ds.regions()[0].geometry, Geometry::MultiPolygon(_)));
}

#[test]
fn malformed_json_is_parse_error() {
    assert!(matches!(BoundaryDataset::from_geojson("{not json"), Err(LoadError::Parse(_))));
}

#[test]
fn missing_features_is_parse_error() {
    assert!(matches!(BoundaryDataset::from_geojson(r#"{"type":"FeatureCollection"}"#), Err(LoadError::Parse(_))));
}

#[test]
fn empty_collection_is_empty_dataset() {
    let ds = BoundaryDataset::from_geojson(&collection(&[])).unwrap();
    assert!(ds.is_empty());
}
