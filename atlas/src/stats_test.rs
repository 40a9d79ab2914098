#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn density_divides_population_by_area() {
    let s = ParishStats { population: 12_000, area_km2: 4.0, metadata: String::new() };
    assert_eq!(s.density(), 3000.0);
}

#[test]
fn density_is_zero_without_area() {
    let s = ParishStats { population: 500, ..ParishStats::default() };
    assert_eq!(s.density(), 0.0);
}

#[test]
fn unknown_region_defaults_to_zero() {
    let book = StatsBook::new();
    assert!(book.get("p1").is_none());
    assert_eq!(book.get_or_default("p1"), ParishStats::default());
}

#[test]
fn update_creates_then_merges() {
    let mut book = StatsBook::new();
    book.update("p1", &StatsPatch { population: Some(100), ..StatsPatch::default() });
    book.update("p1", &StatsPatch { area_km2: Some(2.0), metadata: Some("census 2011".into()), ..StatsPatch::default() });
    let s = book.get("p1").unwrap();
    assert_eq!(s.population, 100);
    assert_eq!(s.area_km2, 2.0);
    assert_eq!(s.metadata, "census 2011");
    assert_eq!(book.len(), 1);
}

#[test]
fn negative_area_ignored() {
    let mut book = StatsBook::new();
    book.update("p1", &StatsPatch { area_km2: Some(3.0), ..StatsPatch::default() });
    book.update("p1", &StatsPatch { area_km2: Some(-1.0), ..StatsPatch::default() });
    assert_eq!(book.get("p1").unwrap().area_km2, 3.0);
}

#[test]
fn reads_saved_book_with_spanish_keys() {
    let raw = r#"{"7":{"poblacion":2500,"area":5,"densidad":500,"metadata":"x"}}"#;
    let book: StatsBook = serde_json::from_str(raw).unwrap();
    let s = book.get("7").unwrap();
    assert_eq!(s.population, 2500);
    assert_eq!(s.density(), 500.0);
    let out = serde_json::to_value(&book).unwrap();
    assert_eq!(out["7"]["poblacion"], 2500);
}
