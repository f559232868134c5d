use crate::fitting::{CatalogEntry, CatalogError, FlangeCatalog, FlangeSpec, MatchKind};

fn entry(nominal_bore: f64, flange_od: f64) -> CatalogEntry {
    CatalogEntry {
        nominal_bore,
        spec: FlangeSpec::new(flange_od, flange_od - 40.0, 18.0, 4).expect("spec"),
    }
}

fn small_catalog() -> FlangeCatalog {
    FlangeCatalog::from_entries([entry(150.0, 285.0), entry(65.0, 185.0), entry(100.0, 220.0)]).expect("catalog")
}

#[test]
fn resolves_to_closest_smaller_entry() {
    let catalog = small_catalog();

    let below = catalog.resolve(50.0).expect("below");
    assert_eq!(below.matched_bore, 65.0);
    assert_eq!(below.kind, MatchKind::BelowRange);

    let between = catalog.resolve(80.0).expect("between");
    assert_eq!(between.matched_bore, 65.0);
    assert_eq!(between.kind, MatchKind::FallbackBelow);
    assert_eq!(between.requested, 80.0);

    let exact = catalog.resolve(100.0).expect("exact");
    assert_eq!(exact.matched_bore, 100.0);
    assert_eq!(exact.kind, MatchKind::Exact);
    assert_eq!(exact.spec.flange_od, 220.0);
}

#[test]
fn above_range_is_lenient_unless_strict() {
    let catalog = small_catalog();

    let above = catalog.resolve(200.0).expect("above");
    assert_eq!(above.matched_bore, 150.0);
    assert_eq!(above.kind, MatchKind::AboveRange);

    assert_eq!(
        catalog.resolve_strict(200.0),
        Err(CatalogError::OutOfCatalogRange {
            requested: 200.0,
            min: 65.0,
            max: 150.0
        })
    );
    assert_eq!(catalog.resolve_strict(150.0).expect("in range").kind, MatchKind::Exact);
}

#[test]
fn rejects_bad_requests_and_entries() {
    let catalog = small_catalog();
    assert_eq!(catalog.resolve(0.0), Err(CatalogError::InvalidNominalBore(0.0)));
    assert!(catalog.resolve(f64::NAN).is_err());

    assert_eq!(FlangeCatalog::from_entries(Vec::<CatalogEntry>::new()), Err(CatalogError::EmptyCatalog));
    assert_eq!(
        FlangeCatalog::from_entries([entry(65.0, 185.0), entry(65.0, 190.0)]),
        Err(CatalogError::DuplicateBore(65.0))
    );
    assert!(matches!(FlangeSpec::new(185.0, 145.0, 18.0, 2), Err(CatalogError::InvalidSpec { .. })));
    assert!(matches!(FlangeSpec::new(145.0, 185.0, 18.0, 4), Err(CatalogError::InvalidSpec { .. })));
}

#[test]
fn entries_are_sorted_and_exact_lookup_has_no_fallback() {
    let catalog = small_catalog();
    let bores: Vec<f64> = catalog.entries().map(|e| e.nominal_bore).collect();
    assert_eq!(bores, vec![65.0, 100.0, 150.0]);
    assert_eq!(catalog.len(), 3);
    assert!(catalog.get(80.0).is_none());
    assert!(catalog.get(65.0).is_some());
}

#[test]
fn sabs_table() {
    let catalog = FlangeCatalog::default();
    assert_eq!(catalog.len(), 25);

    let nb150 = catalog.get(150.0).expect("NB150");
    assert_eq!(nb150.flange_od, 285.0);
    assert_eq!(nb150.bolt_hole_count, 8);
    assert_eq!(nb150.bolt_hole_diameter, 22.0);

    // Every row must be a usable catalog entry.
    let rebuilt = FlangeCatalog::from_entries(catalog.entries()).expect("valid rows");
    assert_eq!(rebuilt, catalog);
}

#[test]
fn loads_from_json() {
    let json = r#"[
        {"nominal_bore": 100.0, "flange_od": 220.0, "bolt_circle_diameter": 180.0, "bolt_hole_diameter": 18.0, "bolt_hole_count": 8},
        {"nominal_bore": 65.0, "flange_od": 185.0, "bolt_circle_diameter": 145.0, "bolt_hole_diameter": 18.0, "bolt_hole_count": 4}
    ]"#;
    let catalog: FlangeCatalog = serde_json::from_str(json).expect("catalog json");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.resolve(80.0).expect("match").matched_bore, 65.0);

    let duplicate = r#"[
        {"nominal_bore": 65.0, "flange_od": 185.0, "bolt_circle_diameter": 145.0, "bolt_hole_diameter": 18.0, "bolt_hole_count": 4},
        {"nominal_bore": 65.0, "flange_od": 185.0, "bolt_circle_diameter": 145.0, "bolt_hole_diameter": 18.0, "bolt_hole_count": 4}
    ]"#;
    assert!(serde_json::from_str::<FlangeCatalog>(duplicate).is_err());
}
