use strata_core::{BoundaryRule, LayeredModel, Property, StrataError};

fn three_layer() -> LayeredModel {
    LayeredModel::new([5.0, 20.0, 0.0], [300.0, 600.0, 800.0], [150.0, 300.0, 400.0], [2000.0; 3])
        .unwrap()
}

#[test]
fn depth_of_top_is_cumulative() {
    let model = three_layer();
    assert_eq!(model.depth_of_top(0).unwrap(), 0.0);
    assert_eq!(model.depth_of_top(1).unwrap(), 5.0);
    assert_eq!(model.depth_of_top(2).unwrap(), 25.0);
    assert_eq!(model.halfspace_depth(), 25.0);
    assert!(matches!(
        model.depth_of_top(3),
        Err(StrataError::Model(info)) if info.code == "layer-out-of-range"
    ));
}

#[test]
fn boundaries_belong_to_the_deeper_layer() {
    let model = three_layer();
    assert_eq!(model.value_at(0.0, Property::Vs).unwrap(), 150.0);
    assert_eq!(model.value_at(4.999, Property::Vs).unwrap(), 150.0);
    assert_eq!(model.value_at(5.0, Property::Vs).unwrap(), 300.0);
    assert_eq!(model.value_at(25.0, Property::Vp).unwrap(), 800.0);
    assert_eq!(model.value_at(1.0e6, Property::Density).unwrap(), 2000.0);
}

#[test]
fn shallower_rule_keeps_interface_in_upper_layer() {
    let model = three_layer();
    let rule = BoundaryRule::Shallower;
    assert_eq!(model.value_at_with(0.0, Property::Vs, rule).unwrap(), 150.0);
    assert_eq!(model.value_at_with(5.0, Property::Vs, rule).unwrap(), 150.0);
    assert_eq!(model.value_at_with(5.5, Property::Vs, rule).unwrap(), 300.0);
    assert_eq!(model.value_at_with(25.0, Property::Vs, rule).unwrap(), 300.0);
}

#[test]
fn negative_depth_is_rejected() {
    let model = three_layer();
    assert!(matches!(
        model.value_at(-0.1, Property::Vs),
        Err(StrataError::Model(info)) if info.code == "negative-depth"
    ));
    assert!(model.value_at(f64::NAN, Property::Vs).is_err());
}

#[test]
fn vs30_clips_the_deepest_contributing_layer() {
    let model = three_layer();
    let expected = 30.0 / (5.0 / 150.0 + 20.0 / 300.0 + 5.0 / 400.0);
    assert!((model.vs30() - expected).abs() < 1e-9);
    assert!((model.vs30() - 266.666_666_666_666_6).abs() < 1e-9);

    let halfspace = LayeredModel::new([0.0], [500.0], [250.0], [2000.0]).unwrap();
    assert!((halfspace.vs30() - 250.0).abs() < 1e-12);

    let deep = LayeredModel::new([40.0, 0.0], [400.0, 900.0], [200.0, 450.0], [1900.0, 2100.0])
        .unwrap();
    assert!((deep.vs30() - 200.0).abs() < 1e-12);
    assert!((deep.time_averaged_vs(50.0).unwrap() - 50.0 / (40.0 / 200.0 + 10.0 / 450.0)).abs() < 1e-9);
    assert!(deep.time_averaged_vs(0.0).is_err());
}

#[test]
fn last_layer_thickness_is_ignored_by_depth_queries() {
    let model = LayeredModel::new([1.0, 2.0, 3.0], [2.0, 4.0, 5.0], [1.0, 2.0, 3.0], [1.0, 2.0, 3.0])
        .unwrap();
    assert_eq!(model.value_at(100.0, Property::Vs).unwrap(), 3.0);
    assert_eq!(model.halfspace_depth(), 3.0);
}

#[test]
fn construction_rejects_inconsistent_layers() {
    let mismatch = LayeredModel::new([1.0, 0.0], [200.0], [100.0, 200.0], [2000.0, 2000.0]);
    assert!(matches!(
        mismatch,
        Err(StrataError::Model(info)) if info.code == "layer-count-mismatch"
    ));

    let zero_interior = LayeredModel::new([1.0, 0.0, 0.0], [200.0; 3], [100.0; 3], [2000.0; 3]);
    assert!(matches!(
        zero_interior,
        Err(StrataError::Model(info)) if info.code == "invalid-thickness" && info.context["layer"] == "1"
    ));

    let negative_vs = LayeredModel::new([1.0, 0.0], [200.0, 300.0], [-100.0, 200.0], [2000.0; 2]);
    assert!(matches!(
        negative_vs,
        Err(StrataError::Model(info)) if info.code == "non-positive-property"
    ));

    let empty = LayeredModel::new(Vec::<f64>::new(), Vec::<f64>::new(), Vec::<f64>::new(), Vec::<f64>::new());
    assert!(matches!(empty, Err(StrataError::Model(info)) if info.code == "empty-model"));
}

#[test]
fn equality_tolerates_rounding_but_not_structure() {
    let a = LayeredModel::new([1.0, 0.0], [200.0, 400.0], [100.0, 200.0], [2000.0; 2]).unwrap();
    let b = LayeredModel::new([1.000_000_1, 0.0], [200.0, 400.0], [100.0, 200.0], [2000.0; 2])
        .unwrap();
    let c = LayeredModel::new([1.0, 1.0, 0.0], [200.0, 400.0, 400.0], [100.0, 200.0, 200.0], [2000.0; 3])
        .unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a, c.simplify());
}

#[test]
fn simplify_merges_repeated_layers() {
    let model = LayeredModel::new(
        [1.0, 2.0, 3.0, 0.0],
        [300.0, 500.0, 500.0, 350.0],
        [100.0, 200.0, 200.0, 300.0],
        [2000.0; 4],
    )
    .unwrap();
    let expected =
        LayeredModel::new([1.0, 5.0, 0.0], [300.0, 500.0, 350.0], [100.0, 200.0, 300.0], [2000.0; 3])
            .unwrap();
    assert_eq!(model.simplify(), expected);

    let into_halfspace =
        LayeredModel::new([1.0, 4.0, 0.0], [300.0, 500.0, 500.0], [100.0, 200.0, 200.0], [2000.0; 3])
            .unwrap();
    assert_eq!(
        into_halfspace.simplify(),
        LayeredModel::new([1.0, 0.0], [300.0, 500.0], [100.0, 200.0], [2000.0; 2]).unwrap()
    );
}

#[test]
fn profile_draws_stairs_to_dmax() {
    let model = three_layer();
    let profile = model.profile(Property::Vs, 50.0).unwrap();
    assert_eq!(profile.depth, vec![0.0, 5.0, 5.0, 25.0, 25.0, 50.0]);
    assert_eq!(profile.value, vec![150.0, 150.0, 300.0, 300.0, 400.0, 400.0]);

    let shallow = model.profile(Property::Vs, 10.0).unwrap();
    assert_eq!(shallow.depth.last().copied(), Some(25.0));
    assert!(model.profile(Property::Vs, 0.0).is_err());
}

#[test]
fn poissons_ratio_is_derived_per_layer() {
    let model = LayeredModel::new([2.0, 0.0], [400.0, 900.0], [200.0, 300.0], [2000.0; 2]).unwrap();
    let pr = model.value_at(0.5, Property::PoissonsRatio).unwrap();
    assert!((pr - 1.0 / 3.0).abs() < 1e-12);

    let deep = model.value_at(3.0, Property::PoissonsRatio).unwrap();
    let expected = (900.0_f64.powi(2) - 2.0 * 300.0_f64.powi(2))
        / (2.0 * (900.0_f64.powi(2) - 300.0_f64.powi(2)));
    assert!((deep - expected).abs() < 1e-12);
    assert_eq!(model.values(Property::PoissonsRatio).len(), 2);
}

#[test]
fn property_labels_parse() {
    assert_eq!("vs".parse::<Property>().unwrap(), Property::Vs);
    assert_eq!("RHO".parse::<Property>().unwrap(), Property::Density);
    assert_eq!("pr".parse::<Property>().unwrap(), Property::PoissonsRatio);
    assert!(matches!(
        "qs".parse::<Property>(),
        Err(StrataError::Model(info)) if info.code == "unknown-property"
    ));
}
