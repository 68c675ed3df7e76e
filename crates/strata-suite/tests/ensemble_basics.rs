use proptest::prelude::*;
use strata_core::{LayeredModel, StrataError};
use strata_suite::{ModelEnsemble, Selection};

fn model(vs_scale: f64) -> LayeredModel {
    LayeredModel::new(
        [1.0, 3.0, 5.0, 7.0],
        [200.0, 400.0, 600.0, 800.0],
        [100.0 * vs_scale, 200.0, 300.0, 400.0],
        [2000.0; 4],
    )
    .unwrap()
}

#[test]
fn single_entry_construction() {
    let gm = model(1.0);
    let suite = ModelEnsemble::new(gm.clone(), "test", 2.0);
    assert_eq!(suite[0], gm);
    assert_eq!(suite.ids(), ["test"]);
    assert_eq!(suite.misfits(), [2.0]);
    assert_eq!(suite.len(), 1);
    assert!(!suite.is_empty());
}

#[test]
fn append_grows_all_sequences_together() {
    let gm = model(1.0);
    let mut suite = ModelEnsemble::new(gm.clone(), "test1", 1.0);
    suite.append(gm.clone(), "test2", 1.1);
    for entry in &suite {
        assert_eq!(entry, &gm);
    }
    assert_eq!(suite.ids(), ["test1", "test2"]);
    assert_eq!(suite.misfits(), [1.0, 1.1]);
    assert_eq!(suite.models().len(), 2);
}

#[test]
fn display_tracks_count_through_slicing() {
    let x = [1.0, 2.0, 3.0];
    let y = [2.0, 4.0, 5.0];
    let gm = LayeredModel::new(x, y, x, x).unwrap();
    let mut suite = ModelEnsemble::new(gm.clone(), "test", 0.0);
    for _ in 0..3 {
        suite.append(gm.clone(), "test", 0.0);
    }
    assert_eq!(suite.to_string(), "ModelEnsemble with 4 LayeredModels.");

    let sliced = suite.slice(1..3).unwrap();
    assert_eq!(sliced.to_string(), "ModelEnsemble with 2 LayeredModels.");
}

#[test]
fn slicing_keeps_parallel_sequences_aligned() {
    let mut suite = ModelEnsemble::new(model(1.0), "a", 0.3);
    suite.append(model(1.1), "b", 0.2);
    suite.append(model(1.2), "c", 0.1);
    suite.append(model(1.3), "d", 0.4);

    let middle = suite.slice(1..=2).unwrap();
    assert_eq!(middle.ids(), &suite.ids()[1..3]);
    assert_eq!(middle.misfits(), &suite.misfits()[1..3]);
    assert_eq!(middle.models(), &suite.models()[1..3]);

    assert_eq!(suite.slice(..).unwrap(), suite);
    assert!(matches!(
        suite.slice(2..2),
        Err(StrataError::Ensemble(info)) if info.code == "empty-slice"
    ));
    assert!(matches!(
        suite.slice(3..9),
        Err(StrataError::Ensemble(info)) if info.code == "slice-out-of-range"
    ));
    assert!(suite.get(4).is_none());
}

#[test]
fn numeric_selection_ranks_by_misfit_with_stable_ties() {
    let mut suite = ModelEnsemble::new(model(1.0), "a", 0.5);
    suite.append(model(1.0), "b", 0.1);
    suite.append(model(1.0), "c", 0.5);
    suite.append(model(1.0), "d", 0.2);

    assert_eq!(suite.select(Selection::Best(3)).unwrap(), vec![1, 3, 0]);
    assert_eq!(suite.select(Selection::Best(4)).unwrap(), vec![1, 3, 0, 2]);
    assert_eq!(suite.select(Selection::All).unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(suite.best(), 1);
    assert_eq!(suite.selected(Selection::Best(2)).unwrap().len(), 2);
}

#[test]
fn invalid_nbest_is_rejected() {
    let suite = ModelEnsemble::new(model(1.0), "a", 0.5);
    assert!(matches!(
        suite.select(Selection::Best(0)),
        Err(StrataError::Ensemble(info)) if info.code == "non-positive-nbest"
    ));
    assert!(matches!(
        suite.select(Selection::Best(2)),
        Err(StrataError::Ensemble(info)) if info.code == "nbest-exceeds-ensemble"
    ));
}

#[test]
fn selection_parses_keyword_and_counts() {
    assert_eq!("all".parse::<Selection>().unwrap(), Selection::All);
    assert_eq!(" 12 ".parse::<Selection>().unwrap(), Selection::Best(12));
    assert!("best".parse::<Selection>().is_err());
    assert_eq!(Selection::Best(3).to_string(), "3");
    assert_eq!(Selection::default(), Selection::All);
}

#[test]
fn from_parts_validates_lengths() {
    let err = ModelEnsemble::from_parts(vec![model(1.0)], vec![], vec![1.0]).unwrap_err();
    assert_eq!(err.code(), "length-mismatch");
    let err = ModelEnsemble::from_parts(vec![], vec![], vec![]).unwrap_err();
    assert_eq!(err.code(), "empty-ensemble");
}

#[test]
fn slice_bounds_at_usize_max_are_out_of_range() {
    use std::ops::Bound;

    let mut suite = ModelEnsemble::new(model(1.0), "a", 0.3);
    suite.append(model(1.1), "b", 0.2);
    assert!(matches!(
        suite.slice(..=usize::MAX),
        Err(StrataError::Ensemble(info)) if info.code == "slice-out-of-range"
    ));
    assert!(matches!(
        suite.slice((Bound::Excluded(usize::MAX), Bound::Unbounded)),
        Err(StrataError::Ensemble(info)) if info.code == "slice-out-of-range"
    ));
    assert_eq!(suite.slice(..=1).unwrap().len(), 2);
}

proptest! {
    #[test]
    fn slices_keep_the_three_sequences_aligned(
        scales in prop::collection::vec(0.5f64..3.0, 1..12),
        bounds in (0usize..12, 0usize..12),
    ) {
        let mut suite = ModelEnsemble::new(model(scales[0]), "m0", scales[0]);
        for (idx, &scale) in scales.iter().enumerate().skip(1) {
            suite.append(model(scale), format!("m{idx}"), scale);
            prop_assert_eq!(suite.len(), idx + 1);
            prop_assert_eq!(suite.ids().len(), suite.misfits().len());
        }

        let (a, b) = bounds;
        match suite.slice(a..b) {
            Ok(sliced) => {
                prop_assert!(a < b && b <= scales.len());
                prop_assert_eq!(sliced.models(), &suite.models()[a..b]);
                prop_assert_eq!(sliced.ids(), &suite.ids()[a..b]);
                prop_assert_eq!(sliced.misfits(), &suite.misfits()[a..b]);
                prop_assert_eq!(sliced.to_string(), format!("ModelEnsemble with {} LayeredModels.", b - a));
                for (offset, entry) in sliced.iter().enumerate() {
                    prop_assert_eq!(entry, &suite[a + offset]);
                }
            }
            Err(err) => prop_assert!(a >= b || b > scales.len(), "unexpected {}", err),
        }
    }
}
