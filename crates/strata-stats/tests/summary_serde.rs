use strata_core::LayeredModel;
use strata_stats::{summarize, EnsembleSummary, StatsOpts};
use strata_suite::{from_json_str, to_json_string, ModelEnsemble, Selection};

#[test]
fn summary_collects_every_statistic() {
    let a = LayeredModel::new([5.0, 20.0, 0.0], [300.0, 600.0, 800.0], [150.0, 300.0, 400.0], [2000.0; 3])
        .unwrap();
    let b = LayeredModel::new([0.0], [800.0], [400.0], [2000.0]).unwrap();
    let mut suite = ModelEnsemble::new(a.clone(), "a", 0.7);
    suite.append(b, "b", 0.2);
    suite.append(a.clone(), "c", 0.4);

    let summary = summarize(&suite, Selection::Best(2), &StatsOpts::with_grid(40.0, 0.5)).unwrap();
    assert_eq!(summary.population, 3);
    assert_eq!(summary.ids, vec!["b", "c"]);
    assert_eq!(summary.misfits, vec![0.2, 0.4]);
    assert_eq!(summary.vs30.len(), 2);
    assert!((summary.vs30[0] - 400.0).abs() < 1e-12);
    assert_eq!(summary.sigma_ln_vs.depth.len(), 81);
    assert_eq!(summary.median.layer_count(), 3);

    let json = to_json_string(&summary).unwrap();
    let decoded: EnsembleSummary = from_json_str(&json).unwrap();
    assert_eq!(decoded.selection, Selection::Best(2));
    assert_eq!(decoded.ids, summary.ids);
    assert_eq!(decoded.median, summary.median);
    assert_eq!(decoded.sigma_ln_vs.depth, summary.sigma_ln_vs.depth);
    for (a, b) in decoded.sigma_ln_vs.sigma.iter().zip(&summary.sigma_ln_vs.sigma) {
        assert!((a - b).abs() < 1e-12);
    }
}
