use shardgate_route::{
    obs::{RouteMetricsReport, metrics_report, metrics_reset_all},
    prelude::*,
};

// Counters are process-wide, so this binary holds a single test.
#[test]
fn reset_clears_every_counter() {
    let table = TableConfig::new("orders", "g1", "shop");
    let config =
        AlgorithmConfig::new(AlgorithmKind::AutoDate).with_param("format-pattern", "yyyyMM");
    let algorithm = AlgorithmKind::build(&config).unwrap();

    algorithm
        .calculate(&table, RouteInfo::for_table(&table), "2024-01-30")
        .unwrap();
    algorithm
        .calculate_range(
            &table,
            vec![RouteInfo::for_table(&table)],
            Some("2024-01"),
            Some("2024-03"),
        )
        .unwrap();
    let rejected = algorithm.calculate(&table, RouteInfo::for_table(&table), "someday");
    assert!(rejected.is_err());

    let report = metrics_report();
    assert_eq!(report.quick_format, 1);
    assert_eq!(report.range_calls, 1);
    assert_eq!(report.range_routes, 3);
    assert_eq!(report.values_rejected, 1);

    metrics_reset_all();

    assert_eq!(metrics_report(), RouteMetricsReport::default());
}
