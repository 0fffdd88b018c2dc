#![cfg(feature = "sensitivity")]

use logistics_pnl_core::projection::{BaselineStatement, DriverConfig, ScenarioParameters};
use logistics_pnl_core::sensitivity::{
    sensitivity_grid, sweep_lever, GridInput, Lever, LeverRange, SweepInput, SweepMetric,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn sweep(lever: Lever, min: Decimal, max: Decimal, step: Decimal) -> SweepInput {
    SweepInput {
        baseline: BaselineStatement::reference_2026(),
        params: ScenarioParameters::default(),
        drivers: DriverConfig::default(),
        range: LeverRange {
            lever,
            min,
            max,
            step,
        },
    }
}

#[test]
fn test_growth_sweep_revenue_linear() {
    let out = sweep_lever(&sweep(Lever::RevenueGrowth, dec!(0), dec!(100), dec!(25))).unwrap();
    let revenues: Vec<Decimal> = out.result.points.iter().map(|p| p.revenue).collect();
    assert_eq!(
        revenues,
        vec![dec!(550), dec!(687.5), dec!(825), dec!(962.5), dec!(1100)]
    );
    assert_eq!(out.result.base_case_index, 0);
}

#[test]
fn test_robotization_sweep_capex_rises() {
    let out =
        sweep_lever(&sweep(Lever::RobotizationLevel, dec!(10), dec!(90), dec!(20))).unwrap();
    let capex: Vec<Decimal> = out.result.points.iter().map(|p| p.capex_requirement).collect();
    for pair in capex.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn test_vas_sweep_is_flat_and_flagged() {
    let out = sweep_lever(&sweep(Lever::VasShare, dec!(0), dec!(25), dec!(5))).unwrap();
    let first = &out.result.points[0];
    assert!(out.result.points.iter().all(|p| p.ebitda == first.ebitda));
    assert!(out.warnings.iter().any(|w| w.contains("vasShare")));
}

#[test]
fn test_grid_dimensions_and_corner() {
    let input = GridInput {
        baseline: BaselineStatement::reference_2026(),
        params: ScenarioParameters::default(),
        drivers: DriverConfig::default(),
        rows: LeverRange {
            lever: Lever::RevenueGrowth,
            min: dec!(0),
            max: dec!(100),
            step: dec!(50),
        },
        columns: LeverRange {
            lever: Lever::WarehouseUtilization,
            min: dec!(82),
            max: dec!(100),
            step: dec!(9),
        },
        metric: SweepMetric::CogsRent,
    };
    let out = sensitivity_grid(&input).unwrap();
    let g = &out.result;
    assert_eq!(g.row_values.len(), 3);
    assert_eq!(g.column_values.len(), 3);
    // growth 0, utilization 82 -> rent unchanged at 65
    assert_eq!(g.matrix[0][0], Some(dec!(65)));
    // growth 100, utilization 82 -> rent doubles
    assert_eq!(g.matrix[2][0], Some(dec!(130)));
}

#[test]
fn test_vanishing_step_rejected_as_too_many_points() {
    let tiny = Decimal::new(1, 28);
    let err = sweep_lever(&sweep(Lever::RevenueGrowth, dec!(0), dec!(10000), tiny)).unwrap_err();
    assert!(err.to_string().contains("points"), "unexpected error: {err}");
}

#[test]
fn test_grid_same_lever_rejected() {
    let range = LeverRange {
        lever: Lever::VasShare,
        min: dec!(0),
        max: dec!(10),
        step: dec!(5),
    };
    let input = GridInput {
        baseline: BaselineStatement::reference_2026(),
        params: ScenarioParameters::default(),
        drivers: DriverConfig::default(),
        rows: range.clone(),
        columns: range,
        metric: SweepMetric::Ebitda,
    };
    assert!(sensitivity_grid(&input).is_err());
}

#[test]
fn test_margin_metric_undefined_on_zero_revenue() {
    let mut base = BaselineStatement::reference_2026();
    base.revenue = Decimal::ZERO;
    let input = GridInput {
        baseline: base,
        params: ScenarioParameters::default(),
        drivers: DriverConfig::default(),
        rows: LeverRange {
            lever: Lever::RevenueGrowth,
            min: dec!(0),
            max: dec!(10),
            step: dec!(10),
        },
        columns: LeverRange {
            lever: Lever::RobotizationLevel,
            min: dec!(0),
            max: dec!(10),
            step: dec!(10),
        },
        metric: SweepMetric::EbitdaMargin,
    };
    let out = sensitivity_grid(&input).unwrap();
    assert!(out.result.matrix.iter().flatten().all(|c| c.is_none()));
    assert!(!out.warnings.is_empty());
}
