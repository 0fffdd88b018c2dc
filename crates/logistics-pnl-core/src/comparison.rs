use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::projection::engine::ProjectionInput;
use crate::projection::{
    project_with_drivers, BaselineStatement, CovenantThresholds, DriverConfig, ProjectedStatement,
};
use crate::types::{percent_of, with_metadata, ComputationOutput, Money, Percent};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Baseline vs projected figure for one cost line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLineVariance {
    pub line: String,
    pub baseline: Money,
    pub projected: Money,
    /// projected - baseline (positive = cost increase)
    pub change: Money,
    /// change / baseline in percent; `None` when the baseline line is zero
    pub change_pct: Option<Percent>,
    /// Share of projected revenue in percent; `None` when revenue is zero
    pub pct_of_revenue: Option<Percent>,
}

/// Where the scenario lands relative to the unprojected plan and the targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineComparison {
    pub baseline_revenue: Money,
    pub baseline_total_cogs: Money,
    pub baseline_total_sga: Money,
    pub baseline_ebitda: Money,
    pub baseline_ebitda_margin: Option<Percent>,
    pub baseline_net_income: Money,
    /// Baseline EBITDA at the multiple the installed automation floor earns
    pub baseline_valuation: Money,

    pub revenue_change: Money,
    pub ebitda_change: Money,
    pub net_income_change: Money,
    /// Percentage-point change in EBITDA margin
    pub ebitda_margin_change_pts: Option<Decimal>,
    pub valuation_uplift: Money,

    pub cost_lines: Vec<CostLineVariance>,

    pub meets_target_margin: bool,
    pub meets_covenant_margin: bool,
    /// `None` when no revenue target is set
    pub meets_target_revenue: Option<bool>,
    /// `None` when no EBITDA target is set
    pub meets_target_ebitda: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub projected: ProjectedStatement,
    pub comparison: BaselineComparison,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare a projected statement with the baseline it came from.
pub fn compare_to_baseline(
    baseline: &BaselineStatement,
    projected: &ProjectedStatement,
    drivers: &DriverConfig,
    covenants: &CovenantThresholds,
) -> BaselineComparison {
    let baseline_ebitda = baseline.ebitda();
    let baseline_ebitda_margin = baseline.ebitda_margin();
    let baseline_valuation =
        baseline_ebitda * drivers.valuation.multiple_for(drivers.automation_floor);

    let ebitda_margin_change_pts = match (projected.ebitda_margin, baseline_ebitda_margin) {
        (Some(p), Some(b)) => Some(p - b),
        _ => None,
    };

    let lines = [
        ("cogsPersonnel", baseline.cogs_personnel, projected.cogs_personnel),
        ("cogsRent", baseline.cogs_rent, projected.cogs_rent),
        ("cogsUtilities", baseline.cogs_utilities, projected.cogs_utilities),
        ("cogsMaterials", baseline.cogs_materials, projected.cogs_materials),
        ("cogsFuel", baseline.cogs_fuel, projected.cogs_fuel),
        ("sgaManagement", baseline.sga_management, projected.sga_management),
        ("sgaIt", baseline.sga_it, projected.sga_it),
        ("sgaMarketing", baseline.sga_marketing, projected.sga_marketing),
        ("sgaOther", baseline.sga_other, projected.sga_other),
    ];
    let cost_lines = lines
        .iter()
        .map(|(line, base, proj)| CostLineVariance {
            line: (*line).to_string(),
            baseline: *base,
            projected: *proj,
            change: *proj - *base,
            change_pct: percent_of(*proj - *base, *base),
            pct_of_revenue: percent_of(*proj, projected.revenue),
        })
        .collect();

    let margin_at_least =
        |floor: Percent| projected.ebitda_margin.map(|m| m >= floor).unwrap_or(false);

    BaselineComparison {
        baseline_revenue: baseline.revenue,
        baseline_total_cogs: baseline.total_cogs(),
        baseline_total_sga: baseline.total_sga(),
        baseline_ebitda,
        baseline_ebitda_margin,
        baseline_net_income: baseline.net_income(),
        baseline_valuation,
        revenue_change: projected.revenue - baseline.revenue,
        ebitda_change: projected.ebitda - baseline_ebitda,
        net_income_change: projected.net_income - baseline.net_income(),
        ebitda_margin_change_pts,
        valuation_uplift: projected.valuation - baseline_valuation,
        cost_lines,
        meets_target_margin: margin_at_least(covenants.target_ebitda_margin),
        meets_covenant_margin: margin_at_least(covenants.min_ebitda_margin),
        meets_target_revenue: covenants.target_revenue.map(|t| projected.revenue >= t),
        meets_target_ebitda: covenants.target_ebitda.map(|t| projected.ebitda >= t),
    }
}

/// Project the scenario and compare it with its baseline.
pub fn run_comparison(
    input: &ProjectionInput,
) -> ProjectionResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let projected = project_with_drivers(&input.baseline, &input.params, &input.drivers)?;
    let comparison =
        compare_to_baseline(&input.baseline, &projected, &input.drivers, &input.covenants);

    if comparison.ebitda_change < Decimal::ZERO {
        warnings.push(format!(
            "Scenario EBITDA is {} below the baseline",
            (-comparison.ebitda_change).round_dp(1)
        ));
    }
    if !comparison.meets_covenant_margin {
        warnings.push("Scenario does not meet the minimum EBITDA margin covenant".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Baseline vs scenario P&L variance",
        input,
        warnings,
        elapsed,
        ScenarioComparison {
            projected,
            comparison,
        },
    ))
}
