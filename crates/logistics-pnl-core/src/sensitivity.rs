use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::ProjectionError;
use crate::projection::params::{MAX_REVENUE_GROWTH, MAX_VAS_SHARE, MIN_WAREHOUSE_UTILIZATION};
use crate::projection::{
    project_with_drivers, BaselineStatement, DriverConfig, ProjectedStatement, ScenarioParameters,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::ProjectionResult;

const MAX_POINTS: usize = 10_000;

// ---------------------------------------------------------------------------
// Levers and metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Lever {
    RevenueGrowth,
    RobotizationLevel,
    WarehouseUtilization,
    VasShare,
}

impl Lever {
    /// Valid range of the lever, inclusive.
    pub fn bounds(self) -> (Percent, Percent) {
        match self {
            Lever::RevenueGrowth => (Decimal::ZERO, MAX_REVENUE_GROWTH),
            Lever::RobotizationLevel => (Decimal::ZERO, dec!(100)),
            Lever::WarehouseUtilization => (MIN_WAREHOUSE_UTILIZATION, dec!(100)),
            Lever::VasShare => (Decimal::ZERO, MAX_VAS_SHARE),
        }
    }

    fn apply(self, params: &ScenarioParameters, value: Percent) -> ScenarioParameters {
        let mut p = params.clone();
        match self {
            Lever::RevenueGrowth => p.revenue_growth = value,
            Lever::RobotizationLevel => p.robotization_level = value,
            Lever::WarehouseUtilization => p.warehouse_utilization = value,
            Lever::VasShare => p.vas_share = value,
        }
        p
    }

    fn current(self, params: &ScenarioParameters) -> Percent {
        match self {
            Lever::RevenueGrowth => params.revenue_growth,
            Lever::RobotizationLevel => params.robotization_level,
            Lever::WarehouseUtilization => params.warehouse_utilization,
            Lever::VasShare => params.vas_share,
        }
    }
}

impl fmt::Display for Lever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lever::RevenueGrowth => "revenueGrowth",
            Lever::RobotizationLevel => "robotizationLevel",
            Lever::WarehouseUtilization => "warehouseUtilization",
            Lever::VasShare => "vasShare",
        };
        f.write_str(name)
    }
}

impl FromStr for Lever {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace(['_', '-'], "").to_lowercase().as_str() {
            "revenuegrowth" | "growth" => Ok(Lever::RevenueGrowth),
            "robotizationlevel" | "robotization" => Ok(Lever::RobotizationLevel),
            "warehouseutilization" | "utilization" => Ok(Lever::WarehouseUtilization),
            "vasshare" | "vas" => Ok(Lever::VasShare),
            _ => Err(ProjectionError::InvalidInput {
                field: "lever".into(),
                reason: format!(
                    "Unknown lever '{s}'. Available: revenueGrowth, robotizationLevel, \
                     warehouseUtilization, vasShare"
                ),
            }),
        }
    }
}

/// Output figure tracked in a two-way grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SweepMetric {
    Revenue,
    CogsPersonnel,
    CogsRent,
    Ebitda,
    EbitdaMargin,
    NetIncome,
    CapexRequirement,
    Valuation,
}

impl SweepMetric {
    pub fn extract(self, s: &ProjectedStatement) -> Option<Decimal> {
        match self {
            SweepMetric::Revenue => Some(s.revenue),
            SweepMetric::CogsPersonnel => Some(s.cogs_personnel),
            SweepMetric::CogsRent => Some(s.cogs_rent),
            SweepMetric::Ebitda => Some(s.ebitda),
            SweepMetric::EbitdaMargin => s.ebitda_margin,
            SweepMetric::NetIncome => Some(s.net_income),
            SweepMetric::CapexRequirement => Some(s.capex_requirement),
            SweepMetric::Valuation => Some(s.valuation),
        }
    }
}

impl FromStr for SweepMetric {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace(['_', '-'], "").to_lowercase().as_str() {
            "revenue" => Ok(SweepMetric::Revenue),
            "cogspersonnel" | "personnel" => Ok(SweepMetric::CogsPersonnel),
            "cogsrent" | "rent" => Ok(SweepMetric::CogsRent),
            "ebitda" => Ok(SweepMetric::Ebitda),
            "ebitdamargin" | "margin" => Ok(SweepMetric::EbitdaMargin),
            "netincome" => Ok(SweepMetric::NetIncome),
            "capexrequirement" | "capex" => Ok(SweepMetric::CapexRequirement),
            "valuation" => Ok(SweepMetric::Valuation),
            _ => Err(ProjectionError::InvalidInput {
                field: "metric".into(),
                reason: format!("Unknown metric '{s}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Sweep range for one lever: `min..=max` by `step`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverRange {
    pub lever: Lever,
    pub min: Percent,
    pub max: Percent,
    pub step: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepInput {
    pub baseline: BaselineStatement,
    /// Scenario the swept lever is varied around; other levers stay fixed
    pub params: ScenarioParameters,
    #[serde(default)]
    pub drivers: DriverConfig,
    pub range: LeverRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridInput {
    pub baseline: BaselineStatement,
    pub params: ScenarioParameters,
    #[serde(default)]
    pub drivers: DriverConfig,
    pub rows: LeverRange,
    pub columns: LeverRange,
    pub metric: SweepMetric,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepPoint {
    pub value: Percent,
    pub revenue: Money,
    pub ebitda: Money,
    pub ebitda_margin: Option<Percent>,
    pub net_income: Money,
    pub capex_requirement: Money,
    pub valuation: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverSweep {
    pub lever: Lever,
    pub points: Vec<SweepPoint>,
    /// Index of the point closest to the scenario's current lever value
    pub base_case_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityGrid {
    pub row_lever: Lever,
    pub column_lever: Lever,
    pub row_values: Vec<Percent>,
    pub column_values: Vec<Percent>,
    pub metric: SweepMetric,
    /// matrix[i][j] = metric at (row_values[i], column_values[j])
    pub matrix: Vec<Vec<Option<Decimal>>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Re-project the scenario at each value of one lever.
pub fn sweep_lever(input: &SweepInput) -> ProjectionResult<ComputationOutput<LeverSweep>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let values = generate_sweep_values(&input.range)?;
    let lever = input.range.lever;

    let mut points = Vec::with_capacity(values.len());
    for value in &values {
        let params = lever.apply(&input.params, *value);
        let s = project_with_drivers(&input.baseline, &params, &input.drivers)?;
        if s.ebitda_margin.is_none() {
            warnings.push(format!("{lever} = {value}: EBITDA margin undefined"));
        }
        points.push(SweepPoint {
            value: *value,
            revenue: s.revenue,
            ebitda: s.ebitda,
            ebitda_margin: s.ebitda_margin,
            net_income: s.net_income,
            capex_requirement: s.capex_requirement,
            valuation: s.valuation,
        });
    }

    if lever == Lever::VasShare {
        warnings.push("vasShare is not referenced by any cost driver; outputs are flat".into());
    }

    let base_case_index = closest_index(&values, lever.current(&input.params));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "One-way lever sensitivity",
        &serde_json::json!({
            "lever": lever,
            "min": input.range.min.to_string(),
            "max": input.range.max.to_string(),
            "step": input.range.step.to_string(),
        }),
        warnings,
        elapsed,
        LeverSweep {
            lever,
            points,
            base_case_index,
        },
    ))
}

/// Two-way grid of one metric over two levers.
pub fn sensitivity_grid(input: &GridInput) -> ProjectionResult<ComputationOutput<SensitivityGrid>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.rows.lever == input.columns.lever {
        return Err(ProjectionError::InvalidInput {
            field: "columns.lever".into(),
            reason: "Row and column levers must differ".into(),
        });
    }

    let row_values = generate_sweep_values(&input.rows)?;
    let column_values = generate_sweep_values(&input.columns)?;
    if row_values.len() * column_values.len() > MAX_POINTS {
        return Err(ProjectionError::InvalidInput {
            field: "step".into(),
            reason: format!("Grid exceeds {MAX_POINTS} points"),
        });
    }

    let mut matrix = Vec::with_capacity(row_values.len());
    for rv in &row_values {
        let row_params = input.rows.lever.apply(&input.params, *rv);
        let mut row = Vec::with_capacity(column_values.len());
        for cv in &column_values {
            let params = input.columns.lever.apply(&row_params, *cv);
            let s = project_with_drivers(&input.baseline, &params, &input.drivers)?;
            let cell = input.metric.extract(&s);
            if cell.is_none() {
                warnings.push(format!("Metric undefined at ({rv}, {cv})"));
            }
            row.push(cell);
        }
        matrix.push(row);
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-way lever sensitivity grid",
        &serde_json::json!({
            "rows": input.rows.lever,
            "columns": input.columns.lever,
            "metric": input.metric,
        }),
        warnings,
        elapsed,
        SensitivityGrid {
            row_lever: input.rows.lever,
            column_lever: input.columns.lever,
            row_values,
            column_values,
            metric: input.metric,
            matrix,
        },
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sweep values from min to max by step; max is always included.
fn generate_sweep_values(range: &LeverRange) -> ProjectionResult<Vec<Decimal>> {
    let field = format!("range:{}", range.lever);
    if range.step <= Decimal::ZERO {
        return Err(ProjectionError::InvalidInput {
            field,
            reason: "Step must be positive".into(),
        });
    }
    if range.min > range.max {
        return Err(ProjectionError::InvalidInput {
            field,
            reason: "Min must be <= max".into(),
        });
    }
    let (lo, hi) = range.lever.bounds();
    if range.min < lo || range.max > hi {
        return Err(ProjectionError::InvalidInput {
            field,
            reason: format!("Sweep must stay within [{lo}, {hi}]"),
        });
    }

    // A step small enough to overflow the division is far past the cap too.
    let too_many = match (range.max - range.min).checked_div(range.step) {
        Some(count) => count >= Decimal::from(MAX_POINTS as u64),
        None => true,
    };
    if too_many {
        return Err(ProjectionError::InvalidInput {
            field,
            reason: format!("Sweep exceeds {MAX_POINTS} points"),
        });
    }

    let mut values = Vec::new();
    let mut current = range.min;
    while current <= range.max {
        values.push(current);
        current += range.step;
    }
    if let Some(&last) = values.last() {
        if last < range.max {
            values.push(range.max);
        }
    }
    Ok(values)
}

fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(lever: Lever, min: Decimal, max: Decimal, step: Decimal) -> LeverRange {
        LeverRange {
            lever,
            min,
            max,
            step,
        }
    }

    #[test]
    fn test_sweep_values_include_max() {
        let v = generate_sweep_values(&range(Lever::RobotizationLevel, dec!(0), dec!(25), dec!(10)))
            .unwrap();
        assert_eq!(v, vec![dec!(0), dec!(10), dec!(20), dec!(25)]);
    }

    #[test]
    fn test_sweep_rejects_out_of_contract_bounds() {
        let r = range(Lever::WarehouseUtilization, dec!(40), dec!(100), dec!(10));
        assert!(generate_sweep_values(&r).is_err());
    }

    #[test]
    fn test_sweep_rejects_zero_step() {
        let r = range(Lever::RevenueGrowth, dec!(0), dec!(100), dec!(0));
        assert!(generate_sweep_values(&r).is_err());
    }

    #[test]
    fn test_sweep_rejects_too_many_points() {
        let r = range(Lever::RevenueGrowth, dec!(0), dec!(10000), dec!(0.5));
        assert!(generate_sweep_values(&r).is_err());
    }

    #[test]
    fn test_lever_parse_aliases() {
        assert_eq!("robotization_level".parse::<Lever>().unwrap(), Lever::RobotizationLevel);
        assert_eq!("warehouseUtilization".parse::<Lever>().unwrap(), Lever::WarehouseUtilization);
        assert_eq!("vas".parse::<Lever>().unwrap(), Lever::VasShare);
        assert!("headcount".parse::<Lever>().is_err());
    }

    #[test]
    fn test_closest_index() {
        let v = vec![dec!(50), dec!(60), dec!(70)];
        assert_eq!(closest_index(&v, dec!(64)), 1);
        assert_eq!(closest_index(&v, dec!(82)), 2);
    }
}
