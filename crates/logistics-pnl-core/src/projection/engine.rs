use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::baseline::BaselineStatement;
use super::drivers::{CovenantThresholds, DriverConfig};
use super::params::ScenarioParameters;
use crate::error::ProjectionError;
use crate::types::{percent_of, with_metadata, ComputationOutput, Money, Multiple, Percent, Rate};
use crate::ProjectionResult;

const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Full request for one projection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInput {
    pub baseline: BaselineStatement,
    pub params: ScenarioParameters,
    #[serde(default)]
    pub drivers: DriverConfig,
    #[serde(default)]
    pub covenants: CovenantThresholds,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Target-year P&L. Every baseline line recomputed, plus the roll-up
/// aggregates and valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedStatement {
    pub revenue: Money,

    pub cogs_personnel: Money,
    pub cogs_rent: Money,
    pub cogs_utilities: Money,
    pub cogs_materials: Money,
    pub cogs_fuel: Money,
    pub total_cogs: Money,
    pub gross_profit: Money,

    pub sga_management: Money,
    pub sga_it: Money,
    pub sga_marketing: Money,
    pub sga_other: Money,
    pub total_sga: Money,
    pub total_opex: Money,

    pub ebitda: Money,
    /// `None` when projected revenue is zero
    pub ebitda_margin: Option<Percent>,

    pub depreciation: Money,
    pub ebit: Money,
    pub interest: Money,
    pub pre_tax_profit: Money,
    pub tax_rate: Percent,
    pub tax_amount: Money,
    pub net_income: Money,

    /// Accumulated automation CAPEX above the installed floor
    pub capex_requirement: Money,
    pub valuation: Money,

    pub drivers: DriverBreakdown,
}

/// Intermediate factors of each cost-driver model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverBreakdown {
    pub growth_factor: Decimal,
    pub robotization_savings: Rate,
    pub learning_curve: Rate,
    pub personnel_factor: Decimal,
    pub utilization_efficiency: Decimal,
    pub space_needed: Decimal,
    pub sga_scale_factor: Decimal,
    pub additional_depreciation: Money,
    pub additional_interest: Money,
    pub valuation_multiple: Multiple,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project the baseline to the target year with the default calibration.
pub fn project(
    baseline: &BaselineStatement,
    params: &ScenarioParameters,
) -> ProjectionResult<ProjectedStatement> {
    project_with_drivers(baseline, params, &DriverConfig::default())
}

/// Project the baseline to the target year.
///
/// Pure: no state survives the call, and identical inputs produce identical
/// statements. Out-of-contract input is rejected, never clamped.
pub fn project_with_drivers(
    baseline: &BaselineStatement,
    params: &ScenarioParameters,
    drivers: &DriverConfig,
) -> ProjectionResult<ProjectedStatement> {
    baseline.validate()?;
    params.validate()?;
    drivers.validate()?;

    let growth = params.revenue_growth / HUNDRED;

    // -- Revenue ---------------------------------------------------------
    let growth_factor = Decimal::ONE + growth;
    let revenue = baseline.revenue * growth_factor;

    // -- COGS ------------------------------------------------------------
    // Personnel: automation and learning-curve discounts compound on the
    // growth-scaled payroll.
    let robotization_savings =
        params.robotization_level / HUNDRED * drivers.robotization_efficiency_factor;
    let learning_curve = (growth * drivers.learning_curve_rate).min(drivers.learning_curve_cap);
    let personnel_factor =
        growth_factor * (Decimal::ONE - robotization_savings) * (Decimal::ONE - learning_curve);
    let cogs_personnel = baseline.cogs_personnel * personnel_factor;

    // Rent follows space: volume raises it, utilization above the reference offsets it.
    let utilization_efficiency =
        utilization_efficiency(drivers.reference_utilization, params.warehouse_utilization)?;
    let space_needed = growth_factor * utilization_efficiency;
    let cogs_rent = baseline.cogs_rent * space_needed;

    let cogs_utilities = baseline.cogs_utilities * growth_factor;
    let cogs_materials = baseline.cogs_materials * growth_factor;
    let cogs_fuel = baseline.cogs_fuel * growth_factor;

    let total_cogs = cogs_personnel + cogs_rent + cogs_utilities + cogs_materials + cogs_fuel;
    let gross_profit = revenue - total_cogs;

    // -- SG&A ------------------------------------------------------------
    let sga_scale_factor = Decimal::ONE + growth * drivers.scale_efficiency_factor;
    let sga_management = baseline.sga_management * sga_scale_factor;
    let sga_it = baseline.sga_it * sga_scale_factor;
    let sga_other = baseline.sga_other * sga_scale_factor;
    // Marketing has to keep pace with growth.
    let sga_marketing = baseline.sga_marketing * growth_factor;

    let total_sga = sga_management + sga_it + sga_marketing + sga_other;
    let total_opex = total_cogs + total_sga;

    // -- EBITDA ----------------------------------------------------------
    let ebitda = revenue - total_cogs - total_sga;
    let ebitda_margin = percent_of(ebitda, revenue);
    if ebitda_margin.is_none() {
        warn!(%revenue, "EBITDA margin undefined for projected revenue");
    }

    // -- Below EBITDA ----------------------------------------------------
    let capex_requirement = automation_capex(params.robotization_level, drivers);
    let additional_depreciation = capex_requirement
        .checked_div(drivers.asset_life_years)
        .ok_or_else(|| ProjectionError::Overflow {
            context: "automation depreciation (capexRequirement / assetLifeYears)".into(),
        })?;
    let depreciation = baseline.depreciation + additional_depreciation;
    let ebit = ebitda - depreciation;

    let additional_interest =
        capex_requirement * drivers.debt_financed_share * drivers.debt_interest_rate;
    let interest = baseline.interest + additional_interest;

    let pre_tax_profit = ebit - interest;
    let tax_amount = pre_tax_profit.max(Decimal::ZERO) * baseline.tax_rate / HUNDRED;
    let net_income = pre_tax_profit - tax_amount;

    // -- Valuation -------------------------------------------------------
    let valuation_multiple = drivers.valuation.multiple_for(params.robotization_level);
    let valuation = ebitda * valuation_multiple;

    debug!(
        %revenue,
        %ebitda,
        %net_income,
        %capex_requirement,
        %valuation,
        "projected scenario"
    );

    Ok(ProjectedStatement {
        revenue,
        cogs_personnel,
        cogs_rent,
        cogs_utilities,
        cogs_materials,
        cogs_fuel,
        total_cogs,
        gross_profit,
        sga_management,
        sga_it,
        sga_marketing,
        sga_other,
        total_sga,
        total_opex,
        ebitda,
        ebitda_margin,
        depreciation,
        ebit,
        interest,
        pre_tax_profit,
        tax_rate: baseline.tax_rate,
        tax_amount,
        net_income,
        capex_requirement,
        valuation,
        drivers: DriverBreakdown {
            growth_factor,
            robotization_savings,
            learning_curve,
            personnel_factor,
            utilization_efficiency,
            space_needed,
            sga_scale_factor,
            additional_depreciation,
            additional_interest,
            valuation_multiple,
        },
    })
}

/// Project and wrap the statement in the standard envelope, screening the
/// result against the covenant thresholds.
pub fn run_projection(
    input: &ProjectionInput,
) -> ProjectionResult<ComputationOutput<ProjectedStatement>> {
    let start = Instant::now();

    let statement = project_with_drivers(&input.baseline, &input.params, &input.drivers)?;
    let warnings = covenant_warnings(&statement, &input.drivers, &input.covenants);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Driver-based single-year P&L projection (learning curve, utilization-driven rent, \
         SG&A scale effect, automation CAPEX)",
        input,
        warnings,
        elapsed,
        statement,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn utilization_efficiency(reference: Percent, utilization: Percent) -> ProjectionResult<Decimal> {
    if utilization.is_zero() {
        return Err(ProjectionError::DivisionByZero {
            context: "utilization efficiency (warehouseUtilization = 0)".into(),
        });
    }
    Ok(reference / utilization)
}

fn automation_capex(robotization_level: Percent, drivers: &DriverConfig) -> Money {
    if robotization_level > drivers.automation_floor {
        (robotization_level - drivers.automation_floor) * drivers.capex_per_robot_percent
    } else {
        Decimal::ZERO
    }
}

fn covenant_warnings(
    statement: &ProjectedStatement,
    drivers: &DriverConfig,
    covenants: &CovenantThresholds,
) -> Vec<String> {
    let mut warnings = Vec::new();

    match statement.ebitda_margin {
        None if statement.revenue.is_zero() => {
            warnings.push("Projected revenue is zero: EBITDA margin is undefined".into())
        }
        None => {
            warnings.push("Projected revenue is too small for a defined EBITDA margin".into())
        }
        Some(margin) if margin < covenants.min_ebitda_margin => warnings.push(format!(
            "EBITDA margin {:.1}% is below the {:.1}% covenant minimum",
            margin.round_dp(1),
            covenants.min_ebitda_margin
        )),
        Some(margin) if margin < covenants.target_ebitda_margin => warnings.push(format!(
            "EBITDA margin {:.1}% is below the {:.1}% target",
            margin.round_dp(1),
            covenants.target_ebitda_margin
        )),
        Some(_) => {}
    }

    if statement.ebitda < Decimal::ZERO {
        warnings.push(format!("Negative EBITDA ({})", statement.ebitda.round_dp(1)));
    }
    if statement.net_income < Decimal::ZERO {
        warnings.push(format!("Net loss ({})", statement.net_income.round_dp(1)));
    }

    let automation_debt = statement.capex_requirement * drivers.debt_financed_share;
    if automation_debt > Decimal::ZERO {
        let leverage = if statement.ebitda > Decimal::ZERO {
            automation_debt.checked_div(statement.ebitda)
        } else {
            None
        };
        if let Some(leverage) = leverage {
            if leverage > covenants.max_debt_to_ebitda {
                warnings.push(format!(
                    "Automation debt / EBITDA {:.2}x exceeds the {:.1}x ceiling",
                    leverage.round_dp(2),
                    covenants.max_debt_to_ebitda
                ));
            }
        } else {
            warnings.push(format!(
                "Automation debt of {} cannot be serviced from EBITDA of {}",
                automation_debt.round_dp(1),
                statement.ebitda.round_dp(1)
            ));
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaselineStatement {
        BaselineStatement::reference_2026()
    }

    fn params(growth: Decimal, robots: Decimal, util: Decimal) -> ScenarioParameters {
        ScenarioParameters {
            revenue_growth: growth,
            robotization_level: robots,
            warehouse_utilization: util,
            vas_share: dec!(5),
        }
    }

    #[test]
    fn test_identity_scenario_reproduces_baseline_lines() {
        let out = project(&base(), &params(dec!(0), dec!(0), dec!(82))).unwrap();
        assert_eq!(out.revenue, dec!(550));
        assert_eq!(out.cogs_rent, dec!(65));
        assert_eq!(out.cogs_personnel, dec!(180));
        assert_eq!(out.drivers.growth_factor, Decimal::ONE);
        assert_eq!(out.drivers.utilization_efficiency, Decimal::ONE);
        assert_eq!(out.drivers.robotization_savings, Decimal::ZERO);
        assert_eq!(out.drivers.learning_curve, Decimal::ZERO);
        assert_eq!(out.ebitda, dec!(94));
        assert_eq!(out.capex_requirement, Decimal::ZERO);
    }

    #[test]
    fn test_learning_curve_example() {
        // g = 2.0, r = 0, l = min(0.10, 1.0 * 0.05) = 0.05 -> 180 * 1.90 = 342.0
        let out = project(&base(), &params(dec!(100), dec!(0), dec!(82))).unwrap();
        assert_eq!(out.drivers.growth_factor, dec!(2));
        assert_eq!(out.drivers.learning_curve, dec!(0.05));
        assert_eq!(out.drivers.personnel_factor, dec!(1.90));
        assert_eq!(out.cogs_personnel, dec!(342.0));
        assert_eq!(out.revenue, dec!(1100));
    }

    #[test]
    fn test_learning_curve_capped() {
        let out = project(&base(), &params(dec!(300), dec!(0), dec!(82))).unwrap();
        assert_eq!(out.drivers.learning_curve, dec!(0.10));
    }

    #[test]
    fn test_capex_depreciation_interest() {
        // CAPEX = (45 - 5) * 1.5 = 60; dep += 12; interest += 60 * 0.5 * 0.16 = 4.8
        let out = project(&base(), &params(dec!(0), dec!(45), dec!(82))).unwrap();
        assert_eq!(out.capex_requirement, dec!(60));
        assert_eq!(out.drivers.additional_depreciation, dec!(12));
        assert_eq!(out.depreciation, dec!(42));
        assert_eq!(out.drivers.additional_interest, dec!(4.8));
        assert_eq!(out.interest, dec!(24.8));
    }

    #[test]
    fn test_no_capex_at_or_below_floor() {
        let out = project(&base(), &params(dec!(0), dec!(5), dec!(82))).unwrap();
        assert_eq!(out.capex_requirement, Decimal::ZERO);
        assert_eq!(out.depreciation, dec!(30));
        assert_eq!(out.interest, dec!(20));
    }

    #[test]
    fn test_sga_scale_effect_and_marketing() {
        // growth 50%: s = 1 + 0.5 * 0.6 = 1.3, g = 1.5
        let out = project(&base(), &params(dec!(50), dec!(0), dec!(82))).unwrap();
        assert_eq!(out.drivers.sga_scale_factor, dec!(1.3));
        assert_eq!(out.sga_management, dec!(78));
        assert_eq!(out.sga_it, dec!(36.4));
        assert_eq!(out.sga_other, dec!(39));
        assert_eq!(out.sga_marketing, dec!(27));
        assert_eq!(out.total_sga, dec!(180.4));
    }

    #[test]
    fn test_rollup_identities() {
        let out = project(&base(), &params(dec!(120), dec!(60), dec!(91))).unwrap();
        assert_eq!(
            out.total_cogs,
            out.cogs_personnel
                + out.cogs_rent
                + out.cogs_utilities
                + out.cogs_materials
                + out.cogs_fuel
        );
        assert_eq!(out.gross_profit, out.revenue - out.total_cogs);
        assert_eq!(out.total_opex, out.total_cogs + out.total_sga);
        assert_eq!(out.ebitda, out.revenue - out.total_cogs - out.total_sga);
        assert_eq!(out.ebit, out.ebitda - out.depreciation);
        assert_eq!(out.pre_tax_profit, out.ebit - out.interest);
        assert_eq!(out.net_income, out.pre_tax_profit - out.tax_amount);
        assert_eq!(out.valuation, out.ebitda * dec!(10));
    }

    #[test]
    fn test_tax_floor_on_losses() {
        let mut b = base();
        b.interest = dec!(500);
        b.tax_rate = dec!(40);
        let out = project(&b, &params(dec!(0), dec!(0), dec!(82))).unwrap();
        assert!(out.pre_tax_profit < Decimal::ZERO);
        assert_eq!(out.tax_amount, Decimal::ZERO);
        assert_eq!(out.net_income, out.pre_tax_profit);
    }

    #[test]
    fn test_zero_revenue_margin_undefined() {
        let mut b = base();
        b.revenue = Decimal::ZERO;
        let out = project(&b, &params(dec!(10), dec!(0), dec!(82))).unwrap();
        assert_eq!(out.revenue, Decimal::ZERO);
        assert_eq!(out.ebitda_margin, None);
    }

    #[test]
    fn test_out_of_range_utilization_rejected() {
        let err = project(&base(), &params(dec!(0), dec!(0), dec!(0))).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput { .. }));
    }

    #[test]
    fn test_utilization_guard_rejects_zero() {
        let err = utilization_efficiency(dec!(82), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, ProjectionError::DivisionByZero { .. }));
    }

    #[test]
    fn test_run_projection_envelope_warnings() {
        let input = ProjectionInput {
            baseline: base(),
            params: ScenarioParameters::default(),
            drivers: DriverConfig::default(),
            covenants: CovenantThresholds::default(),
        };
        let out = run_projection(&input).unwrap();
        // Baseline margin ~17.1% is under the 18% covenant.
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("below the 18.0% covenant minimum")));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_run_projection_zero_revenue_warning() {
        let mut b = base();
        b.revenue = Decimal::ZERO;
        let input = ProjectionInput {
            baseline: b,
            params: ScenarioParameters::default(),
            drivers: DriverConfig::default(),
            covenants: CovenantThresholds::default(),
        };
        let out = run_projection(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("undefined")));
        assert!(out.warnings.iter().any(|w| w.contains("Negative EBITDA")));
    }

    #[test]
    fn test_custom_drivers_change_personnel() {
        let drivers = DriverConfig {
            robotization_efficiency_factor: dec!(0.5),
            ..Default::default()
        };
        let out = project_with_drivers(&base(), &params(dec!(0), dec!(100), dec!(82)), &drivers)
            .unwrap();
        assert_eq!(out.cogs_personnel, dec!(90));
    }
}
