use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::types::{
    validate_amount, validate_range, Money, Multiple, Percent, Rate, Years, MAX_MULTIPLE,
};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Cost-driver calibration
// ---------------------------------------------------------------------------

/// Named calibration constants for the cost-driver models.
///
/// Every field has a default; a JSON/YAML file may override any subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriverConfig {
    /// Fractional payroll reduction at 100% automation
    pub robotization_efficiency_factor: Rate,
    /// Learning-curve discount accrued per unit of growth factor
    pub learning_curve_rate: Rate,
    /// Ceiling on the learning-curve discount
    pub learning_curve_cap: Rate,
    /// Utilization (percent) at which the current rent footprint is sized
    pub reference_utilization: Percent,
    /// Share of revenue growth passed through to fixed overhead
    pub scale_efficiency_factor: Rate,
    /// Automation level already installed in the baseline; CAPEX accrues above it
    pub automation_floor: Percent,
    /// CAPEX per percentage point of automation above the floor
    pub capex_per_robot_percent: Money,
    /// Straight-line life of automation equipment
    pub asset_life_years: Years,
    /// Portion of automation CAPEX financed with debt
    pub debt_financed_share: Rate,
    /// Annual rate on automation debt
    pub debt_interest_rate: Rate,
    pub valuation: ValuationTiers,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            robotization_efficiency_factor: dec!(0.35),
            learning_curve_rate: dec!(0.05),
            learning_curve_cap: dec!(0.10),
            reference_utilization: dec!(82),
            scale_efficiency_factor: dec!(0.6),
            automation_floor: dec!(5),
            capex_per_robot_percent: dec!(1.5),
            asset_life_years: dec!(5),
            debt_financed_share: dec!(0.5),
            debt_interest_rate: dec!(0.16),
            valuation: ValuationTiers::default(),
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> ProjectionResult<()> {
        let fractions = [
            ("robotizationEfficiencyFactor", self.robotization_efficiency_factor),
            ("learningCurveRate", self.learning_curve_rate),
            ("learningCurveCap", self.learning_curve_cap),
            ("scaleEfficiencyFactor", self.scale_efficiency_factor),
            ("debtFinancedShare", self.debt_financed_share),
            ("debtInterestRate", self.debt_interest_rate),
        ];
        for (field, value) in fractions {
            validate_range(field, value, Decimal::ZERO, Decimal::ONE)?;
        }
        validate_range("automationFloor", self.automation_floor, Decimal::ZERO, dec!(100))?;
        validate_amount("capexPerRobotPercent", self.capex_per_robot_percent)?;

        if self.reference_utilization <= Decimal::ZERO || self.reference_utilization > dec!(100) {
            return Err(ProjectionError::InvalidInput {
                field: "referenceUtilization".into(),
                reason: format!(
                    "Reference utilization must be in (0, 100], got {}",
                    self.reference_utilization
                ),
            });
        }
        if self.asset_life_years <= Decimal::ZERO {
            return Err(ProjectionError::InvalidInput {
                field: "assetLifeYears".into(),
                reason: "Asset life must be positive".into(),
            });
        }
        self.valuation.validate()
    }
}

// ---------------------------------------------------------------------------
// Valuation tiers
// ---------------------------------------------------------------------------

/// EV/EBITDA multiple tiers keyed on automation maturity. Thresholds are
/// exclusive: a level must be strictly above a threshold to earn its tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValuationTiers {
    pub tech_threshold: Percent,
    pub tech_multiple: Multiple,
    pub automated_threshold: Percent,
    pub automated_multiple: Multiple,
    /// Plain 3PL multiple
    pub standard_multiple: Multiple,
}

impl Default for ValuationTiers {
    fn default() -> Self {
        ValuationTiers {
            tech_threshold: dec!(50),
            tech_multiple: dec!(10),
            automated_threshold: dec!(20),
            automated_multiple: dec!(8),
            standard_multiple: dec!(6),
        }
    }
}

impl ValuationTiers {
    pub fn multiple_for(&self, robotization_level: Percent) -> Multiple {
        if robotization_level > self.tech_threshold {
            self.tech_multiple
        } else if robotization_level > self.automated_threshold {
            self.automated_multiple
        } else {
            self.standard_multiple
        }
    }

    fn validate(&self) -> ProjectionResult<()> {
        if self.automated_threshold > self.tech_threshold {
            return Err(ProjectionError::InvalidInput {
                field: "valuation.automatedThreshold".into(),
                reason: "Automated threshold must not exceed tech threshold".into(),
            });
        }
        let multiples = [
            ("valuation.techMultiple", self.tech_multiple),
            ("valuation.automatedMultiple", self.automated_multiple),
            ("valuation.standardMultiple", self.standard_multiple),
        ];
        for (field, value) in multiples {
            validate_range(field, value, Decimal::ZERO, MAX_MULTIPLE)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Covenants and targets
// ---------------------------------------------------------------------------

/// Lender covenants and the strategic targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CovenantThresholds {
    /// Strategic EBITDA margin target (percent)
    pub target_ebitda_margin: Percent,
    /// Strategic revenue target; `null` disables the check
    pub target_revenue: Option<Money>,
    /// Strategic EBITDA target; `null` disables the check
    pub target_ebitda: Option<Money>,
    /// Covenant floor on EBITDA margin (percent)
    pub min_ebitda_margin: Percent,
    /// Ceiling on debt / EBITDA
    pub max_debt_to_ebitda: Multiple,
}

impl Default for CovenantThresholds {
    fn default() -> Self {
        CovenantThresholds {
            target_ebitda_margin: dec!(25),
            // ~280% growth on the 2026 plan, at the 25% margin target
            target_revenue: Some(dec!(2090)),
            target_ebitda: Some(dec!(522.5)),
            min_ebitda_margin: dec!(18),
            max_debt_to_ebitda: dec!(3.0),
        }
    }
}
