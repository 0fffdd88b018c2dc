use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{validate_range, Percent};
use crate::ProjectionResult;

/// Upper bound for the revenue growth lever; open-ended above zero, but a
/// scenario beyond 10,000% is treated as a caller mistake.
pub const MAX_REVENUE_GROWTH: Decimal = dec!(10000);
pub const MIN_WAREHOUSE_UTILIZATION: Decimal = dec!(50);
pub const MAX_VAS_SHARE: Decimal = dec!(25);

/// The four strategic levers, all on a 0-100 percent scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParameters {
    /// Target-year revenue growth over the baseline (>= 0)
    pub revenue_growth: Percent,
    /// AMR automation penetration (0-100)
    pub robotization_level: Percent,
    /// Warehouse capacity utilization (50-100)
    pub warehouse_utilization: Percent,
    /// Share of value-added services (0-25). Carried through to the
    /// advisory snapshot; no cost driver uses it yet.
    pub vas_share: Percent,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        ScenarioParameters {
            revenue_growth: Decimal::ZERO,
            robotization_level: dec!(5),
            warehouse_utilization: dec!(82),
            vas_share: dec!(5),
        }
    }
}

impl ScenarioParameters {
    pub fn validate(&self) -> ProjectionResult<()> {
        validate_range("revenueGrowth", self.revenue_growth, Decimal::ZERO, MAX_REVENUE_GROWTH)?;
        validate_range("robotizationLevel", self.robotization_level, Decimal::ZERO, dec!(100))?;
        validate_range(
            "warehouseUtilization",
            self.warehouse_utilization,
            MIN_WAREHOUSE_UTILIZATION,
            dec!(100),
        )?;
        validate_range("vasShare", self.vas_share, Decimal::ZERO, MAX_VAS_SHARE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectionError;

    #[test]
    fn test_default_matches_opening_scenario() {
        let p = ScenarioParameters::default();
        assert_eq!(p.revenue_growth, dec!(0));
        assert_eq!(p.robotization_level, dec!(5));
        assert_eq!(p.warehouse_utilization, dec!(82));
        assert_eq!(p.vas_share, dec!(5));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_negative_growth_rejected() {
        let p = ScenarioParameters {
            revenue_growth: dec!(-5),
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_zero_utilization_rejected() {
        let p = ScenarioParameters {
            warehouse_utilization: Decimal::ZERO,
            ..Default::default()
        };
        match p.validate().unwrap_err() {
            ProjectionError::InvalidInput { field, .. } => {
                assert_eq!(field, "warehouseUtilization")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_robotization_above_100_rejected() {
        let p = ScenarioParameters {
            robotization_level: dec!(100.01),
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_vas_share_bounds() {
        let mut p = ScenarioParameters {
            vas_share: dec!(25),
            ..Default::default()
        };
        assert!(p.validate().is_ok());
        p.vas_share = dec!(26);
        assert!(p.validate().is_err());
    }
}
