use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{percent_of, validate_amount, validate_range, Money, Percent};
use crate::ProjectionResult;

/// Prior-period P&L actuals the projection starts from.
///
/// All monetary fields share one currency unit (millions-equivalent). The
/// statement is only changed by explicit user edits; the engine never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineStatement {
    pub revenue: Money,

    /// Operational staff payroll
    pub cogs_personnel: Money,
    /// Warehouse rent
    pub cogs_rent: Money,
    pub cogs_utilities: Money,
    /// Packaging materials
    pub cogs_materials: Money,
    pub cogs_fuel: Money,

    pub sga_management: Money,
    /// IT and WMS licences
    pub sga_it: Money,
    pub sga_marketing: Money,
    pub sga_other: Money,

    pub depreciation: Money,
    /// Interest expense on existing debt
    pub interest: Money,
    /// Corporate tax rate, 0-100
    pub tax_rate: Percent,
}

impl BaselineStatement {
    /// The 2026 plan the scenario levers are calibrated against:
    /// revenue 550, EBITDA 94 (17.1% margin).
    pub fn reference_2026() -> Self {
        BaselineStatement {
            revenue: dec!(550),
            cogs_personnel: dec!(180),
            cogs_rent: dec!(65),
            cogs_utilities: dec!(18),
            cogs_materials: dec!(22),
            cogs_fuel: dec!(35),
            sga_management: dec!(60),
            sga_it: dec!(28),
            sga_marketing: dec!(18),
            sga_other: dec!(30),
            depreciation: dec!(30),
            interest: dec!(20),
            tax_rate: dec!(20),
        }
    }

    /// Reject negative or oversized amounts and out-of-range tax rates.
    /// Nothing is clamped.
    pub fn validate(&self) -> ProjectionResult<()> {
        validate_amount("revenue", self.revenue)?;
        validate_amount("cogsPersonnel", self.cogs_personnel)?;
        validate_amount("cogsRent", self.cogs_rent)?;
        validate_amount("cogsUtilities", self.cogs_utilities)?;
        validate_amount("cogsMaterials", self.cogs_materials)?;
        validate_amount("cogsFuel", self.cogs_fuel)?;
        validate_amount("sgaManagement", self.sga_management)?;
        validate_amount("sgaIt", self.sga_it)?;
        validate_amount("sgaMarketing", self.sga_marketing)?;
        validate_amount("sgaOther", self.sga_other)?;
        validate_amount("depreciation", self.depreciation)?;
        validate_amount("interest", self.interest)?;
        validate_range("taxRate", self.tax_rate, Decimal::ZERO, dec!(100))?;
        Ok(())
    }

    pub fn total_cogs(&self) -> Money {
        self.cogs_personnel
            + self.cogs_rent
            + self.cogs_utilities
            + self.cogs_materials
            + self.cogs_fuel
    }

    pub fn total_sga(&self) -> Money {
        self.sga_management + self.sga_it + self.sga_marketing + self.sga_other
    }

    pub fn ebitda(&self) -> Money {
        self.revenue - self.total_cogs() - self.total_sga()
    }

    /// EBITDA margin in percent; `None` when revenue is zero.
    pub fn ebitda_margin(&self) -> Option<Percent> {
        percent_of(self.ebitda(), self.revenue)
    }

    /// Net income with no scenario applied: same tax floor as the projection.
    pub fn net_income(&self) -> Money {
        let pre_tax = self.ebitda() - self.depreciation - self.interest;
        let tax = pre_tax.max(Decimal::ZERO) * self.tax_rate / dec!(100);
        pre_tax - tax
    }
}
