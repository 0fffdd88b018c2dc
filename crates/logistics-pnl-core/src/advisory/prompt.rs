use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::projection::{CovenantThresholds, ProjectedStatement, ScenarioParameters};
use crate::types::round_fixed;

const DECIMAL_PLACES: u32 = 1;
const SEPARATOR: &str = "--------------------------------------------------";

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Fixed preamble material: who the advisor plays and which limits apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvisoryContext {
    pub company_profile: String,
    pub target_year: i32,
    pub covenants: CovenantThresholds,
    pub rules: Vec<String>,
}

impl Default for AdvisoryContext {
    fn default() -> Self {
        AdvisoryContext {
            company_profile: "You are the virtual CFO of FD Logistics, a 3PL operator \
                              specialising in dangerous goods warehousing."
                .into(),
            target_year: 2029,
            covenants: CovenantThresholds::default(),
            rules: vec![
                "Robots cut payroll but raise CAPEX, depreciation and interest.".into(),
                "SG&A must grow slower than revenue (scale effect).".into(),
                "Higher warehouse utilization dilutes rent.".into(),
            ],
        }
    }
}

impl AdvisoryContext {
    pub fn preamble(&self) -> String {
        let mut out = String::new();
        let c = &self.covenants;
        let _ = writeln!(out, "{}", self.company_profile);
        let _ = writeln!(
            out,
            "Goal: EBITDA margin of {}% by {}.",
            round_fixed(c.target_ebitda_margin, DECIMAL_PLACES),
            self.target_year
        );
        let _ = writeln!(out, "Constraints:");
        let _ = writeln!(
            out,
            "- Minimum EBITDA margin covenant: {}%.",
            round_fixed(c.min_ebitda_margin, DECIMAL_PLACES)
        );
        let _ = writeln!(
            out,
            "- Debt/EBITDA must stay below {}x.",
            round_fixed(c.max_debt_to_ebitda, DECIMAL_PLACES)
        );
        for rule in &self.rules {
            let _ = writeln!(out, "- {rule}");
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One rendered field of the snapshot. `key` is the wire name of the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Rounded, ordered rendering of the levers and every projected line.
///
/// Monetary values and percentages carry one decimal place (half away from
/// zero); an undefined margin renders as `undefined`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorySnapshot {
    pub scenario: Vec<SnapshotLine>,
    pub statement: Vec<SnapshotLine>,
}

impl AdvisorySnapshot {
    pub fn capture(params: &ScenarioParameters, s: &ProjectedStatement) -> Self {
        let scenario = vec![
            pct("revenueGrowth", "Revenue growth", params.revenue_growth),
            pct("robotizationLevel", "Robotization level", params.robotization_level),
            pct("warehouseUtilization", "Warehouse utilization", params.warehouse_utilization),
            pct("vasShare", "VAS share", params.vas_share),
        ];

        let margin = match s.ebitda_margin {
            Some(m) => format!("{}%", round_fixed(m, DECIMAL_PLACES)),
            None => "undefined".to_string(),
        };

        let statement = vec![
            money("revenue", "Revenue", s.revenue),
            money("cogsPersonnel", "Operations payroll", s.cogs_personnel),
            money("cogsRent", "Warehouse rent", s.cogs_rent),
            money("cogsUtilities", "Utilities", s.cogs_utilities),
            money("cogsMaterials", "Packaging materials", s.cogs_materials),
            money("cogsFuel", "Fuel", s.cogs_fuel),
            money("totalCogs", "Total COGS", s.total_cogs),
            money("grossProfit", "Gross profit", s.gross_profit),
            money("sgaManagement", "Management payroll", s.sga_management),
            money("sgaIt", "IT and WMS", s.sga_it),
            money("sgaMarketing", "Marketing and sales", s.sga_marketing),
            money("sgaOther", "Other overhead", s.sga_other),
            money("totalSga", "Total SG&A", s.total_sga),
            money("totalOpex", "Total operating expense", s.total_opex),
            money("ebitda", "EBITDA", s.ebitda),
            line("ebitdaMargin", "EBITDA margin", margin),
            money("depreciation", "Depreciation", s.depreciation),
            money("ebit", "EBIT", s.ebit),
            money("interest", "Interest expense", s.interest),
            money("preTaxProfit", "Pre-tax profit", s.pre_tax_profit),
            pct("taxRate", "Tax rate", s.tax_rate),
            money("taxAmount", "Tax", s.tax_amount),
            money("netIncome", "Net income", s.net_income),
            money("capexRequirement", "Automation CAPEX", s.capex_requirement),
            money("valuation", "Valuation", s.valuation),
        ];

        AdvisorySnapshot {
            scenario,
            statement,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "LEVERS:");
        for l in &self.scenario {
            let _ = writeln!(out, "- {} [{}]: {}", l.label, l.key, l.value);
        }
        let _ = writeln!(out, "P&L (millions):");
        for l in &self.statement {
            let _ = writeln!(out, "- {} [{}]: {}", l.label, l.key, l.value);
        }
        out
    }
}

fn line(key: &str, label: &str, value: String) -> SnapshotLine {
    SnapshotLine {
        key: key.into(),
        label: label.into(),
        value,
    }
}

fn money(key: &str, label: &str, value: Decimal) -> SnapshotLine {
    line(key, label, round_fixed(value, DECIMAL_PLACES).to_string())
}

fn pct(key: &str, label: &str, value: Decimal) -> SnapshotLine {
    line(key, label, format!("{}%", round_fixed(value, DECIMAL_PLACES)))
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Preamble + scenario snapshot + task. Identical inputs give identical text.
pub fn build_prompt(
    context: &AdvisoryContext,
    params: &ScenarioParameters,
    statement: &ProjectedStatement,
) -> String {
    let snapshot = AdvisorySnapshot::capture(params, statement);

    let mut out = context.preamble();
    let _ = writeln!(out);
    let _ = writeln!(out, "CURRENT SCENARIO:");
    let _ = writeln!(out, "{SEPARATOR}");
    out.push_str(&snapshot.render());
    let _ = writeln!(out, "{SEPARATOR}");
    let _ = writeln!(out);
    let _ = writeln!(out, "TASK:");
    let _ = writeln!(out, "Give an express analysis (Markdown, under 150 words):");
    let _ = writeln!(out, "1. **Status**: one line (Success / Risk / Critical).");
    let _ = writeln!(
        out,
        "2. **Drivers**: what pulls the result up or down (payroll vs robots, rent vs utilization)."
    );
    let _ = writeln!(out, "3. **Advice**: the single most important action right now.");
    let _ = writeln!(out, "Be blunt and specific, as a real CFO would.");
    out
}

/// A caller-supplied prompt replaces the generated one when non-blank.
pub fn resolve_prompt(
    custom: Option<&str>,
    context: &AdvisoryContext,
    params: &ScenarioParameters,
    statement: &ProjectedStatement,
) -> String {
    match custom {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => build_prompt(context, params, statement),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{project, BaselineStatement};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn scenario() -> (ScenarioParameters, ProjectedStatement) {
        let params = ScenarioParameters {
            revenue_growth: dec!(100),
            robotization_level: dec!(0),
            warehouse_utilization: dec!(82),
            vas_share: dec!(7.5),
        };
        let statement = project(&BaselineStatement::reference_2026(), &params).unwrap();
        (params, statement)
    }

    fn value_of<'a>(lines: &'a [SnapshotLine], key: &str) -> &'a str {
        lines
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.value.as_str())
            .unwrap()
    }

    #[test]
    fn test_snapshot_covers_every_statement_field() {
        let (params, statement) = scenario();
        let snap = AdvisorySnapshot::capture(&params, &statement);
        assert_eq!(snap.scenario.len(), 4);
        assert_eq!(snap.statement.len(), 25);
    }

    #[test]
    fn test_snapshot_one_decimal_place() {
        let (params, statement) = scenario();
        let snap = AdvisorySnapshot::capture(&params, &statement);
        assert_eq!(value_of(&snap.statement, "cogsPersonnel"), "342.0");
        assert_eq!(value_of(&snap.statement, "revenue"), "1100.0");
        assert_eq!(value_of(&snap.scenario, "vasShare"), "7.5%");
        assert_eq!(value_of(&snap.scenario, "revenueGrowth"), "100.0%");
    }

    #[test]
    fn test_undefined_margin_rendered() {
        let mut base = BaselineStatement::reference_2026();
        base.revenue = Decimal::ZERO;
        let params = ScenarioParameters::default();
        let statement = project(&base, &params).unwrap();
        let snap = AdvisorySnapshot::capture(&params, &statement);
        assert_eq!(value_of(&snap.statement, "ebitdaMargin"), "undefined");
    }

    #[test]
    fn test_prompt_is_reproducible() {
        let (params, statement) = scenario();
        let ctx = AdvisoryContext::default();
        assert_eq!(
            build_prompt(&ctx, &params, &statement),
            build_prompt(&ctx, &params, &statement)
        );
    }

    #[test]
    fn test_prompt_contains_preamble_limits() {
        let (params, statement) = scenario();
        let prompt = build_prompt(&AdvisoryContext::default(), &params, &statement);
        assert!(prompt.contains("EBITDA margin of 25.0% by 2029"));
        assert!(prompt.contains("Minimum EBITDA margin covenant: 18.0%"));
        assert!(prompt.contains("below 3.0x"));
        assert!(prompt.contains("- Operations payroll [cogsPersonnel]: 342.0"));
    }

    #[test]
    fn test_custom_prompt_overrides() {
        let (params, statement) = scenario();
        let ctx = AdvisoryContext::default();
        assert_eq!(
            resolve_prompt(Some("just the numbers"), &ctx, &params, &statement),
            "just the numbers"
        );
        assert_eq!(
            resolve_prompt(Some("   "), &ctx, &params, &statement),
            build_prompt(&ctx, &params, &statement)
        );
    }
}
