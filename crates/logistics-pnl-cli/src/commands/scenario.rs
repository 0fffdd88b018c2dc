use clap::Args;
use rust_decimal::Decimal;
use tracing::debug;

use logistics_pnl_core::projection::engine::ProjectionInput;
use logistics_pnl_core::projection::{
    BaselineStatement, CovenantThresholds, DriverConfig, ScenarioParameters,
};

use crate::input;

/// Scenario selection shared by every projecting subcommand.
///
/// A full request comes from `--input` or stdin; otherwise it is assembled
/// from the reference plan, optional config files, and the lever flags.
/// Lever flags always win over whatever the request carried.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScenarioArgs {
    /// Path to a JSON projection request (baseline, params, drivers, covenants)
    #[arg(long)]
    pub input: Option<String>,

    /// Baseline statement file (JSON or YAML); defaults to the 2026 plan
    #[arg(long)]
    pub baseline: Option<String>,

    /// Driver calibration file (JSON or YAML)
    #[arg(long)]
    pub drivers: Option<String>,

    /// Covenant thresholds file (JSON or YAML)
    #[arg(long)]
    pub covenants: Option<String>,

    /// Revenue growth over the baseline in percent (e.g. 150 for 2.5x)
    #[arg(long, alias = "growth")]
    pub revenue_growth: Option<Decimal>,

    /// Share of operations automated, 0-100
    #[arg(long, alias = "robotization")]
    pub robotization_level: Option<Decimal>,

    /// Warehouse capacity in use, 50-100
    #[arg(long, alias = "utilization")]
    pub warehouse_utilization: Option<Decimal>,

    /// Value-added services share of revenue, 0-25
    #[arg(long, alias = "vas")]
    pub vas_share: Option<Decimal>,
}

impl ScenarioArgs {
    pub fn resolve(&self) -> Result<ProjectionInput, Box<dyn std::error::Error>> {
        let mut request: ProjectionInput = if let Some(ref path) = self.input {
            input::file::read_json(path)?
        } else if let Some(piped) = input::stdin::read_stdin()? {
            piped
        } else {
            ProjectionInput {
                baseline: BaselineStatement::reference_2026(),
                params: ScenarioParameters::default(),
                drivers: DriverConfig::default(),
                covenants: CovenantThresholds::default(),
            }
        };

        if let Some(ref path) = self.baseline {
            request.baseline = input::file::read_config(path)?;
        }
        if let Some(ref path) = self.drivers {
            request.drivers = input::file::read_config(path)?;
        }
        if let Some(ref path) = self.covenants {
            request.covenants = input::file::read_config(path)?;
        }

        let params = &mut request.params;
        if let Some(v) = self.revenue_growth {
            params.revenue_growth = v;
        }
        if let Some(v) = self.robotization_level {
            params.robotization_level = v;
        }
        if let Some(v) = self.warehouse_utilization {
            params.warehouse_utilization = v;
        }
        if let Some(v) = self.vas_share {
            params.vas_share = v;
        }

        debug!(params = ?request.params, "scenario resolved");
        Ok(request)
    }
}
