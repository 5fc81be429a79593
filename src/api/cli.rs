use clap::{Args, ValueEnum};

use crate::core::{BondSeries, MarketHistory, Scenario, SimulationConfig, Strategy};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliBondSeries {
    TotalBondMarket,
    ShortTermTreasuries,
    IntermediateTermTreasuries,
    LongTermTreasuries,
    ShortTermBonds,
    IntermediateTermBonds,
}

impl From<CliBondSeries> for BondSeries {
    fn from(value: CliBondSeries) -> Self {
        match value {
            CliBondSeries::TotalBondMarket => BondSeries::TotalBondMarket,
            CliBondSeries::ShortTermTreasuries => BondSeries::ShortTermTreasuries,
            CliBondSeries::IntermediateTermTreasuries => BondSeries::IntermediateTermTreasuries,
            CliBondSeries::LongTermTreasuries => BondSeries::LongTermTreasuries,
            CliBondSeries::ShortTermBonds => BondSeries::ShortTermBonds,
            CliBondSeries::IntermediateTermBonds => BondSeries::IntermediateTermBonds,
        }
    }
}

/// Retirement assumptions shared by every subcommand. Rates are in percent.
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    #[arg(long, default_value_t = 30, help = "Retirement length in years")]
    pub horizon: usize,
    #[arg(long, default_value_t = 1_000_000.0)]
    pub initial_portfolio: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Annual withdrawal in percent of the initial portfolio"
    )]
    pub withdrawal_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Fixed annual payment in start-year dollars, e.g. a mortgage"
    )]
    pub nominal_expense: f64,
    #[arg(
        long,
        default_value_t = 0,
        help = "Number of leading retirement years in which the nominal payment is due"
    )]
    pub nominal_years: usize,
    #[arg(
        long,
        default_value_t = 70.0,
        help = "Stock percentage of the fixed allocation"
    )]
    pub fixed_stocks: f64,
    #[arg(
        long,
        default_value_t = 50.0,
        help = "Bond tent stock percentage in the first retirement year"
    )]
    pub tent_start: f64,
    #[arg(
        long,
        default_value_t = 100.0,
        help = "Bond tent stock percentage once the ramp is over"
    )]
    pub tent_end: f64,
    #[arg(
        long,
        default_value_t = 15,
        help = "Years over which the bond tent ramps from start to end"
    )]
    pub tent_years: usize,
    #[arg(
        long,
        value_enum,
        default_value_t = CliBondSeries::TotalBondMarket,
        help = "Historical fixed-income series paired with the total stock market"
    )]
    pub bonds: CliBondSeries,
}

pub(crate) fn default_scenario_args() -> ScenarioArgs {
    ScenarioArgs {
        horizon: 30,
        initial_portfolio: 1_000_000.0,
        withdrawal_rate: 4.0,
        nominal_expense: 0.0,
        nominal_years: 0,
        fixed_stocks: 70.0,
        tent_start: 50.0,
        tent_end: 100.0,
        tent_years: 15,
        bonds: CliBondSeries::TotalBondMarket,
    }
}

pub fn build_scenario(args: &ScenarioArgs) -> Result<Scenario, String> {
    let bonds: BondSeries = args.bonds.into();
    let available = MarketHistory::with_bonds(bonds).years();

    if args.horizon == 0 {
        return Err("--horizon must be > 0".to_string());
    }

    if args.horizon > available {
        return Err(format!(
            "--horizon must be <= {available} years of {} history",
            bonds.label()
        ));
    }

    if !args.initial_portfolio.is_finite() || args.initial_portfolio <= 0.0 {
        return Err("--initial-portfolio must be > 0".to_string());
    }

    if !(0.0..=100.0).contains(&args.withdrawal_rate) {
        return Err("--withdrawal-rate must be between 0 and 100".to_string());
    }

    if !args.nominal_expense.is_finite() || args.nominal_expense < 0.0 {
        return Err("--nominal-expense must be >= 0".to_string());
    }

    for (name, value) in [
        ("--fixed-stocks", args.fixed_stocks),
        ("--tent-start", args.tent_start),
        ("--tent-end", args.tent_end),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(format!("{name} must be between 0 and 100"));
        }
    }

    Ok(Scenario {
        simulation: SimulationConfig {
            horizon: args.horizon,
            initial_portfolio: args.initial_portfolio,
            withdrawal_rate: args.withdrawal_rate / 100.0,
            nominal_expense: args.nominal_expense,
            nominal_years: args.nominal_years,
        },
        fixed: Strategy::Fixed {
            stocks: args.fixed_stocks / 100.0,
        },
        tent: Strategy::BondTent {
            start_stocks: args.tent_start / 100.0,
            end_stocks: args.tent_end / 100.0,
            years: args.tent_years,
        },
        bonds,
    })
}

pub fn validate_stock_range(min_stocks: u32, max_stocks: u32) -> Result<(), String> {
    if max_stocks > 100 {
        return Err("--max-stocks must be <= 100".to_string());
    }
    if min_stocks > max_stocks {
        return Err("--min-stocks cannot exceed --max-stocks".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args_build_the_default_scenario() {
        let scenario = build_scenario(&default_scenario_args()).expect("valid defaults");
        assert_eq!(scenario.simulation, SimulationConfig::default());
        assert_eq!(scenario.bonds, BondSeries::TotalBondMarket);
        assert!(matches!(scenario.fixed, Strategy::Fixed { stocks } if (stocks - 0.7).abs() < 1e-12));
        assert!(matches!(
            scenario.tent,
            Strategy::BondTent { start_stocks, end_stocks, years: 15 }
                if start_stocks == 0.5 && end_stocks == 1.0
        ));
    }

    #[test]
    fn build_scenario_rejects_zero_horizon() {
        let mut args = default_scenario_args();
        args.horizon = 0;
        let err = build_scenario(&args).expect_err("must reject");
        assert!(err.contains("--horizon"));
    }

    #[test]
    fn build_scenario_limits_horizon_to_selected_history() {
        let mut args = default_scenario_args();
        args.horizon = 151;
        build_scenario(&args).expect("total market covers 151 years");

        args.bonds = CliBondSeries::LongTermTreasuries;
        let err = build_scenario(&args).expect_err("treasuries cover 150 years");
        assert!(err.contains("150 years of long-term treasuries"));
    }

    #[test]
    fn build_scenario_rejects_out_of_range_percentages() {
        let mut args = default_scenario_args();
        args.tent_end = 120.0;
        let err = build_scenario(&args).expect_err("must reject");
        assert!(err.contains("--tent-end"));

        let mut args = default_scenario_args();
        args.withdrawal_rate = -1.0;
        let err = build_scenario(&args).expect_err("must reject");
        assert!(err.contains("--withdrawal-rate"));

        let mut args = default_scenario_args();
        args.initial_portfolio = f64::NAN;
        let err = build_scenario(&args).expect_err("must reject");
        assert!(err.contains("--initial-portfolio"));
    }

    #[test]
    fn build_scenario_carries_nominal_payments() {
        let mut args = default_scenario_args();
        args.nominal_expense = 18_000.0;
        args.nominal_years = 12;
        let scenario = build_scenario(&args).expect("valid");
        assert_eq!(scenario.simulation.nominal_expense, 18_000.0);
        assert_eq!(scenario.simulation.nominal_years, 12);

        args.nominal_expense = -1.0;
        let err = build_scenario(&args).expect_err("must reject");
        assert!(err.contains("--nominal-expense"));
    }

    #[test]
    fn stock_range_must_be_ordered_and_capped() {
        assert!(validate_stock_range(10, 100).is_ok());
        assert!(validate_stock_range(40, 40).is_ok());
        assert!(validate_stock_range(50, 40).unwrap_err().contains("--min-stocks"));
        assert!(validate_stock_range(10, 101).unwrap_err().contains("--max-stocks"));
    }
}
