use serde::Serialize;

use super::history::{BondSeries, MarketHistory};

/// How the stock fraction evolves over the retirement horizon.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Strategy {
    Fixed {
        stocks: f64,
    },
    /// Linear glide from `start_stocks` to `end_stocks` over `years`, then held.
    BondTent {
        start_stocks: f64,
        end_stocks: f64,
        years: usize,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub horizon: usize,
    pub initial_portfolio: f64,
    /// Fraction of the initial portfolio withdrawn every year, e.g. 0.04.
    pub withdrawal_rate: f64,
    /// Fixed payment in start-year dollars, such as a mortgage.
    pub nominal_expense: f64,
    /// Number of leading years in which `nominal_expense` is paid.
    pub nominal_years: usize,
}

impl SimulationConfig {
    /// Constant real spending of `initial_portfolio * withdrawal_rate` per year.
    pub fn expenses(&self) -> Vec<f64> {
        vec![self.initial_portfolio * self.withdrawal_rate; self.horizon]
    }

    pub fn nominal_expenses(&self) -> Vec<f64> {
        (0..self.horizon)
            .map(|year| {
                if year < self.nominal_years {
                    self.nominal_expense
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 30,
            initial_portfolio: 1_000_000.0,
            withdrawal_rate: 0.04,
            nominal_expense: 0.0,
            nominal_years: 0,
        }
    }
}

/// A fixed allocation and a bond tent evaluated under the same assumptions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Scenario {
    pub simulation: SimulationConfig,
    pub fixed: Strategy,
    pub tent: Strategy,
    pub bonds: BondSeries,
}

impl Scenario {
    pub fn history(&self) -> MarketHistory<'static> {
        MarketHistory::with_bonds(self.bonds)
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            fixed: Strategy::Fixed { stocks: 0.70 },
            tent: Strategy::BondTent {
                start_stocks: 0.5,
                end_stocks: 1.0,
                years: 15,
            },
            bonds: BondSeries::TotalBondMarket,
        }
    }
}

/// Ending portfolio value per historical start year, positionally aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct EndValues {
    pub start_years: Vec<u32>,
    pub end_values: Vec<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Lowest {
    pub value: f64,
    pub year: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub start_years: Vec<u32>,
    pub fixed_end_values: Vec<f64>,
    pub tent_end_values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowReport {
    pub min_year: u32,
    pub max_year: u32,
    pub start_years: Vec<u32>,
    pub fixed_end_values: Vec<f64>,
    pub tent_end_values: Vec<f64>,
    pub fixed_lowest: Lowest,
    pub tent_lowest: Lowest,
    /// Second-worst start year, absent for single-year windows.
    pub fixed_runner_up: Option<Lowest>,
    pub tent_runner_up: Option<Lowest>,
}

/// A named calendar range of retirement start years worth charting.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalWindow {
    pub name: &'static str,
    pub min_year: u32,
    pub max_year: u32,
    pub x_ticks: u32,
}
