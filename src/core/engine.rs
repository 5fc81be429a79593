use super::SimError;
use super::history::MarketHistory;
use super::schedule::allocation_schedule;
use super::types::{Comparison, EndValues, HistoricalWindow, Scenario, WindowReport};
use super::window::{lowest_two, restrict};

const NOTABLE_WINDOWS: [HistoricalWindow; 4] = [
    HistoricalWindow {
        name: "stagflation",
        min_year: 1955,
        max_year: 1974,
        x_ticks: 8,
    },
    HistoricalWindow {
        name: "great_depression",
        min_year: 1925,
        max_year: 1945,
        x_ticks: 6,
    },
    HistoricalWindow {
        name: "panic_of_1907",
        min_year: 1900,
        max_year: 1918,
        x_ticks: 6,
    },
    HistoricalWindow {
        name: "dot_com_crash",
        min_year: 1990,
        max_year: 2020,
        x_ticks: 3,
    },
];

/// Longest horizon for which the dot-com window still has start years to show.
const DOT_COM_MAX_HORIZON: usize = 20;

/// Year-end portfolio values for a retirement starting in `start_year`.
///
/// Each year the expense is withdrawn first, then the remainder is rebalanced
/// to that year's stock fraction and grown by the historical real returns.
/// Values may go negative once the portfolio is exhausted.
pub fn simulate(
    start_year: u32,
    stock_fractions: &[f64],
    expenses: &[f64],
    initial_portfolio: f64,
    history: &MarketHistory<'_>,
) -> Result<Vec<f64>, SimError> {
    run(
        start_year,
        stock_fractions,
        expenses,
        None,
        initial_portfolio,
        history,
    )
}

/// Like [`simulate`], with a second expense stream fixed in start-year dollars.
///
/// Nominal expenses such as mortgage payments shrink in real terms as prices
/// rise: each is divided by the inflation accumulated since `start_year`
/// before it is withdrawn.
pub fn simulate_with_nominal(
    start_year: u32,
    stock_fractions: &[f64],
    real_expenses: &[f64],
    nominal_expenses: &[f64],
    initial_portfolio: f64,
    history: &MarketHistory<'_>,
) -> Result<Vec<f64>, SimError> {
    run(
        start_year,
        stock_fractions,
        real_expenses,
        Some(nominal_expenses),
        initial_portfolio,
        history,
    )
}

fn run(
    start_year: u32,
    stock_fractions: &[f64],
    real_expenses: &[f64],
    nominal_expenses: Option<&[f64]>,
    initial_portfolio: f64,
    history: &MarketHistory<'_>,
) -> Result<Vec<f64>, SimError> {
    let first_offset = validate_run(start_year, stock_fractions, real_expenses, history)?;
    let deflated = match nominal_expenses {
        Some(nominal) => {
            deflate_nominal(start_year, first_offset, nominal, real_expenses, history)?
        }
        None => None,
    };

    let mut portfolio = initial_portfolio;
    let mut nest_egg = Vec::with_capacity(stock_fractions.len());
    for (i, (&stock_fraction, &real_expense)) in
        stock_fractions.iter().zip(real_expenses).enumerate()
    {
        let offset = first_offset + i;
        let expense = real_expense + deflated.as_ref().map_or(0.0, |nominal| nominal[i]);
        portfolio -= expense;
        portfolio *= stock_fraction * (1.0 + history.stock_return_at(offset) / 100.0)
            + (1.0 - stock_fraction) * (1.0 + history.bond_return_at(offset) / 100.0);
        tracing::trace!(
            year = start_year + i as u32,
            expense,
            stock_fraction,
            portfolio,
            "simulated year"
        );
        nest_egg.push(portfolio);
    }
    Ok(nest_egg)
}

/// Real value of each nominal expense, or `None` when nothing nominal is owed.
fn deflate_nominal(
    start_year: u32,
    first_offset: usize,
    nominal: &[f64],
    real_expenses: &[f64],
    history: &MarketHistory<'_>,
) -> Result<Option<Vec<f64>>, SimError> {
    if nominal.len() != real_expenses.len() {
        return Err(SimError::LengthMismatch {
            what: "nominal vs real expenses",
            left: nominal.len(),
            right: real_expenses.len(),
        });
    }
    if nominal.iter().all(|&expense| expense == 0.0) {
        return Ok(None);
    }

    let mut inflation_factor = 1.0;
    let mut deflated = Vec::with_capacity(nominal.len());
    for (i, &expense) in nominal.iter().enumerate() {
        deflated.push(expense / inflation_factor);
        if i + 1 == nominal.len() {
            break;
        }
        let inflation = history.inflation_at(first_offset + i).ok_or(
            SimError::InflationUnavailable {
                start_year,
                end_year: start_year + (nominal.len() - 1) as u32,
            },
        )?;
        inflation_factor *= 1.0 + inflation / 100.0;
    }
    Ok(Some(deflated))
}

/// Returns the series offset of `start_year` once every precondition holds.
fn validate_run(
    start_year: u32,
    stock_fractions: &[f64],
    expenses: &[f64],
    history: &MarketHistory<'_>,
) -> Result<usize, SimError> {
    if expenses.len() != stock_fractions.len() {
        return Err(SimError::LengthMismatch {
            what: "expenses vs stock fractions",
            left: expenses.len(),
            right: stock_fractions.len(),
        });
    }
    if stock_fractions.is_empty() {
        return Err(SimError::EmptyInput {
            what: "stock fractions",
        });
    }
    for (index, &fraction) in stock_fractions.iter().enumerate() {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(SimError::FractionOutOfRange { index, fraction });
        }
    }

    let end_year = u32::try_from(stock_fractions.len() - 1)
        .ok()
        .and_then(|span| start_year.checked_add(span));
    match (
        history.offset(start_year),
        end_year.and_then(|year| history.offset(year)),
    ) {
        (Some(offset), Some(_)) => Ok(offset),
        _ => Err(SimError::StartYearOutOfRange {
            start_year,
            end_year: end_year.unwrap_or(u32::MAX),
            first_year: history.first_year(),
            last_year: history.last_year(),
        }),
    }
}

/// Every start year with a full `horizon` of historical data after it.
pub fn start_years(history: &MarketHistory<'_>, horizon: usize) -> Result<Vec<u32>, SimError> {
    if horizon == 0 {
        return Err(SimError::EmptyInput {
            what: "retirement horizon",
        });
    }
    if horizon > history.years() {
        return Err(SimError::HorizonTooLong {
            horizon,
            available: history.years(),
        });
    }
    let last_start = history.last_year() - (horizon - 1) as u32;
    Ok((history.first_year()..=last_start).collect())
}

/// Final portfolio value of a retirement starting in each available year.
pub fn end_values(
    history: &MarketHistory<'_>,
    stock_fractions: &[f64],
    expenses: &[f64],
    initial_portfolio: f64,
) -> Result<EndValues, SimError> {
    rolling_end_values(history, stock_fractions, expenses, None, initial_portfolio)
}

/// [`end_values`] with an additional stream of nominal expenses.
pub fn end_values_with_nominal(
    history: &MarketHistory<'_>,
    stock_fractions: &[f64],
    real_expenses: &[f64],
    nominal_expenses: &[f64],
    initial_portfolio: f64,
) -> Result<EndValues, SimError> {
    rolling_end_values(
        history,
        stock_fractions,
        real_expenses,
        Some(nominal_expenses),
        initial_portfolio,
    )
}

fn rolling_end_values(
    history: &MarketHistory<'_>,
    stock_fractions: &[f64],
    real_expenses: &[f64],
    nominal_expenses: Option<&[f64]>,
    initial_portfolio: f64,
) -> Result<EndValues, SimError> {
    let start_years = start_years(history, stock_fractions.len())?;
    let end_values = start_years
        .iter()
        .map(|&start_year| {
            let nest_egg = run(
                start_year,
                stock_fractions,
                real_expenses,
                nominal_expenses,
                initial_portfolio,
                history,
            )?;
            Ok(nest_egg[nest_egg.len() - 1])
        })
        .collect::<Result<Vec<f64>, SimError>>()?;

    tracing::debug!(
        runs = start_years.len(),
        horizon = stock_fractions.len(),
        "computed rolling end values"
    );
    Ok(EndValues {
        start_years,
        end_values,
    })
}

/// Runs both strategies of `scenario` over every historical start year.
pub fn compare(history: &MarketHistory<'_>, scenario: &Scenario) -> Result<Comparison, SimError> {
    let simulation = &scenario.simulation;
    let expenses = simulation.expenses();
    let nominal = simulation.nominal_expenses();
    let fixed = end_values_with_nominal(
        history,
        &allocation_schedule(scenario.fixed, simulation.horizon),
        &expenses,
        &nominal,
        simulation.initial_portfolio,
    )?;
    let tent = end_values_with_nominal(
        history,
        &allocation_schedule(scenario.tent, simulation.horizon),
        &expenses,
        &nominal,
        simulation.initial_portfolio,
    )?;

    let comparison = Comparison {
        start_years: fixed.start_years,
        fixed_end_values: fixed.end_values,
        tent_end_values: tent.end_values,
    };
    tracing::info!(
        start_years = comparison.start_years.len(),
        tent_wins = comparison.tent_wins(),
        "compared fixed allocation against bond tent"
    );
    Ok(comparison)
}

impl Comparison {
    /// Start years in which the tent ended strictly ahead of the fixed allocation.
    pub fn tent_wins(&self) -> usize {
        self.fixed_end_values
            .iter()
            .zip(&self.tent_end_values)
            .filter(|&(fixed, tent)| fixed < tent)
            .count()
    }

    pub fn window(&self, min_year: u32, max_year: u32) -> Result<WindowReport, SimError> {
        let start_years = restrict(&self.start_years, &self.start_years, min_year, max_year)?;
        let fixed_end_values =
            restrict(&self.fixed_end_values, &self.start_years, min_year, max_year)?;
        let tent_end_values =
            restrict(&self.tent_end_values, &self.start_years, min_year, max_year)?;
        let (fixed_lowest, fixed_runner_up) = lowest_two(&fixed_end_values, &start_years)?;
        let (tent_lowest, tent_runner_up) = lowest_two(&tent_end_values, &start_years)?;

        Ok(WindowReport {
            min_year,
            max_year,
            start_years,
            fixed_end_values,
            tent_end_values,
            fixed_lowest,
            tent_lowest,
            fixed_runner_up,
            tent_runner_up,
        })
    }
}

/// Historical windows worth reporting for a retirement of `horizon` years.
pub fn notable_windows(horizon: usize) -> Vec<HistoricalWindow> {
    NOTABLE_WINDOWS
        .into_iter()
        .filter(|window| window.name != "dot_com_crash" || horizon <= DOT_COM_MAX_HORIZON)
        .collect()
}
