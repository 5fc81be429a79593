mod engine;
mod error;
pub mod history;
mod schedule;
mod sweep;
mod types;
mod window;

pub use engine::{
    compare, end_values, end_values_with_nominal, notable_windows, simulate, simulate_with_nominal,
    start_years,
};
pub use error::SimError;
pub use history::{BondSeries, FIRST_YEAR_OF_MARKET_RETURNS, MarketHistory};
pub use schedule::allocation_schedule;
pub use sweep::tent_win_counts;
pub use types::{
    Comparison, EndValues, HistoricalWindow, Lowest, Scenario, SimulationConfig, Strategy,
    WindowReport,
};
pub use window::{lowest, lowest_two, restrict};
