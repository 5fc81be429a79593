use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use super::SimError;
use super::engine::end_values_with_nominal;
use super::history::MarketHistory;
use super::schedule::allocation_schedule;
use super::types::{SimulationConfig, Strategy};

/// For each fixed stock percentage, the number of start years in which `tent`
/// finished strictly ahead of that fixed allocation.
///
/// This is a diagnostic: it counts outcomes and never picks a winner.
pub fn tent_win_counts(
    history: &MarketHistory<'_>,
    simulation: &SimulationConfig,
    tent: Strategy,
    stock_percents: RangeInclusive<u32>,
) -> Result<BTreeMap<u32, usize>, SimError> {
    let expenses = simulation.expenses();
    let nominal = simulation.nominal_expenses();
    let tent_ends = end_values_with_nominal(
        history,
        &allocation_schedule(tent, simulation.horizon),
        &expenses,
        &nominal,
        simulation.initial_portfolio,
    )?;

    let mut counts = BTreeMap::new();
    for percent in stock_percents {
        let fixed = Strategy::Fixed {
            stocks: f64::from(percent) / 100.0,
        };
        let fixed_ends = end_values_with_nominal(
            history,
            &allocation_schedule(fixed, simulation.horizon),
            &expenses,
            &nominal,
            simulation.initial_portfolio,
        )?;
        let wins = fixed_ends
            .end_values
            .iter()
            .zip(&tent_ends.end_values)
            .filter(|&(fixed, tent)| fixed < tent)
            .count();
        tracing::debug!(percent, wins, "tent wins against fixed allocation");
        counts.insert(percent, wins);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::compare;
    use crate::core::types::Scenario;

    #[test]
    fn win_counts_agree_with_the_pairwise_comparison() {
        let scenario = Scenario::default();
        let history = scenario.history();
        let counts =
            tent_win_counts(&history, &scenario.simulation, scenario.tent, 70..=70).expect("valid");
        let comparison = compare(&history, &scenario).expect("valid");
        assert_eq!(counts.get(&70), Some(&comparison.tent_wins()));
    }

    #[test]
    fn win_counts_include_nominal_expenses() {
        let mut scenario = Scenario::default();
        scenario.simulation.nominal_expense = 15_000.0;
        scenario.simulation.nominal_years = 20;
        let history = scenario.history();
        let counts =
            tent_win_counts(&history, &scenario.simulation, scenario.tent, 70..=70).expect("valid");
        let comparison = compare(&history, &scenario).expect("valid");
        assert_eq!(counts.get(&70), Some(&comparison.tent_wins()));
    }

    #[test]
    fn win_counts_cover_each_percentage_in_order() {
        let scenario = Scenario::default();
        let counts = tent_win_counts(
            &scenario.history(),
            &scenario.simulation,
            scenario.tent,
            10..=100,
        )
        .expect("valid");

        assert_eq!(counts.len(), 91);
        assert_eq!(counts.keys().next(), Some(&10));
        assert_eq!(counts.keys().last(), Some(&100));
        assert_eq!(counts[&10], 122);
        assert_eq!(counts[&68], 97);
        assert_eq!(counts[&100], 27);
        assert!(counts.values().all(|&wins| wins <= 122));
    }

    #[test]
    fn empty_range_yields_no_counts() {
        let scenario = Scenario::default();
        #[allow(clippy::reversed_empty_ranges)]
        let counts = tent_win_counts(
            &scenario.history(),
            &scenario.simulation,
            scenario.tent,
            50..=40,
        )
        .expect("valid");
        assert!(counts.is_empty());
    }

    #[test]
    fn percentages_above_one_hundred_are_rejected() {
        let scenario = Scenario::default();
        let err = tent_win_counts(
            &scenario.history(),
            &scenario.simulation,
            scenario.tent,
            100..=101,
        )
        .expect_err("must reject");
        assert!(matches!(err, SimError::FractionOutOfRange { .. }));
    }
}
