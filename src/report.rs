//! Console text, terminal bar charts and chart file names for comparison results.

use crate::core::{Lowest, Scenario, Strategy, WindowReport};

const FIXED_MARK: char = '#';
const TENT_MARK: char = '=';

/// Percentage of a fraction without trailing zeros: 0.7 -> "70".
pub fn percent(fraction: f64) -> String {
    let scaled = (fraction * 100.0 * 1e9).round() / 1e9;
    format!("{scaled}")
}

pub fn strategy_label(strategy: Strategy) -> String {
    match strategy {
        Strategy::Fixed { stocks } => {
            format!("Fixed {}%/{}%", percent(stocks), percent(1.0 - stocks))
        }
        Strategy::BondTent {
            start_stocks,
            end_stocks,
            years,
        } => format!(
            "Bond Tent {}% -> {}% Stocks over {years} Years",
            percent(start_stocks),
            percent(end_stocks)
        ),
    }
}

pub fn axis_label(horizon: usize) -> String {
    format!("Ending portfolio value after {horizon} years, $ thousands")
}

pub fn chart_title(horizon: usize, min_year: u32, max_year: u32) -> String {
    format!("Portfolio value after {horizon} years, starting retirement {min_year}-{max_year}")
}

/// File name for a rendered chart, e.g. `stagflation_0.7_0.5_1.0_15_30.png`.
pub fn chart_file_name(prefix: &str, scenario: &Scenario) -> String {
    format!(
        "{prefix}_{}_{}_{}.png",
        strategy_file_part(scenario.fixed),
        strategy_file_part(scenario.tent),
        scenario.simulation.horizon
    )
}

fn strategy_file_part(strategy: Strategy) -> String {
    match strategy {
        Strategy::Fixed { stocks } => format!("{stocks:?}"),
        Strategy::BondTent {
            start_stocks,
            end_stocks,
            years,
        } => format!("{start_stocks:?}_{end_stocks:?}_{years}"),
    }
}

/// Lowest ending values of both strategies over the window.
pub fn window_summary(scenario: &Scenario, report: &WindowReport) -> String {
    let mut out = chart_title(scenario.simulation.horizon, report.min_year, report.max_year);
    out.push('\n');
    out.push_str(&summary_line(scenario.fixed, report.fixed_lowest));
    out.push('\n');
    out.push_str(&summary_line(scenario.tent, report.tent_lowest));
    out.push('\n');
    out
}

fn summary_line(strategy: Strategy, low: Lowest) -> String {
    let low = format!("({:?}, {})", low.value, low.year);
    match strategy {
        Strategy::Fixed { stocks } => format!("  fixed {}%: {low}", percent(stocks)),
        Strategy::BondTent {
            start_stocks,
            end_stocks,
            years,
        } => format!(
            "{}% -> {}%: {low} over {years} years",
            percent(start_stocks),
            percent(end_stocks)
        ),
    }
}

/// Grouped horizontal bars, one pair per start year, in $ thousands.
///
/// Depleted (negative) portfolios get an empty bar and a `!` marker.
pub fn bar_chart(scenario: &Scenario, report: &WindowReport, width: usize) -> String {
    let horizon = scenario.simulation.horizon;
    let scale = report
        .fixed_end_values
        .iter()
        .chain(&report.tent_end_values)
        .fold(0.0_f64, |max, &value| max.max(value));

    let mut out = format!(
        "{}\n  {FIXED_MARK} {}\n  {TENT_MARK} {}\n  ({})\n",
        chart_title(horizon, report.min_year, report.max_year),
        strategy_label(scenario.fixed),
        strategy_label(scenario.tent),
        axis_label(horizon)
    );

    for ((year, &fixed), &tent) in report
        .start_years
        .iter()
        .zip(&report.fixed_end_values)
        .zip(&report.tent_end_values)
    {
        out.push_str(&format!("{year} {}\n", bar(fixed, scale, width, FIXED_MARK)));
        out.push_str(&format!("     {}\n", bar(tent, scale, width, TENT_MARK)));
    }
    out
}

fn bar(value: f64, scale: f64, width: usize, mark: char) -> String {
    let filled = if value > 0.0 && scale > 0.0 {
        ((value / scale) * width as f64).round() as usize
    } else {
        0
    };
    let flag = if value < 0.0 { "!" } else { "" };
    format!(
        "|{}{} {:.0}k{flag}",
        mark.to_string().repeat(filled),
        " ".repeat(width.saturating_sub(filled)),
        value / 1000.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> WindowReport {
        WindowReport {
            min_year: 1955,
            max_year: 1956,
            start_years: vec![1955, 1956],
            fixed_end_values: vec![1_000_000.0, -20_000.0],
            tent_end_values: vec![500_000.0, 250_000.5],
            fixed_lowest: Lowest {
                value: -20_000.0,
                year: 1956,
            },
            tent_lowest: Lowest {
                value: 250_000.5,
                year: 1956,
            },
            fixed_runner_up: None,
            tent_runner_up: None,
        }
    }

    #[test]
    fn percent_drops_float_noise_and_trailing_zeros() {
        assert_eq!(percent(0.7), "70");
        assert_eq!(percent(1.0 - 0.7), "30");
        assert_eq!(percent(0.5), "50");
        assert_eq!(percent(0.125), "12.5");
    }

    #[test]
    fn default_strategy_labels_match_the_legend() {
        let scenario = Scenario::default();
        assert_eq!(strategy_label(scenario.fixed), "Fixed 70%/30%");
        assert_eq!(
            strategy_label(scenario.tent),
            "Bond Tent 50% -> 100% Stocks over 15 Years"
        );
        assert_eq!(
            axis_label(30),
            "Ending portfolio value after 30 years, $ thousands"
        );
    }

    #[test]
    fn chart_file_name_encodes_the_scenario() {
        let scenario = Scenario::default();
        assert_eq!(
            chart_file_name("stagflation", &scenario),
            "stagflation_0.7_0.5_1.0_15_30.png"
        );
    }

    #[test]
    fn window_summary_lists_both_lows() {
        let scenario = Scenario::default();
        let text = window_summary(&scenario, &sample_report());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Portfolio value after 30 years, starting retirement 1955-1956",
                "  fixed 70%: (-20000.0, 1956)",
                "50% -> 100%: (250000.5, 1956) over 15 years",
            ]
        );
    }

    #[test]
    fn bar_chart_scales_to_the_largest_value() {
        let scenario = Scenario::default();
        let chart = bar_chart(&scenario, &sample_report(), 10);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines.len(), 4 + 2 * 2);
        assert_eq!(lines[1], "  # Fixed 70%/30%");
        assert_eq!(lines[3], "  (Ending portfolio value after 30 years, $ thousands)");
        assert_eq!(lines[4], "1955 |########## 1000k");
        assert_eq!(lines[5], "     |=====      500k");
        assert_eq!(lines[6], "1956 |           -20k!");
        assert!(lines[7].starts_with("     |=== "));
    }
}
