use super::types::Strategy;

/// Stock fraction for each of the `horizon` simulated years.
pub fn allocation_schedule(strategy: Strategy, horizon: usize) -> Vec<f64> {
    match strategy {
        Strategy::Fixed { stocks } => vec![stocks; horizon],
        Strategy::BondTent {
            start_stocks,
            end_stocks,
            years,
        } => (0..horizon)
            .map(|year| tent_fraction(start_stocks, end_stocks, years, year))
            .collect(),
    }
}

fn tent_fraction(start: f64, end: f64, ramp_years: usize, year: usize) -> f64 {
    if year >= ramp_years {
        return end;
    }
    let fraction = start + (end - start) * year as f64 / ramp_years as f64;
    // Rounding must not overshoot either endpoint.
    fraction.clamp(start.min(end), start.max(end))
}
