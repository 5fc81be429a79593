//! Annual inflation-adjusted returns, in percent.
//!
//! From Simba's backtesting spreadsheet (tab "Data_Series"):
//! https://www.bogleheads.org/wiki/Simba%27s_backtesting_spreadsheet

use super::SimError;

pub const FIRST_YEAR_OF_MARKET_RETURNS: u32 = 1871;

/// 1871 - 2021.
pub const TOTAL_MARKET_YEARS: usize = 151;

/// 1871 - 2020. The treasury and bond-duration series stop a year earlier.
pub const TREASURY_YEARS: usize = 150;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum BondSeries {
    #[default]
    TotalBondMarket,
    ShortTermTreasuries,
    IntermediateTermTreasuries,
    LongTermTreasuries,
    ShortTermBonds,
    IntermediateTermBonds,
}

impl BondSeries {
    pub fn returns(self) -> &'static [f64] {
        match self {
            BondSeries::TotalBondMarket => &TOTAL_BOND_MARKET,
            BondSeries::ShortTermTreasuries => &SHORT_TERM_TREASURIES,
            BondSeries::IntermediateTermTreasuries => &INTERMEDIATE_TERM_TREASURIES,
            BondSeries::LongTermTreasuries => &LONG_TERM_TREASURIES,
            BondSeries::ShortTermBonds => &SHORT_TERM_BONDS,
            BondSeries::IntermediateTermBonds => &INTERMEDIATE_TERM_BONDS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BondSeries::TotalBondMarket => "total bond market",
            BondSeries::ShortTermTreasuries => "short-term treasuries",
            BondSeries::IntermediateTermTreasuries => "intermediate-term treasuries",
            BondSeries::LongTermTreasuries => "long-term treasuries",
            BondSeries::ShortTermBonds => "short-term bonds",
            BondSeries::IntermediateTermBonds => "intermediate-term bonds",
        }
    }
}

/// Aligned stock and bond return series starting at `first_year`.
///
/// Inflation is optional. It only feeds the deflation of nominal expenses, so
/// it may stop one year short of the return series.
#[derive(Copy, Clone, Debug)]
pub struct MarketHistory<'a> {
    first_year: u32,
    stocks: &'a [f64],
    bonds: &'a [f64],
    inflation: &'a [f64],
}

impl<'a> MarketHistory<'a> {
    pub fn new(first_year: u32, stocks: &'a [f64], bonds: &'a [f64]) -> Result<Self, SimError> {
        if stocks.is_empty() {
            return Err(SimError::EmptyInput {
                what: "stock returns",
            });
        }
        if stocks.len() != bonds.len() {
            return Err(SimError::LengthMismatch {
                what: "stock returns vs bond returns",
                left: stocks.len(),
                right: bonds.len(),
            });
        }
        let last_year = u32::try_from(stocks.len() - 1)
            .ok()
            .and_then(|span| first_year.checked_add(span));
        if last_year.is_none() {
            return Err(SimError::YearOverflow {
                first_year,
                years: stocks.len(),
            });
        }
        Ok(Self {
            first_year,
            stocks,
            bonds,
            inflation: &[],
        })
    }

    /// Attach annual inflation in percent, aligned with the return series.
    pub fn with_inflation(mut self, inflation: &'a [f64]) -> Result<Self, SimError> {
        if inflation.len() > self.years() || inflation.len() + 1 < self.years() {
            return Err(SimError::LengthMismatch {
                what: "inflation vs stock returns",
                left: inflation.len(),
                right: self.years(),
            });
        }
        self.inflation = inflation;
        Ok(self)
    }

    pub fn first_year(&self) -> u32 {
        self.first_year
    }

    pub fn last_year(&self) -> u32 {
        // `new` guarantees this cannot overflow.
        self.first_year + (self.stocks.len() - 1) as u32
    }

    pub fn years(&self) -> usize {
        self.stocks.len()
    }

    /// Index of `year` in both series, if covered.
    pub fn offset(&self, year: u32) -> Option<usize> {
        if year < self.first_year || year > self.last_year() {
            return None;
        }
        Some((year - self.first_year) as usize)
    }

    pub(crate) fn stock_return_at(&self, offset: usize) -> f64 {
        self.stocks[offset]
    }

    pub(crate) fn bond_return_at(&self, offset: usize) -> f64 {
        self.bonds[offset]
    }

    pub(crate) fn inflation_at(&self, offset: usize) -> Option<f64> {
        self.inflation.get(offset).copied()
    }
}

impl MarketHistory<'static> {
    /// Total stock market vs total bond market, 1871 - 2021.
    pub fn total_market() -> Self {
        Self::with_bonds(BondSeries::TotalBondMarket)
    }

    /// Total stock market paired with `series`, truncated to the shorter of the two.
    pub fn with_bonds(series: BondSeries) -> Self {
        let bonds = series.returns();
        Self {
            first_year: FIRST_YEAR_OF_MARKET_RETURNS,
            stocks: &TOTAL_STOCK_MARKET[..bonds.len()],
            bonds,
            inflation: &INFLATION,
        }
    }
}

/// Total stock market real returns in percent, 1871-2021.
pub static TOTAL_STOCK_MARKET: [f64; TOTAL_MARKET_YEARS] = [
    13.86, 8.74, 1.99, 12.46, 11.78, -14.95, 16.93, 29.56, 23.75, 34.31, -7.23, 5.54, 2.27, -2.34,
    34.48, 11.90, -5.18, 8.17, 12.37, -8.48, 26.55, -1.56, -6.43, 8.01, 3.42, 6.21, 16.89, 27.47,
    -11.34, 23.89, 16.54, -1.27, -13.31, 29.08, 21.26, -3.67, -22.55, 34.92, 4.97, 3.55, 4.56,
    -0.14, -6.68, -6.44, 27.38, -3.83, -31.95, 0.14, 2.23, -12.65, 23.71, 29.84, 2.37, 27.07,
    21.60, 14.07, 34.88, 40.32, -11.29, -22.94, -37.87, 1.26, 53.62, -0.70, 44.18, 30.79, -36.66,
    32.06, 2.35, -7.83, -18.23, 7.04, 24.23, 18.50, 35.19, -20.66, -4.59, -0.60, 22.53, 23.03,
    13.91, 12.80, -0.09, 51.70, 25.26, 5.36, -12.46, 42.32, 10.86, -0.43, 26.08, -10.79, 19.20,
    15.29, 12.12, -11.81, 23.59, 8.09, -15.51, -4.43, 13.91, 14.05, -25.07, -36.28, 29.44, 20.67,
    -8.79, 0.20, 10.78, 18.75, -11.67, 14.29, 18.91, -0.91, 27.66, 14.79, -2.11, 12.90, 23.39,
    -11.62, 30.16, 5.85, 7.67, -2.77, 32.42, 17.07, 28.80, 21.31, 20.58, -13.49, -12.25, -22.79,
    28.99, 9.06, 2.58, 12.76, 1.43, -37.05, 25.41, 15.53, -1.83, 14.39, 31.55, 11.71, -0.34, 10.37,
    18.67, -6.95, 27.88, 19.36, 17.45,
];

/// Total bond market real returns in percent, 1871-2021.
pub static TOTAL_BOND_MARKET: [f64; TOTAL_MARKET_YEARS] = [
    1.22, -0.44, 9.08, 22.18, 13.03, 6.26, 22.89, 18.68, -14.70, 11.66, -4.24, 5.05, 12.91, 15.89,
    9.10, 0.77, -3.15, 10.54, 7.64, -1.21, 12.26, -5.27, 20.75, 10.71, -1.38, 7.14, 2.82, 3.19,
    -14.78, 6.42, -0.61, -7.92, 6.91, 3.44, 0.66, -3.60, 1.87, 7.86, -8.32, 11.69, 5.16, -5.32,
    1.81, 5.43, 3.19, -7.86, -17.84, -11.21, -12.59, 1.79, 27.25, 6.13, 0.74, 7.84, -0.28, 7.09,
    6.51, 0.25, 4.26, 15.87, 8.88, 24.44, 0.65, 4.11, 2.37, 2.32, -0.94, 7.32, 3.11, 3.56, -6.98,
    -7.05, -0.45, 0.01, 2.80, -14.75, -8.54, -0.38, 6.58, -5.72, -5.60, 1.44, 2.88, 3.60, -1.16,
    -4.39, 5.53, -4.48, -3.36, 11.51, 0.64, 4.32, 0.04, 2.85, -1.17, 1.46, -3.45, -1.75, -7.83,
    11.03, 6.05, -0.26, -4.83, -4.75, 1.01, 10.18, -3.48, -7.04, -10.08, -8.77, -2.50, 27.67, 4.35,
    10.72, 17.58, 13.96, -2.78, 2.81, 8.60, 2.40, 11.82, 4.12, 6.75, -5.19, 15.26, 0.25, 7.61,
    6.86, -3.35, 7.74, 6.78, 5.80, 2.12, 1.04, -0.90, 1.78, 2.82, 5.05, 3.23, 4.97, 4.59, 2.37,
    -3.59, 5.10, -0.33, 0.51, 1.42, -1.90, 6.29, 6.27, -8.13,
];

/// Short-term treasury real returns in percent, 1871-2020.
pub static SHORT_TERM_TREASURIES: [f64; TREASURY_YEARS] = [
    2.15, 2.98, 13.63, 22.10, 11.18, 5.44, 23.18, 18.64, -14.38, 11.72, -3.81, 6.69, 14.91, 17.31,
    8.84, 1.93, -0.01, 11.06, 8.00, 1.59, 14.04, -4.81, 24.35, 9.30, -0.92, 8.75, 2.09, 2.87,
    -13.84, 7.27, 0.81, -6.20, 9.68, 3.52, 1.88, -0.93, 5.91, 6.44, -7.88, 13.08, 5.15, -4.49,
    3.42, 5.23, 1.91, -8.67, -15.25, -10.65, -11.05, 5.11, 24.68, 5.63, 1.21, 6.21, -0.77, 6.50,
    5.73, 2.86, 5.72, 15.02, 12.01, 19.21, -0.13, -0.24, 0.01, -0.66, -1.77, 4.90, 1.08, 0.68,
    -7.87, -7.64, -1.39, -1.09, -0.73, -14.45, -7.28, -1.52, 3.92, -5.00, -4.84, 1.10, 2.38, 3.24,
    -0.09, -1.53, 2.55, -0.08, -0.29, 7.18, 1.80, 2.82, 0.76, 2.91, 0.52, 1.65, 0.61, -0.02, -2.54,
    7.53, 4.25, 0.49, -3.78, -4.79, 1.83, 3.13, -2.74, -5.07, -4.81, -3.09, 3.52, 16.65, 5.06,
    9.31, 9.54, 8.83, 1.17, 1.61, 5.85, 3.31, 8.27, 3.23, 2.48, -2.18, 8.04, 1.61, 4.80, 5.25,
    0.14, 4.44, 6.66, 3.34, -0.03, -2.34, -1.80, 1.28, 3.03, 6.50, -1.94, 0.69, -1.46, -1.35,
    -1.19, -0.25, -0.22, -1.27, -1.68, -0.44, 1.20, 1.70,
];

/// Intermediate-term treasury real returns in percent, 1871-2020.
pub static INTERMEDIATE_TERM_TREASURIES: [f64; TREASURY_YEARS] = [
    1.20, -0.46, 9.05, 22.15, 13.01, 6.24, 22.87, 18.66, -14.72, 11.64, -4.26, 5.03, 12.89, 15.86,
    9.08, 0.75, -3.17, 10.52, 7.62, -1.23, 12.24, -5.28, 20.72, 10.68, -1.40, 7.11, 2.79, 3.17,
    -14.80, 6.40, -0.63, -7.94, 6.89, 3.42, 0.64, -3.62, 1.85, 7.84, -8.34, 11.67, 5.14, -5.34,
    1.79, 5.41, 3.17, -7.88, -17.85, -11.22, -12.60, 1.77, 27.22, 6.11, 0.72, 7.82, -0.30, 7.07,
    6.49, 0.23, 4.24, 15.85, 8.85, 24.42, 0.63, 4.09, 2.35, 2.30, -0.96, 7.29, 3.09, 3.54, -6.99,
    -7.07, -0.47, -0.01, 2.78, -14.77, -8.56, -0.40, 6.56, -5.74, -5.62, 1.42, 2.86, 3.58, -1.18,
    -4.41, 5.51, -4.50, -3.38, 11.49, 0.62, 4.30, 0.02, 2.83, -1.19, 1.44, -3.47, -1.77, -7.85,
    11.01, 6.03, -0.28, -4.32, -7.07, -0.41, 9.43, -5.36, -7.92, -8.57, -10.68, -2.28, 29.35, 0.42,
    10.53, 20.15, 16.14, -3.78, 1.81, 9.97, 2.20, 13.99, 4.22, 8.32, -7.42, 17.39, -1.38, 7.83,
    9.88, -6.52, 10.12, 6.16, 11.34, 0.34, -0.27, -1.92, 0.56, 5.67, 14.56, -5.61, 5.38, 6.51,
    0.88, -4.18, 3.43, 0.92, -0.96, -0.47, -0.60, 3.89, 6.20,
];

/// Long-term treasury real returns in percent, 1871-2020.
pub static LONG_TERM_TREASURIES: [f64; TREASURY_YEARS] = [
    5.43, 0.83, 7.93, 17.28, 19.44, 8.04, 25.60, 17.82, -12.40, 14.52, -1.29, 6.40, 11.60, 16.15,
    9.86, 3.79, -5.80, 10.74, 12.53, -2.60, 9.53, -3.20, 16.55, 11.53, 1.67, 6.55, 4.12, 4.49,
    -12.08, 6.16, -0.66, -7.07, 4.58, 2.53, 2.49, -4.21, -1.01, 6.23, -7.37, 9.21, 5.03, -4.23,
    0.54, 3.72, 3.16, -5.31, -20.74, -9.92, -13.71, 1.77, 31.72, 6.85, 1.22, 9.28, 2.69, 9.70,
    9.92, -0.05, 4.85, 14.15, 1.47, 28.88, -2.37, 8.70, 3.22, 5.44, -2.80, 8.37, 4.65, 7.75, -7.98,
    -5.43, -0.76, 0.53, 5.92, -14.84, -10.29, 0.59, 9.23, -6.60, -9.57, 0.63, 1.44, 6.41, -2.47,
    -8.56, 5.70, -8.36, -6.84, 13.43, -1.24, 4.89, -1.45, 2.77, -2.12, 0.44, -10.33, -4.39, -11.34,
    7.78, 9.07, 1.42, -7.03, -6.58, 1.23, 11.59, -6.39, -9.66, -12.27, -13.80, -7.91, 36.44, -1.81,
    10.35, 26.66, 22.66, -6.87, 4.49, 13.58, 0.11, 14.88, 4.84, 14.03, -10.11, 27.37, -4.13, 13.07,
    11.64, -11.19, 16.25, 2.55, 14.00, 0.52, 4.24, 2.91, -0.74, 5.43, 23.83, -15.29, 7.78, 25.17,
    1.72, -14.03, 24.09, -2.06, -0.76, 6.44, -3.51, 11.74, 16.11,
];

/// Short-term bond real returns in percent, 1871-2020.
pub static SHORT_TERM_BONDS: [f64; TREASURY_YEARS] = [
    1.34, 1.77, 12.71, 23.78, 11.26, 5.82, 22.80, 19.04, -14.75, 11.70, -4.12, 6.23, 14.76, 17.10,
    9.10, 1.17, -0.65, 11.24, 7.49, 0.89, 14.20, -5.21, 24.20, 9.83, -1.66, 8.60, 2.47, 3.02,
    -14.60, 7.26, 0.40, -6.83, 9.18, 3.90, 1.18, -1.73, 4.80, 7.84, -8.31, 13.03, 5.17, -5.03,
    3.18, 5.70, 2.41, -8.73, -16.19, -10.81, -11.54, 3.80, 26.13, 5.84, 1.01, 6.93, -0.98, 6.58,
    5.92, 1.81, 5.53, 15.97, 11.15, 21.12, 0.16, 0.75, 0.50, -0.09, -1.62, 5.50, 1.45, 1.20, -7.62,
    -7.72, -0.94, -0.77, -0.04, -14.50, -7.54, -1.20, 4.71, -5.15, -5.18, 1.13, 2.56, 3.41, -0.52,
    -2.29, 3.37, -1.21, -0.97, 8.38, 1.62, 3.31, 0.47, 2.93, -0.12, 1.59, -0.23, -0.44, -4.29,
    9.08, 4.78, 0.07, -3.86, -5.30, 1.47, 5.65, -2.96, -5.62, -5.54, -4.24, 2.55, 18.98, 4.91,
    9.77, 11.22, 10.10, 0.48, 1.72, 6.66, 3.31, 9.70, 3.74, 4.16, -3.37, 10.09, 1.19, 5.25, 5.92,
    -0.59, 5.28, 7.22, 3.69, 1.52, -1.44, -1.97, 1.58, 3.10, 5.41, 1.62, 2.50, 0.11, 0.30, -1.32,
    0.50, 0.19, -0.57, -0.91, -0.55, 2.51, 3.28,
];

/// Intermediate-term bond real returns in percent, 1871-2020.
pub static INTERMEDIATE_TERM_BONDS: [f64; TREASURY_YEARS] = [
    1.45, -0.84, 8.16, 21.11, 13.56, 6.28, 23.00, 18.42, -14.60, 11.63, -4.20, 4.76, 12.31, 15.52,
    9.00, 0.87, -3.85, 10.22, 7.82, -1.73, 11.47, -5.18, 19.62, 10.81, -1.05, 6.65, 2.79, 3.17,
    -14.64, 6.10, -0.85, -8.11, 6.25, 3.12, 0.69, -4.00, 1.21, 7.37, -8.19, 11.20, 5.12, -5.28,
    1.40, 5.15, 3.27, -7.56, -18.13, -11.31, -12.81, 1.49, 27.12, 6.14, 0.69, 7.90, -0.01, 7.21,
    6.62, 0.00, 3.84, 15.49, 8.31, 24.96, 0.70, 4.95, 2.85, 2.99, -0.76, 7.78, 3.58, 4.22, -6.85,
    -6.80, -0.45, 0.17, 3.58, -14.85, -8.85, -0.20, 6.98, -5.91, -5.66, 1.51, 2.90, 3.58, -1.27,
    -4.92, 5.98, -5.28, -3.99, 12.17, 0.33, 4.49, -0.05, 2.79, -1.36, 1.41, -4.31, -2.09, -8.45,
    11.08, 6.25, -0.27, -4.43, -7.48, -0.90, 9.78, -4.32, -8.19, -9.06, -8.83, -2.95, 26.78, 3.23,
    10.22, 19.94, 15.70, -3.44, 2.86, 9.68, 1.87, 14.13, 4.80, 9.16, -7.06, 18.04, -0.75, 7.58,
    8.35, -5.54, 9.08, 7.62, 8.33, 3.75, 1.98, -1.54, 1.40, 3.48, 4.92, 4.06, 7.87, 7.55, 5.19,
    -4.88, 6.15, 0.54, 0.74, 1.70, -2.04, 7.72, 8.32,
];

/// Annual consumer price inflation in percent, 1871-2020.
pub static INFLATION: [f64; TREASURY_YEARS] = [
    1.53, 2.26, -4.41, -6.92, -5.79, 0.88, -15.65, -10.31, 20.69, -5.71, 8.08, -1.87, -7.62,
    -10.31, -3.45, 0.00, 4.76, -4.55, -4.76, 2.50, -6.10, 7.79, -13.25, -4.17, 1.45, -2.86,
    2.94, 1.43, 16.90, -2.41, 2.47, 9.64, -4.40, 2.30, 0.00, 4.49, -2.15, 3.30, 10.64, -6.73,
    -1.03, 7.29, 2.04, 1.00, 2.97, 12.50, 19.66, 17.86, 16.97, -1.55, -11.05, -0.59, 2.98,
    0.00, 3.47, -2.23, -1.14, -1.16, 0.00, -7.02, -10.06, -9.79, 2.33, 3.03, 1.47, 2.17, 2.86,
    -2.78, 0.00, 0.71, 9.93, 9.03, 2.96, 2.30, 2.25, 18.13, 8.84, 2.99, -2.07, 5.93, 6.00,
    0.75, 0.75, -0.74, 0.37, 2.99, 2.90, 1.76, 1.73, 1.36, 0.67, 1.33, 1.64, 0.97, 1.92, 3.46,
    3.04, 4.72, 6.20, 5.57, 3.27, 3.41, 8.71, 12.34, 6.94, 4.86, 6.70, 9.02, 13.29, 12.52,
    8.92, 3.83, 3.79, 3.95, 3.80, 1.10, 4.43, 4.42, 4.65, 6.11, 3.06, 2.90, 2.75, 2.67, 2.54,
    3.32, 1.70, 1.61, 2.68, 3.39, 1.55, 2.38, 1.88, 3.26, 3.42, 2.54, 4.08, 0.09, 2.72, 1.50,
    2.96, 1.74, 1.50, 0.76, 0.73, 2.07, 2.11, 1.91, 2.29, 1.36,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_market_covers_1871_through_2021() {
        let history = MarketHistory::total_market();
        assert_eq!(history.first_year(), 1871);
        assert_eq!(history.last_year(), 2021);
        assert_eq!(history.years(), 151);
    }

    #[test]
    fn treasury_series_truncate_stocks_to_2020() {
        let history = MarketHistory::with_bonds(BondSeries::LongTermTreasuries);
        assert_eq!(history.years(), TREASURY_YEARS);
        assert_eq!(history.last_year(), 2020);
        assert_eq!(history.stock_return_at(0), 13.86);
        assert_eq!(history.bond_return_at(0), 5.43);
    }

    #[test]
    fn offset_rejects_years_outside_the_series() {
        let history = MarketHistory::total_market();
        assert_eq!(history.offset(1870), None);
        assert_eq!(history.offset(1871), Some(0));
        assert_eq!(history.offset(2021), Some(150));
        assert_eq!(history.offset(2022), None);
    }

    #[test]
    fn new_rejects_misaligned_series() {
        let err = MarketHistory::new(2000, &[1.0, 2.0], &[1.0]).expect_err("must reject");
        assert!(matches!(err, SimError::LengthMismatch { left: 2, right: 1, .. }));

        let err = MarketHistory::new(2000, &[], &[]).expect_err("must reject empty");
        assert!(matches!(err, SimError::EmptyInput { .. }));
    }

    #[test]
    fn new_rejects_years_past_the_calendar_limit() {
        let err = MarketHistory::new(u32::MAX, &[1.0, 2.0], &[1.0, 2.0]).expect_err("overflows");
        assert_eq!(
            err,
            SimError::YearOverflow {
                first_year: u32::MAX,
                years: 2,
            }
        );

        let history = MarketHistory::new(u32::MAX, &[1.0], &[1.0]).expect("single year fits");
        assert_eq!(history.last_year(), u32::MAX);
        assert_eq!(history.offset(u32::MAX), Some(0));
    }

    #[test]
    fn inflation_may_stop_one_year_early() {
        let stocks = [1.0, 2.0, 3.0];
        let history = MarketHistory::new(2000, &stocks, &stocks).expect("valid history");
        assert_eq!(history.inflation_at(0), None);

        let history = history.with_inflation(&[2.0, 3.0]).expect("one short is fine");
        assert_eq!(history.inflation_at(1), Some(3.0));
        assert_eq!(history.inflation_at(2), None);

        let err = history.with_inflation(&[2.0]).expect_err("two short");
        assert!(matches!(err, SimError::LengthMismatch { left: 1, right: 3, .. }));
    }

    #[test]
    fn bundled_histories_carry_inflation_through_2020() {
        let history = MarketHistory::total_market();
        assert_eq!(history.inflation_at(0), Some(1.53));
        assert_eq!(history.inflation_at(149), Some(1.36));
        assert_eq!(history.inflation_at(150), None);

        let history = MarketHistory::with_bonds(BondSeries::ShortTermBonds);
        assert_eq!(history.inflation_at(149), Some(1.36));
    }

    #[test]
    fn known_crash_years_line_up() {
        let history = MarketHistory::total_market();
        let offset = history.offset(2008).expect("2008 is covered");
        assert_eq!(history.stock_return_at(offset), -37.05);
        let offset = history.offset(1931).expect("1931 is covered");
        assert_eq!(history.stock_return_at(offset), -37.87);
    }
}
