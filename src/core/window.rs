use super::SimError;
use super::types::Lowest;

/// Keep the entries of `values` whose start year lies in `min_year..=max_year`.
///
/// An inverted range selects nothing.
pub fn restrict<T: Copy>(
    values: &[T],
    start_years: &[u32],
    min_year: u32,
    max_year: u32,
) -> Result<Vec<T>, SimError> {
    check_aligned(values.len(), start_years.len())?;
    Ok(values
        .iter()
        .zip(start_years)
        .filter(|&(_, &year)| year >= min_year && year <= max_year)
        .map(|(&value, _)| value)
        .collect())
}

/// Smallest value and its year; ties resolve to the earliest entry.
pub fn lowest(values: &[f64], years: &[u32]) -> Result<Lowest, SimError> {
    check_aligned(values.len(), years.len())?;
    let index = lowest_index(values, None).ok_or(SimError::EmptyInput { what: "values" })?;
    Ok(Lowest {
        value: values[index],
        year: years[index],
    })
}

/// Worst and second-worst entries, each taken at its earliest occurrence.
pub fn lowest_two(values: &[f64], years: &[u32]) -> Result<(Lowest, Option<Lowest>), SimError> {
    check_aligned(values.len(), years.len())?;
    let worst = lowest_index(values, None).ok_or(SimError::EmptyInput { what: "values" })?;
    let second = lowest_index(values, Some(worst));
    Ok((
        Lowest {
            value: values[worst],
            year: years[worst],
        },
        second.map(|index| Lowest {
            value: values[index],
            year: years[index],
        }),
    ))
}

fn lowest_index(values: &[f64], skip: Option<usize>) -> Option<usize> {
    let mut low: Option<usize> = None;
    for (index, &value) in values.iter().enumerate() {
        if Some(index) == skip {
            continue;
        }
        if low.is_none_or(|low| value < values[low]) {
            low = Some(index);
        }
    }
    low
}

fn check_aligned(values: usize, years: usize) -> Result<(), SimError> {
    if values != years {
        return Err(SimError::LengthMismatch {
            what: "values vs start years",
            left: values,
            right: years,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEARS: [u32; 4] = [2000, 2001, 2002, 2003];

    #[test]
    fn restrict_keeps_inclusive_bounds_in_order() {
        let values = [5.0, 3.0, 3.0, 8.0];
        let kept = restrict(&values, &YEARS, 2001, 2003).expect("aligned");
        assert_eq!(kept, vec![3.0, 3.0, 8.0]);
    }

    #[test]
    fn restrict_can_filter_the_years_themselves() {
        let kept = restrict(&YEARS, &YEARS, 1990, 2001).expect("aligned");
        assert_eq!(kept, vec![2000, 2001]);
    }

    #[test]
    fn restrict_with_inverted_range_is_empty() {
        let kept = restrict(&[1.0, 2.0, 3.0, 4.0], &YEARS, 2003, 2000).expect("aligned");
        assert!(kept.is_empty());
    }

    #[test]
    fn restrict_rejects_misaligned_input() {
        let err = restrict(&[1.0, 2.0], &YEARS, 2000, 2003).expect_err("must reject");
        assert_eq!(
            err,
            SimError::LengthMismatch {
                what: "values vs start years",
                left: 2,
                right: 4,
            }
        );
    }

    #[test]
    fn lowest_prefers_first_occurrence_on_ties() {
        let low = lowest(&[5.0, 3.0, 3.0, 8.0], &YEARS).expect("non-empty");
        assert_eq!(low, Lowest { value: 3.0, year: 2001 });
    }

    #[test]
    fn lowest_handles_negative_depleted_portfolios() {
        let low = lowest(&[10.0, -250.0, 0.0], &[1929, 1930, 1931]).expect("non-empty");
        assert_eq!(low, Lowest { value: -250.0, year: 1930 });
    }

    #[test]
    fn lowest_rejects_empty_input() {
        let err = lowest(&[], &[]).expect_err("must reject");
        assert_eq!(err, SimError::EmptyInput { what: "values" });
    }

    #[test]
    fn lowest_rejects_misaligned_input() {
        assert!(matches!(
            lowest(&[1.0], &YEARS),
            Err(SimError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn lowest_two_reports_worst_and_runner_up() {
        let (worst, second) = lowest_two(&[5.0, 3.0, 4.0, 8.0], &YEARS).expect("non-empty");
        assert_eq!(worst, Lowest { value: 3.0, year: 2001 });
        assert_eq!(second, Some(Lowest { value: 4.0, year: 2002 }));
    }

    #[test]
    fn lowest_two_counts_a_tie_as_the_runner_up() {
        let (worst, second) = lowest_two(&[5.0, 3.0, 3.0, 8.0], &YEARS).expect("non-empty");
        assert_eq!(worst.year, 2001);
        assert_eq!(second, Some(Lowest { value: 3.0, year: 2002 }));
    }

    #[test]
    fn lowest_two_of_single_value_has_no_runner_up() {
        let (worst, second) = lowest_two(&[7.0], &[1999]).expect("non-empty");
        assert_eq!(worst, Lowest { value: 7.0, year: 1999 });
        assert_eq!(second, None);
    }
}
