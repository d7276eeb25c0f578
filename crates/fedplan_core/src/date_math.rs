//! Calendar helpers for age and service computations.
//!
//! Benefit rules are stated in whole months (FRA, MRA, years of service), so
//! everything here counts completed months directly from civil dates rather
//! than going through jiff `Span` arithmetic.

use jiff::civil::Date;

/// Completed months from `from` to `to`. Negative when `to` precedes `from`.
///
/// A month counts once the day-of-month has been reached, so 2020-03-15 to
/// 2020-04-14 is 0 months and to 2020-04-15 is 1 month.
#[inline]
pub fn months_between(from: Date, to: Date) -> i32 {
    let raw = (i32::from(to.year()) - i32::from(from.year())) * 12
        + (i32::from(to.month()) - i32::from(from.month()));
    if raw > 0 && to.day() < from.day() {
        raw - 1
    } else if raw < 0 && to.day() > from.day() {
        raw + 1
    } else {
        raw
    }
}

/// Age in completed months on `on` for someone born on `birth`.
#[inline]
pub fn age_in_months(birth: Date, on: Date) -> i32 {
    months_between(birth, on)
}

/// Age in completed years on `on`.
#[inline]
pub fn age_in_years(birth: Date, on: Date) -> i32 {
    age_in_months(birth, on).div_euclid(12)
}

/// Fraction of the calendar year that has elapsed before the first day of
/// `date`'s month. A January date yields 0.0, a July date 0.5.
#[inline]
pub fn elapsed_year_fraction(date: Date) -> f64 {
    f64::from(date.month() - 1) / 12.0
}

/// Fraction of the calendar year from the start of `date`'s month onward.
#[inline]
pub fn remaining_year_fraction(date: Date) -> f64 {
    1.0 - elapsed_year_fraction(date)
}
