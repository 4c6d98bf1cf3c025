//! Y-axis tick spacing

/// Tick spacing for a state sub-chart: the leading digit of `max` scaled two
/// orders of magnitude below it (45 678 -> 4 000, 987 -> 90). Single-digit
/// maxima use themselves; the result is never below 1.
pub fn leading_digit_tick(max: u64) -> u64 {
    let digits = decimal_digits(max);
    if digits < 2 {
        return max.max(1);
    }
    let scale = 10u64.pow(digits - 2);
    (max / (scale * 10)) * scale
}

/// Tick spacing for a national chart: half of the highest power of ten not
/// above `max` (550 000 -> 50 000)
pub fn series_tick(max: u64) -> u64 {
    let digits = decimal_digits(max);
    (10u64.pow(digits.saturating_sub(1)) / 2).max(1)
}

/// Ticks from 0 up to and including `max + tick`
pub fn tick_values(max: u64, tick: u64) -> Vec<u64> {
    let tick = tick.max(1);
    (0..=max + tick).step_by(tick as usize).collect()
}

/// Largest value of a series, rounded to the nearest integer
pub fn rounded_max<I>(values: I) -> u64
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max)
        .round() as u64
}

fn decimal_digits(value: u64) -> u32 {
    value.checked_ilog10().map_or(1, |d| d + 1)
}
