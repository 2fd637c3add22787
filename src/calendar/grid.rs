use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Months shown on each side of the current month in the explore view.
pub const DEFAULT_WINDOW_MONTHS: u32 = 18;

/// Monday-first week row; `None` pads days outside the month.
pub type Week = [Option<NaiveDate>; 7];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    /// e.g. "January 2025"
    pub label: String,
    pub first_day: NaiveDate,
    pub weeks: Vec<Week>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flatten().filter_map(|slot| *slot)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.first_day.year() && date.month() == self.first_day.month()
    }
}

/// First day of the month `offset` months away from the month containing `today`.
pub fn month_start(today: NaiveDate, offset: i32) -> Option<NaiveDate> {
    let first = today.with_day(1)?;
    let delta = Months::new(offset.unsigned_abs());
    if offset >= 0 {
        first.checked_add_months(delta)
    } else {
        first.checked_sub_months(delta)
    }
}

/// Build the week grid for the month `offset` months from `today`.
///
/// Returns `None` only when the offset leaves chrono's representable range.
pub fn month_grid(today: NaiveDate, offset: i32) -> Option<MonthGrid> {
    month_start(today, offset).map(grid_from)
}

/// Grids for offsets `-past..=future`, oldest first.
pub fn month_window(today: NaiveDate, past: u32, future: u32) -> Vec<MonthGrid> {
    let past = i32::try_from(past).unwrap_or(i32::MAX);
    let future = i32::try_from(future).unwrap_or(i32::MAX);
    (-past..=future)
        .filter_map(|offset| month_grid(today, offset))
        .collect()
}

fn grid_from(first_day: NaiveDate) -> MonthGrid {
    let mut weeks = Vec::with_capacity(6);
    let mut week: Week = [None; 7];
    let mut slot = first_day.weekday().num_days_from_monday() as usize;

    for date in first_day
        .iter_days()
        .take_while(|d| d.month() == first_day.month())
    {
        week[slot] = Some(date);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }

    MonthGrid {
        label: first_day.format("%B %Y").to_string(),
        first_day,
        weeks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days_in_month(first: NaiveDate) -> BTreeSet<NaiveDate> {
        first
            .iter_days()
            .take_while(|d| d.month() == first.month())
            .collect()
    }

    #[test]
    fn test_rows_are_full_width_and_cover_the_month() {
        let today = date(2025, 6, 15);
        for offset in -30..=30 {
            let grid = month_grid(today, offset).unwrap();
            assert!(grid.weeks.iter().all(|w| w.len() == 7));
            let slots: BTreeSet<_> = grid.days().collect();
            assert_eq!(slots, days_in_month(grid.first_day), "offset {offset}");
            assert_eq!(grid.days().count(), slots.len());
        }
    }

    #[test]
    fn test_leading_padding_follows_weekday() {
        // 1 June 2025 is a Sunday, 1 September 2025 a Monday
        let june = month_grid(date(2025, 6, 1), 0).unwrap();
        assert_eq!(june.weeks[0][..6], [None; 6]);
        assert_eq!(june.weeks[0][6], Some(date(2025, 6, 1)));

        let september = month_grid(date(2025, 9, 20), 0).unwrap();
        assert_eq!(september.weeks[0][0], Some(date(2025, 9, 1)));
    }

    #[test]
    fn test_every_first_weekday_is_handled() {
        let mut seen = BTreeSet::new();
        for offset in 0..24 {
            let grid = month_grid(date(2024, 1, 1), offset).unwrap();
            let lead = grid.weeks[0].iter().take_while(|s| s.is_none()).count();
            assert_eq!(lead, grid.first_day.weekday().num_days_from_monday() as usize);
            let trailing = grid.weeks.last().unwrap().iter().rev().take_while(|s| s.is_none()).count();
            assert!(trailing < 7);
            seen.insert(lead);
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_february_lengths() {
        assert_eq!(month_grid(date(2024, 2, 10), 0).unwrap().days().count(), 29);
        assert_eq!(month_grid(date(2023, 2, 10), 0).unwrap().days().count(), 28);
        // Feb 2021 starts on a Monday and fills exactly four rows
        assert_eq!(month_grid(date(2021, 2, 1), 0).unwrap().weeks.len(), 4);
    }

    #[test]
    fn test_year_boundary() {
        let today = date(2024, 12, 31);
        let december = month_grid(today, 0).unwrap();
        let january = month_grid(today, 1).unwrap();
        assert_eq!(december.label, "December 2024");
        assert_eq!(january.label, "January 2025");

        let dec_days: BTreeSet<_> = december.days().collect();
        let jan_days: BTreeSet<_> = january.days().collect();
        assert!(dec_days.is_disjoint(&jan_days));

        let back = month_grid(date(2025, 1, 5), -1).unwrap();
        assert_eq!(back, december);
        assert_eq!(month_grid(today, -13).unwrap().label, "November 2023");
    }

    #[test]
    fn test_grid_is_deterministic() {
        let today = date(2025, 3, 3);
        assert_eq!(month_grid(today, 7), month_grid(today, 7));
    }

    #[test]
    fn test_window_is_ordered() {
        let window = month_window(date(2025, 6, 15), DEFAULT_WINDOW_MONTHS, DEFAULT_WINDOW_MONTHS);
        assert_eq!(window.len(), 37);
        assert_eq!(window[0].label, "December 2023");
        assert_eq!(window[18].label, "June 2025");
        assert_eq!(window[36].label, "December 2026");
        assert!(window.windows(2).all(|w| w[0].first_day < w[1].first_day));
    }

    #[test]
    fn test_out_of_range_offset_is_none() {
        assert!(month_grid(date(2025, 1, 1), i32::MAX).is_none());
    }
}
