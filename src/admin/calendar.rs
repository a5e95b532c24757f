use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::domain::booking::BookingRecord;

pub const GRID_CELLS: usize = 42;

/// Cell colour bucket: 1 / 2-3 / 4+ bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayLoad {
    Free,
    Light,
    Busy,
    Full,
}

impl DayLoad {
    fn from_count(count: usize) -> Self {
        match count {
            0 => DayLoad::Free,
            1 => DayLoad::Light,
            2..=3 => DayLoad::Busy,
            _ => DayLoad::Full,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub count: usize,
    pub load: DayLoad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    Outbound,
    Return,
}

/// One booking as listed under a selected day. A round trip shows up
/// on both its outbound and return day; the return leg displays the
/// return time and the swapped direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEntry {
    pub leg: Leg,
    pub time: String,
    pub direction: String,
    pub booking: BookingRecord,
}

/// A booking counts towards a cell when its transfer date or its
/// return date equals the cell's date.
fn lands_on(booking: &BookingRecord, date: NaiveDate) -> bool {
    booking.arrival_date == date || booking.return_date == Some(date)
}

/// 42-cell grid for the displayed month, starting from the Sunday on
/// or before the 1st.
pub fn month_grid(year: i32, month: u32, bookings: &[BookingRecord]) -> Option<Vec<CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let back = u64::from(first.weekday().num_days_from_sunday());
    let start = first.checked_sub_days(Days::new(back))?;

    let mut days = Vec::with_capacity(GRID_CELLS);
    for offset in 0..GRID_CELLS as u64 {
        let date = start.checked_add_days(Days::new(offset))?;
        let count = bookings.iter().filter(|b| lands_on(b, date)).count();
        days.push(CalendarDay {
            date,
            in_month: date.month() == month && date.year() == year,
            count,
            load: DayLoad::from_count(count),
        });
    }
    Some(days)
}

/// Listing for a selected day, tagging return-leg matches. Selection is
/// independent of the displayed month: callers keep the selected date
/// across month navigation until a new day is clicked.
pub fn day_entries(date: NaiveDate, bookings: &[BookingRecord]) -> Vec<DayEntry> {
    bookings
        .iter()
        .filter(|b| lands_on(b, date))
        .map(|booking| {
            let is_return = booking.return_date == Some(date);
            if is_return {
                DayEntry {
                    leg: Leg::Return,
                    time: booking
                        .return_time
                        .clone()
                        .unwrap_or_else(|| "00:00".to_string()),
                    direction: format!(
                        "{} → {}",
                        booking.dropoff_location, booking.pickup_location
                    ),
                    booking: booking.clone(),
                }
            } else {
                DayEntry {
                    leg: Leg::Outbound,
                    time: booking.arrival_time.clone(),
                    direction: format!(
                        "{} → {}",
                        booking.pickup_location, booking.dropoff_location
                    ),
                    booking: booking.clone(),
                }
            }
        })
        .collect()
}

/// Month navigation: exactly one calendar month per click.
pub fn shift_month(year: i32, month: u32, forward: bool) -> (i32, u32) {
    if forward {
        if month == 12 { (year + 1, 1) } else { (year, month + 1) }
    } else if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::test_fixtures::record;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn round_trip() -> BookingRecord {
        let mut booking = record("REF-RT");
        booking.trip_type = "round-trip".to_string();
        booking.arrival_date = date(2024, 7, 1);
        booking.arrival_time = "09:30".to_string();
        booking.return_date = Some(date(2024, 7, 5));
        booking.return_time = Some("17:45".to_string());
        booking
    }

    #[test]
    fn grid_has_42_cells_starting_on_a_sunday() {
        let grid = month_grid(2024, 7, &[]).unwrap();
        assert_eq!(grid.len(), GRID_CELLS);
        // July 2024 starts on a Monday; the grid opens on Sunday June 30.
        assert_eq!(grid[0].date, date(2024, 6, 30));
        assert!(!grid[0].in_month);
        assert!(grid[1].in_month);
        assert_eq!(grid[41].date, date(2024, 8, 10));
    }

    #[test]
    fn round_trip_counts_on_both_legs() {
        let bookings = vec![round_trip()];
        let grid = month_grid(2024, 7, &bookings).unwrap();
        let count_for = |d: NaiveDate| grid.iter().find(|c| c.date == d).unwrap().count;
        assert_eq!(count_for(date(2024, 7, 1)), 1);
        assert_eq!(count_for(date(2024, 7, 5)), 1);
        assert_eq!(count_for(date(2024, 7, 2)), 0);
    }

    #[test]
    fn return_leg_entry_swaps_direction_and_uses_return_time() {
        let bookings = vec![round_trip()];

        let outbound = day_entries(date(2024, 7, 1), &bookings);
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].leg, Leg::Outbound);
        assert_eq!(outbound[0].time, "09:30");
        assert_eq!(outbound[0].direction, "Paris → Charles de Gaulle");

        let ret = day_entries(date(2024, 7, 5), &bookings);
        assert_eq!(ret.len(), 1);
        assert_eq!(ret[0].leg, Leg::Return);
        assert_eq!(ret[0].time, "17:45");
        assert_eq!(ret[0].direction, "Charles de Gaulle → Paris");
    }

    #[test]
    fn load_buckets_match_the_legend() {
        assert_eq!(DayLoad::from_count(0), DayLoad::Free);
        assert_eq!(DayLoad::from_count(1), DayLoad::Light);
        assert_eq!(DayLoad::from_count(2), DayLoad::Busy);
        assert_eq!(DayLoad::from_count(3), DayLoad::Busy);
        assert_eq!(DayLoad::from_count(4), DayLoad::Full);
    }

    #[test]
    fn month_navigation_wraps_at_year_boundaries() {
        assert_eq!(shift_month(2024, 12, true), (2025, 1));
        assert_eq!(shift_month(2025, 1, false), (2024, 12));
        assert_eq!(shift_month(2024, 6, true), (2024, 7));
        assert_eq!(shift_month(2024, 6, false), (2024, 5));
    }
}
