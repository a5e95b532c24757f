use std::cmp::Ordering;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::booking::{BookingRecord, BookingStatus};

/// Date bucket computed against the booking's transfer date, not its
/// creation date. Weeks run Sunday through Saturday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBucket {
    #[default]
    All,
    Today,
    Tomorrow,
    ThisWeek,
    ThisMonth,
}

impl DateBucket {
    pub fn matches(self, arrival: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateBucket::All => true,
            DateBucket::Today => arrival == today,
            DateBucket::Tomorrow => Some(arrival) == today.checked_add_days(Days::new(1)),
            DateBucket::ThisWeek => {
                let back = u64::from(today.weekday().num_days_from_sunday());
                let Some(week_start) = today.checked_sub_days(Days::new(back)) else {
                    return false;
                };
                let Some(week_end) = week_start.checked_add_days(Days::new(6)) else {
                    return false;
                };
                arrival >= week_start && arrival <= week_end
            }
            DateBucket::ThisMonth => {
                arrival.month() == today.month() && arrival.year() == today.year()
            }
        }
    }
}

/// Intersection of four independent predicates; a booking must pass
/// all of them to appear in the table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub search: Option<String>,
    #[serde(default)]
    pub date: DateBucket,
    pub payment_method: Option<String>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &BookingRecord, today: NaiveDate) -> bool {
        let matches_status = self.status.map_or(true, |status| booking.status == status);

        let matches_search = self.search.as_deref().map_or(true, |term| {
            let term = term.to_lowercase();
            booking.name.to_lowercase().contains(&term)
                || booking.email.to_lowercase().contains(&term)
                || booking.booking_reference.to_lowercase().contains(&term)
                || booking.phone.contains(&term)
                || booking.pickup_location.to_lowercase().contains(&term)
                || booking.dropoff_location.to_lowercase().contains(&term)
        });

        let matches_date = self.date.matches(booking.arrival_date, today);

        let matches_payment = self
            .payment_method
            .as_deref()
            .map_or(true, |method| booking.payment_method == method);

        matches_status && matches_search && matches_date && matches_payment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    ArrivalDate,
    Name,
    Price,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortOrder {
    /// Clicking the active column flips direction; a new column resets
    /// to descending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.field = field;
            self.direction = SortDirection::Desc;
        }
    }
}

fn compare(a: &BookingRecord, b: &BookingRecord, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::ArrivalDate => a.arrival_date.cmp(&b.arrival_date),
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}

/// Filtered-and-sorted view over the full collection. The sort is
/// stable, so equal keys keep their fetched order.
pub fn filter_and_sort(
    bookings: &[BookingRecord],
    filter: &BookingFilter,
    order: SortOrder,
    today: NaiveDate,
) -> Vec<BookingRecord> {
    let mut view: Vec<BookingRecord> = bookings
        .iter()
        .filter(|booking| filter.matches(booking, today))
        .cloned()
        .collect();
    view.sort_by(|a, b| {
        let ordering = compare(a, b, order.field);
        match order.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    view
}

/// Header cards. Always computed over the unfiltered collection,
/// whatever filters the table currently applies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub today: usize,
    pub revenue: f64,
}

pub fn compute_stats(bookings: &[BookingRecord], today: NaiveDate) -> DashboardStats {
    DashboardStats {
        total: bookings.len(),
        pending: bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Pending)
            .count(),
        confirmed: bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Paid || b.status == BookingStatus::Confirmed)
            .count(),
        today: bookings.iter().filter(|b| b.arrival_date == today).count(),
        revenue: bookings.iter().map(|b| b.price).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::test_fixtures::record;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    #[test]
    fn filters_intersect() {
        let mut matching = record("REF-1");
        matching.status = BookingStatus::Pending;
        let mut wrong_search = record("REF-2");
        wrong_search.status = BookingStatus::Pending;
        wrong_search.name = "Bob".to_string();
        wrong_search.email = "bob@example.com".to_string();
        wrong_search.phone = "+33711111111".to_string();

        let filter = BookingFilter {
            status: Some(BookingStatus::Pending),
            search: Some("jane".to_string()),
            ..BookingFilter::default()
        };
        let bookings = vec![matching.clone(), wrong_search];
        let view = filter_and_sort(&bookings, &filter, SortOrder::default(), today());
        assert_eq!(view, vec![matching]);
    }

    #[test]
    fn matching_booking_appears_once_for_any_sort() {
        let bookings = vec![record("REF-1"), record("REF-2")];
        let filter = BookingFilter {
            search: Some("ref-1".to_string()),
            ..BookingFilter::default()
        };
        for field in [
            SortField::CreatedAt,
            SortField::ArrivalDate,
            SortField::Name,
            SortField::Price,
            SortField::Status,
        ] {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let view = filter_and_sort(
                    &bookings,
                    &filter,
                    SortOrder { field, direction },
                    today(),
                );
                assert_eq!(view.len(), 1);
                assert_eq!(view[0].booking_reference, "REF-1");
            }
        }
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let booking = record("VTC-42");
        let filter = |term: &str| BookingFilter {
            search: Some(term.to_string()),
            ..BookingFilter::default()
        };
        assert!(filter("JANE").matches(&booking, today()));
        assert!(filter("example.com").matches(&booking, today()));
        assert!(filter("vtc-42").matches(&booking, today()));
        assert!(filter("charles").matches(&booking, today()));
        assert!(!filter("nobody").matches(&booking, today()));
    }

    #[test]
    fn date_buckets_use_the_transfer_date() {
        // Tuesday 2026-09-01.
        let today = today();
        let mut booking = record("REF-1");

        booking.arrival_date = today;
        assert!(DateBucket::Today.matches(booking.arrival_date, today));

        booking.arrival_date = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
        assert!(DateBucket::Tomorrow.matches(booking.arrival_date, today));
        assert!(!DateBucket::Today.matches(booking.arrival_date, today));

        // Week of Sunday 2026-08-30 through Saturday 2026-09-05.
        assert!(DateBucket::ThisWeek
            .matches(NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(), today));
        assert!(DateBucket::ThisWeek
            .matches(NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(), today));
        assert!(!DateBucket::ThisWeek
            .matches(NaiveDate::from_ymd_opt(2026, 9, 6).unwrap(), today));

        assert!(DateBucket::ThisMonth
            .matches(NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(), today));
        assert!(!DateBucket::ThisMonth
            .matches(NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(), today));
    }

    #[test]
    fn toggle_flips_same_field_and_resets_new_field() {
        let mut order = SortOrder::default();
        assert_eq!(order.field, SortField::CreatedAt);
        assert_eq!(order.direction, SortDirection::Desc);

        order.toggle(SortField::CreatedAt);
        assert_eq!(order.direction, SortDirection::Asc);

        order.toggle(SortField::Price);
        assert_eq!(order.field, SortField::Price);
        assert_eq!(order.direction, SortDirection::Desc);
    }

    #[test]
    fn sorting_by_price_descending() {
        let mut cheap = record("REF-1");
        cheap.price = 50.0;
        let mut dear = record("REF-2");
        dear.price = 150.0;
        let view = filter_and_sort(
            &[cheap, dear],
            &BookingFilter::default(),
            SortOrder {
                field: SortField::Price,
                direction: SortDirection::Desc,
            },
            today(),
        );
        assert_eq!(view[0].booking_reference, "REF-2");
    }

    #[test]
    fn stats_ignore_the_active_filter() {
        let mut pending = record("REF-1");
        pending.status = BookingStatus::Pending;
        pending.price = 100.0;
        let mut paid = record("REF-2");
        paid.status = BookingStatus::Paid;
        paid.price = 60.0;
        paid.arrival_date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let mut cancelled = record("REF-3");
        cancelled.status = BookingStatus::Cancelled;
        cancelled.price = 40.0;

        let stats = compute_stats(&[pending, paid, cancelled], today());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.confirmed, 1);
        assert_eq!(stats.today, 2);
        assert_eq!(stats.revenue, 200.0);
    }
}
