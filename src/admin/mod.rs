pub mod calendar;
pub mod dashboard;
pub mod session;

use crate::admin::dashboard::{BookingFilter, SortOrder};
use crate::admin::session::SessionGuard;
use crate::clients::backend::BackendClient;
use crate::domain::booking::BookingRecord;
use crate::error::AppResult;

/// Admin back-office state: the session guard plus the in-memory
/// booking collection and the current table view. The collection is
/// always replaced wholesale on refetch, never patched.
pub struct AdminState {
    pub guard: SessionGuard,
    pub bookings: Vec<BookingRecord>,
    pub loaded: bool,
    pub filter: BookingFilter,
    pub sort: SortOrder,
}

impl AdminState {
    pub fn new(guard: SessionGuard) -> Self {
        Self {
            guard,
            bookings: Vec::new(),
            loaded: false,
            filter: BookingFilter::default(),
            sort: SortOrder::default(),
        }
    }

    /// Full refetch; on success the collection is swapped in one move.
    pub async fn refetch(&mut self, backend: &BackendClient, token: &str) -> AppResult<()> {
        let bookings = backend.admin_bookings(token).await?;
        self.bookings = bookings;
        self.loaded = true;
        Ok(())
    }

    /// Forget everything tied to the signed-in session.
    pub fn reset(&mut self) {
        self.bookings.clear();
        self.loaded = false;
        self.filter = BookingFilter::default();
        self.sort = SortOrder::default();
    }
}
