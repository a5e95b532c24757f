use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Paid,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Paid => "paid",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// Server-owned booking as returned by `GET /admin/bookings`. Read-only
/// here; status changes are round-tripped through the backend and only
/// reflected after a full refetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: String,
    pub booking_reference: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub pickup_location: String,
    #[serde(default)]
    pub pickup_sub_location: Option<String>,
    #[serde(default)]
    pub pickup_address: Option<String>,
    #[serde(default)]
    pub pickup_flight_number: Option<String>,
    #[serde(default)]
    pub pickup_train_number: Option<String>,
    pub dropoff_location: String,
    #[serde(default)]
    pub dropoff_sub_location: Option<String>,
    #[serde(default)]
    pub dropoff_address: Option<String>,
    #[serde(default)]
    pub dropoff_flight_number: Option<String>,
    #[serde(default)]
    pub dropoff_train_number: Option<String>,
    pub passengers: u32,
    pub vehicle_type: String,
    pub arrival_date: NaiveDate,
    pub arrival_time: String,
    pub trip_type: String,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub return_time: Option<String>,
    pub price: f64,
    pub payment_method: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub baby_seat: Option<u32>,
    #[serde(default)]
    pub child_seat: Option<u32>,
    #[serde(default)]
    pub strollers: Option<u32>,
    #[serde(default)]
    pub hand_luggages: Option<u32>,
    #[serde(default)]
    pub backpacks: Option<u32>,
    #[serde(default)]
    pub suitcases: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}
