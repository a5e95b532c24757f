use serde::{Deserialize, Serialize};

use crate::domain::location::{LocationKind, Place};
use crate::domain::luggage::LuggageDetails;
use crate::domain::payment::{ContactDetails, PaymentMethod};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    OneWay,
    RoundTrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Berline,
    Van,
}

impl VehicleType {
    pub const ALL: [VehicleType; 2] = [VehicleType::Berline, VehicleType::Van];

    pub fn capacity(self) -> u32 {
        match self {
            VehicleType::Berline => 3,
            VehicleType::Van => 18,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            VehicleType::Berline => "berline",
            VehicleType::Van => "van",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "berline" => Some(VehicleType::Berline),
            "van" => Some(VehicleType::Van),
            _ => None,
        }
    }
}

/// Vehicle types offered for a given passenger count. Five or more
/// passengers are van-only; an unparsed count leaves everything open.
pub fn available_vehicles(passengers: Option<u32>) -> Vec<VehicleType> {
    match passengers {
        None => VehicleType::ALL.to_vec(),
        Some(count) if count >= 5 => vec![VehicleType::Van],
        Some(count) => VehicleType::ALL
            .into_iter()
            .filter(|v| v.capacity() >= count)
            .collect(),
    }
}

/// Client-side booking form state for the wizard session. Lives only
/// until submission; the server-owned booking outlives it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingDraft {
    pub pickup: Option<Place>,
    pub dropoff: Option<Place>,
    /// Kept as entered; parsed on demand.
    pub passengers: String,
    pub vehicle_type: Option<VehicleType>,
    pub date: String,
    pub time: String,
    pub trip_type: TripType,
    pub return_date: String,
    pub return_time: String,
}

impl Default for TripType {
    fn default() -> Self {
        TripType::OneWay
    }
}

impl BookingDraft {
    pub fn passenger_count(&self) -> Option<u32> {
        self.passengers.parse().ok().filter(|&n| n > 0)
    }

    pub fn available_vehicles(&self) -> Vec<VehicleType> {
        available_vehicles(self.passenger_count())
    }

    /// Replaces the whole variant, so stale sub-location, address,
    /// flight and train fields never survive a location change.
    pub fn set_pickup_location(&mut self, kind: LocationKind) {
        self.pickup = Some(Place::new(kind));
    }

    pub fn set_dropoff_location(&mut self, kind: LocationKind) {
        self.dropoff = Some(Place::new(kind));
    }

    pub fn set_passengers(&mut self, value: &str) -> AppResult<()> {
        if !value.is_empty() && value.parse::<u32>().map_or(true, |n| n == 0 || n > 18) {
            return Err(AppError::BadRequest(
                "Passengers must be between 1 and 18".to_string(),
            ));
        }
        self.passengers = value.to_string();

        if let Some(count) = self.passenger_count() {
            let offered = available_vehicles(Some(count));
            if let Some(current) = self.vehicle_type {
                if !offered.contains(&current) {
                    self.vehicle_type = None;
                }
            }
            if count >= 5 && self.vehicle_type.is_none() {
                self.vehicle_type = Some(VehicleType::Van);
            }
        }
        Ok(())
    }

    pub fn set_vehicle_type(&mut self, value: &str) -> AppResult<()> {
        if value.is_empty() {
            self.vehicle_type = None;
            return Ok(());
        }
        let vehicle = VehicleType::parse(value)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown vehicle type: {}", value)))?;
        if !self.available_vehicles().contains(&vehicle) {
            return Err(AppError::BadRequest(format!(
                "{} cannot carry {} passengers",
                value, self.passengers
            )));
        }
        self.vehicle_type = Some(vehicle);
        Ok(())
    }

    pub fn set_trip_type(&mut self, trip_type: TripType) {
        self.trip_type = trip_type;
        if trip_type == TripType::OneWay {
            self.return_date.clear();
            self.return_time.clear();
        }
    }

    /// Request key for the price estimate, or `None` when one of the
    /// three required inputs is still missing (no network call then).
    pub fn estimate_request(&self) -> Option<EstimateRequest> {
        let pickup = self.pickup.as_ref()?;
        let dropoff = self.dropoff.as_ref()?;
        let vehicle = self.vehicle_type?;
        Some(EstimateRequest {
            pickup: pickup.location_name().to_string(),
            dropoff: dropoff.location_name().to_string(),
            vehicle_type: vehicle.wire_name().to_string(),
            trip_type: self.trip_type,
            passengers: self.passengers.clone(),
        })
    }

    /// Full `booking-and-pay` body, route plus luggage plus contact.
    pub fn submission_payload(
        &self,
        luggage: &LuggageDetails,
        contact: &ContactDetails,
        price: f64,
    ) -> AppResult<BookingPayload> {
        let pickup = self
            .pickup
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Pickup location missing".to_string()))?
            .wire_fields();
        let dropoff = self
            .dropoff
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Dropoff location missing".to_string()))?
            .wire_fields();
        let vehicle = self
            .vehicle_type
            .ok_or_else(|| AppError::BadRequest("Vehicle type missing".to_string()))?;
        let payment_method = contact
            .payment_method
            .ok_or_else(|| AppError::BadRequest("Payment method missing".to_string()))?;
        let passengers = self.passenger_count().ok_or_else(|| {
            AppError::BadRequest("Please enter the number of passengers".to_string())
        })?;

        let round_trip = self.trip_type == TripType::RoundTrip;
        Ok(BookingPayload {
            pickup_location: pickup.location,
            pickup_sub_location: pickup.sub_location,
            pickup_address: pickup.address,
            pickup_flight_number: pickup.flight_number,
            pickup_train_number: pickup.train_number,
            dropoff_location: dropoff.location,
            dropoff_sub_location: dropoff.sub_location,
            dropoff_address: dropoff.address,
            dropoff_flight_number: dropoff.flight_number,
            dropoff_train_number: dropoff.train_number,
            passengers,
            vehicle_type: vehicle.wire_name().to_string(),
            arrival_date: self.date.clone(),
            arrival_time: self.time.clone(),
            return_date: round_trip.then(|| self.return_date.clone()),
            return_time: round_trip.then(|| self.return_time.clone()),
            trip_type: self.trip_type,
            baby_seat: luggage.baby_seats,
            child_seat: luggage.child_seats,
            strollers: luggage.strollers,
            hand_luggages: luggage.hand_luggages,
            backpacks: luggage.backpacks,
            suitcases: luggage.suitcases,
            payment_method,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            notes: contact.notes.clone(),
            price,
            language: "en".to_string(),
        })
    }
}

/// Field-level edit coming from the step-1 form. Every field is
/// optional; only present fields are applied, in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    pub pickup_location: Option<LocationKind>,
    pub pickup_sub_location: Option<String>,
    pub pickup_address: Option<String>,
    pub pickup_flight_number: Option<String>,
    pub pickup_train_number: Option<String>,
    pub dropoff_location: Option<LocationKind>,
    pub dropoff_sub_location: Option<String>,
    pub dropoff_address: Option<String>,
    pub dropoff_flight_number: Option<String>,
    pub dropoff_train_number: Option<String>,
    pub passengers: Option<String>,
    pub vehicle_type: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub trip_type: Option<TripType>,
    pub return_date: Option<String>,
    pub return_time: Option<String>,
}

impl BookingDraft {
    pub fn apply(&mut self, patch: DraftPatch) -> AppResult<()> {
        if let Some(kind) = patch.pickup_location {
            self.set_pickup_location(kind);
        }
        if let Some(kind) = patch.dropoff_location {
            self.set_dropoff_location(kind);
        }
        apply_place_patch(
            self.pickup.as_mut(),
            "pickup",
            patch.pickup_sub_location,
            patch.pickup_address,
            patch.pickup_flight_number,
            patch.pickup_train_number,
        )?;
        apply_place_patch(
            self.dropoff.as_mut(),
            "dropoff",
            patch.dropoff_sub_location,
            patch.dropoff_address,
            patch.dropoff_flight_number,
            patch.dropoff_train_number,
        )?;
        if let Some(passengers) = patch.passengers {
            self.set_passengers(&passengers)?;
        }
        if let Some(vehicle) = patch.vehicle_type {
            self.set_vehicle_type(&vehicle)?;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(trip_type) = patch.trip_type {
            self.set_trip_type(trip_type);
        }
        if let Some(return_date) = patch.return_date {
            if self.trip_type == TripType::RoundTrip {
                self.return_date = return_date;
            }
        }
        if let Some(return_time) = patch.return_time {
            if self.trip_type == TripType::RoundTrip {
                self.return_time = return_time;
            }
        }
        Ok(())
    }
}

fn apply_place_patch(
    place: Option<&mut Place>,
    side: &str,
    sub_location: Option<String>,
    address: Option<String>,
    flight_number: Option<String>,
    train_number: Option<String>,
) -> AppResult<()> {
    if sub_location.is_none() && address.is_none() && flight_number.is_none() && train_number.is_none()
    {
        return Ok(());
    }
    let place = place.ok_or_else(|| {
        AppError::BadRequest(format!("Select a {} location first", side))
    })?;
    if let Some(value) = sub_location {
        place.set_sub_location(&value)?;
    }
    if let Some(value) = address {
        place.set_address(&value)?;
    }
    if let Some(value) = flight_number {
        place.set_flight_number(&value)?;
    }
    if let Some(value) = train_number {
        place.set_train_number(&value)?;
    }
    Ok(())
}

/// Wire body for `POST /estimate` (camelCase, passengers as entered).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub pickup: String,
    pub dropoff: String,
    pub vehicle_type: String,
    pub trip_type: TripType,
    pub passengers: String,
}

/// Wire body for `POST /booking-and-pay` (snake_case backend columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub pickup_location: String,
    pub pickup_sub_location: String,
    pub pickup_address: String,
    pub pickup_flight_number: String,
    pub pickup_train_number: String,
    pub dropoff_location: String,
    pub dropoff_sub_location: String,
    pub dropoff_address: String,
    pub dropoff_flight_number: String,
    pub dropoff_train_number: String,
    pub passengers: u32,
    pub vehicle_type: String,
    pub arrival_date: String,
    pub arrival_time: String,
    pub return_date: Option<String>,
    pub return_time: Option<String>,
    pub trip_type: TripType,
    pub baby_seat: u32,
    pub child_seat: u32,
    pub strollers: u32,
    pub hand_luggages: u32,
    pub backpacks: u32,
    pub suitcases: u32,
    pub payment_method: PaymentMethod,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
    pub price: f64,
    pub language: String,
}
