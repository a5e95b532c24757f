use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Top-level pickup/dropoff choices offered on the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    CharlesDeGaulle,
    Paris,
    Orly,
    Beauvais,
    Disneyland,
    TrainStation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Airport {
    CharlesDeGaulle,
    Orly,
    Beauvais,
}

impl Airport {
    pub fn wire_name(self) -> &'static str {
        match self {
            Airport::CharlesDeGaulle => "Charles de Gaulle",
            Airport::Orly => "Orly",
            Airport::Beauvais => "Beauvais",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Station {
    GareDuNord,
    GareDeLyon,
    Montparnasse,
    SaintLazare,
    Austerlitz,
    GareDeLEst,
    Bercy,
}

impl Station {
    pub fn wire_name(self) -> &'static str {
        match self {
            Station::GareDuNord => "Gare du Nord",
            Station::GareDeLyon => "Gare de Lyon",
            Station::Montparnasse => "Montparnasse",
            Station::SaintLazare => "Saint Lazare",
            Station::Austerlitz => "Austerlitz",
            Station::GareDeLEst => "Gare de l'Est",
            Station::Bercy => "Bercy",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Gare du Nord" => Some(Station::GareDuNord),
            "Gare de Lyon" => Some(Station::GareDeLyon),
            "Montparnasse" => Some(Station::Montparnasse),
            "Saint Lazare" => Some(Station::SaintLazare),
            "Austerlitz" => Some(Station::Austerlitz),
            "Gare de l'Est" => Some(Station::GareDeLEst),
            "Bercy" => Some(Station::Bercy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisneyDestination {
    Park,
    Hotels,
}

impl DisneyDestination {
    pub fn wire_name(self) -> &'static str {
        match self {
            DisneyDestination::Park => "Disneyland Park",
            DisneyDestination::Hotels => "Disney Hotels",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Disneyland Park" => Some(DisneyDestination::Park),
            "Disney Hotels" => Some(DisneyDestination::Hotels),
            _ => None,
        }
    }
}

/// One side of the route, as a tagged variant. Each location category
/// carries only the extra fields that apply to it, so selecting a new
/// top-level location drops every stale sub-field by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Place {
    Airport {
        airport: Airport,
        #[serde(default)]
        flight_number: String,
    },
    TrainStation {
        #[serde(default)]
        station: Option<Station>,
        #[serde(default)]
        train_number: String,
    },
    Disneyland {
        #[serde(default)]
        destination: Option<DisneyDestination>,
        #[serde(default)]
        hotel_address: String,
    },
    Paris {
        #[serde(default)]
        address: String,
    },
}

impl Place {
    /// Fresh, empty variant for a newly selected top-level location.
    pub fn new(kind: LocationKind) -> Self {
        match kind {
            LocationKind::CharlesDeGaulle => Place::Airport {
                airport: Airport::CharlesDeGaulle,
                flight_number: String::new(),
            },
            LocationKind::Orly => Place::Airport {
                airport: Airport::Orly,
                flight_number: String::new(),
            },
            LocationKind::Beauvais => Place::Airport {
                airport: Airport::Beauvais,
                flight_number: String::new(),
            },
            LocationKind::TrainStation => Place::TrainStation {
                station: None,
                train_number: String::new(),
            },
            LocationKind::Disneyland => Place::Disneyland {
                destination: None,
                hotel_address: String::new(),
            },
            LocationKind::Paris => Place::Paris {
                address: String::new(),
            },
        }
    }

    /// The top-level location name used on the wire and in search.
    pub fn location_name(&self) -> &'static str {
        match self {
            Place::Airport { airport, .. } => airport.wire_name(),
            Place::TrainStation { .. } => "Train Station",
            Place::Disneyland { .. } => "Disneyland",
            Place::Paris { .. } => "Paris",
        }
    }

    /// Whether every required sub-field for this category is filled.
    /// Flight and train numbers are optional everywhere.
    pub fn is_complete(&self) -> bool {
        match self {
            Place::Airport { .. } => true,
            Place::TrainStation { station, .. } => station.is_some(),
            Place::Disneyland {
                destination,
                hotel_address,
            } => match destination {
                None => false,
                Some(DisneyDestination::Park) => true,
                Some(DisneyDestination::Hotels) => !hotel_address.trim().is_empty(),
            },
            Place::Paris { address } => !address.trim().is_empty(),
        }
    }

    pub fn set_sub_location(&mut self, value: &str) -> AppResult<()> {
        match self {
            Place::TrainStation { station, .. } => {
                *station = if value.is_empty() {
                    None
                } else {
                    Some(Station::parse(value).ok_or_else(|| {
                        AppError::BadRequest(format!("Unknown train station: {}", value))
                    })?)
                };
                Ok(())
            }
            Place::Disneyland { destination, .. } => {
                *destination = if value.is_empty() {
                    None
                } else {
                    Some(DisneyDestination::parse(value).ok_or_else(|| {
                        AppError::BadRequest(format!("Unknown Disneyland destination: {}", value))
                    })?)
                };
                Ok(())
            }
            _ => Err(AppError::BadRequest(
                "This location has no sub-location".to_string(),
            )),
        }
    }

    pub fn set_address(&mut self, value: &str) -> AppResult<()> {
        match self {
            Place::Disneyland { hotel_address, .. } => {
                *hotel_address = value.to_string();
                Ok(())
            }
            Place::Paris { address } => {
                *address = value.to_string();
                Ok(())
            }
            _ => Err(AppError::BadRequest(
                "This location does not take an address".to_string(),
            )),
        }
    }

    pub fn set_flight_number(&mut self, value: &str) -> AppResult<()> {
        match self {
            Place::Airport { flight_number, .. } => {
                *flight_number = value.to_string();
                Ok(())
            }
            _ => Err(AppError::BadRequest(
                "Only airports take a flight number".to_string(),
            )),
        }
    }

    pub fn set_train_number(&mut self, value: &str) -> AppResult<()> {
        match self {
            Place::TrainStation { train_number, .. } => {
                *train_number = value.to_string();
                Ok(())
            }
            _ => Err(AppError::BadRequest(
                "Only train stations take a train number".to_string(),
            )),
        }
    }

    /// Flatten into the backend's column layout.
    pub fn wire_fields(&self) -> WireLocation {
        let mut wire = WireLocation {
            location: self.location_name().to_string(),
            ..WireLocation::default()
        };
        match self {
            Place::Airport { flight_number, .. } => {
                wire.flight_number = flight_number.clone();
            }
            Place::TrainStation {
                station,
                train_number,
            } => {
                wire.sub_location = station.map(|s| s.wire_name().to_string()).unwrap_or_default();
                wire.train_number = train_number.clone();
            }
            Place::Disneyland {
                destination,
                hotel_address,
            } => {
                wire.sub_location = destination
                    .map(|d| d.wire_name().to_string())
                    .unwrap_or_default();
                wire.address = hotel_address.clone();
            }
            Place::Paris { address } => {
                wire.address = address.clone();
            }
        }
        wire
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireLocation {
    pub location: String,
    pub sub_location: String,
    pub address: String,
    pub flight_number: String,
    pub train_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_variant_has_no_stale_fields() {
        let mut place = Place::new(LocationKind::TrainStation);
        place.set_sub_location("Gare de Lyon").unwrap();
        place.set_train_number("TGV 6543").unwrap();

        // Re-selecting the same category still starts from scratch.
        let fresh = Place::new(LocationKind::TrainStation);
        assert_eq!(
            fresh,
            Place::TrainStation {
                station: None,
                train_number: String::new()
            }
        );
    }

    #[test]
    fn airport_is_complete_without_flight_number() {
        assert!(Place::new(LocationKind::Orly).is_complete());
    }

    #[test]
    fn train_station_requires_station() {
        let mut place = Place::new(LocationKind::TrainStation);
        assert!(!place.is_complete());
        place.set_sub_location("Gare du Nord").unwrap();
        assert!(place.is_complete());
    }

    #[test]
    fn disney_hotels_require_address() {
        let mut place = Place::new(LocationKind::Disneyland);
        assert!(!place.is_complete());
        place.set_sub_location("Disneyland Park").unwrap();
        assert!(place.is_complete());
        place.set_sub_location("Disney Hotels").unwrap();
        assert!(!place.is_complete());
        place.set_address("Disney Hotel New York, Chessy").unwrap();
        assert!(place.is_complete());
    }

    #[test]
    fn paris_requires_address() {
        let mut place = Place::new(LocationKind::Paris);
        assert!(!place.is_complete());
        place.set_address("10 Rue de Rivoli, Paris").unwrap();
        assert!(place.is_complete());
    }

    #[test]
    fn sub_fields_rejected_for_wrong_category() {
        let mut place = Place::new(LocationKind::Paris);
        assert!(place.set_flight_number("AF 1234").is_err());
        assert!(place.set_train_number("TGV 1").is_err());
        assert!(place.set_sub_location("Bercy").is_err());
    }

    #[test]
    fn wire_fields_flatten_the_variant() {
        let mut place = Place::new(LocationKind::Disneyland);
        place.set_sub_location("Disney Hotels").unwrap();
        place.set_address("Hotel Cheyenne").unwrap();

        let wire = place.wire_fields();
        assert_eq!(wire.location, "Disneyland");
        assert_eq!(wire.sub_location, "Disney Hotels");
        assert_eq!(wire.address, "Hotel Cheyenne");
        assert_eq!(wire.flight_number, "");
        assert_eq!(wire.train_number, "");
    }
}
