use serde::{Deserialize, Serialize};
use thiserror::Error;

use plategrid_core::{CourierId, StorageError};

use crate::geo::{GeoPoint, InvalidCoordinates};

/// Courier availability: Offline (initial) → Free ↔ Busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourierStatus {
    Offline,
    Free,
    Busy,
}

impl core::fmt::Display for CourierStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            CourierStatus::Offline => "offline",
            CourierStatus::Free => "free",
            CourierStatus::Busy => "busy",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CourierError {
    /// Raised both when taking an order while not Free and when going
    /// offline mid-delivery.
    #[error("courier is busy")]
    Busy,

    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),
}

/// Aggregate root: a courier and their availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Courier {
    id: CourierId,
    name: String,
    phone: String,
    status: CourierStatus,
    location: Option<GeoPoint>,
}

impl Courier {
    /// Register a courier. Starts Offline with no known position.
    pub fn register(name: String, phone: String) -> Self {
        Self {
            id: CourierId::new(),
            name,
            phone,
            status: CourierStatus::Offline,
            location: None,
        }
    }

    /// Offline → Free. No-op for a courier already on shift.
    pub fn go_online(&mut self) {
        if self.status == CourierStatus::Offline {
            self.status = CourierStatus::Free;
        }
    }

    /// End the shift. Rejected mid-delivery.
    pub fn go_offline(&mut self) -> Result<(), CourierError> {
        if self.status == CourierStatus::Busy {
            return Err(CourierError::Busy);
        }
        self.status = CourierStatus::Offline;
        Ok(())
    }

    /// Free → Busy. An offline courier cannot take orders either.
    pub fn take_order(&mut self) -> Result<(), CourierError> {
        if self.status != CourierStatus::Free {
            return Err(CourierError::Busy);
        }
        self.status = CourierStatus::Busy;
        Ok(())
    }

    /// Busy → Free. No-op otherwise.
    pub fn complete_order(&mut self) {
        if self.status == CourierStatus::Busy {
            self.status = CourierStatus::Free;
        }
    }

    pub fn update_location(&mut self, lat: f64, lng: f64) -> Result<(), CourierError> {
        self.location = Some(GeoPoint::new(lat, lng)?);
        Ok(())
    }

    pub fn id(&self) -> CourierId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn status(&self) -> CourierStatus {
        self.status
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

/// Persistence port for couriers. `find_available` lists couriers ready to
/// take an order.
pub trait CourierRepository {
    fn save(&self, courier: &Courier) -> Result<(), StorageError>;
    fn find_by_id(&self, id: CourierId) -> Result<Option<Courier>, StorageError>;
    fn find_available(&self) -> Result<Vec<Courier>, StorageError>;
}
