use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use plategrid_core::{CourierId, OrderId, StorageError};

use crate::geo::{GeoPoint, InvalidCoordinates};

/// Delivery lifecycle: Pending → Assigned → OnWay → Delivered | Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Assigned,
    OnWay,
    Delivered,
    Failed,
}

impl core::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Assigned => "assigned",
            DeliveryStatus::OnWay => "on_way",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Assignment only acts on a pending delivery; re-assignment is
    /// rejected rather than silently re-routed.
    #[error("delivery is not in pending state")]
    NotPending,

    #[error("courier is not assigned")]
    NotAssigned,

    #[error("delivery is not on its way")]
    NotOnWay,

    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),
}

/// Aggregate root: the trip bringing one order to the customer. Keyed by
/// the order id; the courier link is set at assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    order_id: OrderId,
    courier_id: Option<CourierId>,
    status: DeliveryStatus,
    created_at: DateTime<Utc>,
    pickup_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    location: Option<GeoPoint>,
}

impl Delivery {
    /// Open a pending delivery for an order.
    pub fn create(order_id: OrderId) -> Self {
        Self {
            order_id,
            courier_id: None,
            status: DeliveryStatus::Pending,
            created_at: Utc::now(),
            pickup_at: None,
            delivered_at: None,
            location: None,
        }
    }

    /// Pending → Assigned, linking the courier.
    pub fn assign_courier(&mut self, courier_id: CourierId) -> Result<(), DeliveryError> {
        if self.status != DeliveryStatus::Pending {
            return Err(DeliveryError::NotPending);
        }
        self.courier_id = Some(courier_id);
        self.status = DeliveryStatus::Assigned;
        Ok(())
    }

    /// Assigned → OnWay, stamping the pickup time.
    pub fn pickup(&mut self) -> Result<(), DeliveryError> {
        if self.status != DeliveryStatus::Assigned {
            return Err(DeliveryError::NotAssigned);
        }
        self.status = DeliveryStatus::OnWay;
        self.pickup_at = Some(Utc::now());
        Ok(())
    }

    /// OnWay → Delivered, stamping the handover time.
    pub fn complete(&mut self) -> Result<(), DeliveryError> {
        if self.status != DeliveryStatus::OnWay {
            return Err(DeliveryError::NotOnWay);
        }
        self.status = DeliveryStatus::Delivered;
        self.delivered_at = Some(Utc::now());
        Ok(())
    }

    /// OnWay → Failed, the courier-reported abort branch.
    pub fn mark_failed(&mut self) -> Result<(), DeliveryError> {
        if self.status != DeliveryStatus::OnWay {
            return Err(DeliveryError::NotOnWay);
        }
        self.status = DeliveryStatus::Failed;
        Ok(())
    }

    pub fn update_location(&mut self, lat: f64, lng: f64) -> Result<(), DeliveryError> {
        self.location = Some(GeoPoint::new(lat, lng)?);
        Ok(())
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn courier_id(&self) -> Option<CourierId> {
        self.courier_id
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn pickup_at(&self) -> Option<DateTime<Utc>> {
        self.pickup_at
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

/// Persistence port for deliveries, keyed by the correlated order.
pub trait DeliveryRepository {
    fn save(&self, delivery: &Delivery) -> Result<(), StorageError>;
    fn find_by_order_id(&self, order_id: OrderId) -> Result<Option<Delivery>, StorageError>;
}
