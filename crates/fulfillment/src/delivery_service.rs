//! Courier fleet operations and the delivery ↔ courier ↔ order sagas.
//!
//! `assign_courier` is the one saga here with a true compensation: the
//! courier write lands first, and a failed delivery write reverts the
//! courier to Free. The completion and failure flows have no reverse
//! transitions behind them, so later-step write failures surface as
//! partial failures describing what was left behind.

use plategrid_core::{CancelToken, CourierId, OrderId};
use plategrid_logistics::{Courier, CourierRepository, Delivery, DeliveryRepository};
use plategrid_orders::{Order, OrderRepository};

use crate::error::{FulfillmentError, FulfillmentResult, ensure_active};

pub struct DeliveryService<D, C, O> {
    deliveries: D,
    couriers: C,
    orders: O,
}

impl<D, C, O> DeliveryService<D, C, O>
where
    D: DeliveryRepository,
    C: CourierRepository,
    O: OrderRepository,
{
    pub fn new(deliveries: D, couriers: C, orders: O) -> Self {
        Self {
            deliveries,
            couriers,
            orders,
        }
    }

    pub fn register_courier(
        &self,
        cancel: &CancelToken,
        name: String,
        phone: String,
    ) -> FulfillmentResult<Courier> {
        ensure_active(cancel)?;
        if name.trim().is_empty() || phone.trim().is_empty() {
            return Err(FulfillmentError::validation(
                "courier name and phone are required",
            ));
        }

        let courier = Courier::register(name, phone);
        self.save_courier(&courier, "failed to register courier")?;

        tracing::info!("registered courier {} ({})", courier.id(), courier.name());
        Ok(courier)
    }

    pub fn courier_go_online(
        &self,
        cancel: &CancelToken,
        courier_id: CourierId,
    ) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut courier = self.load_courier(courier_id)?;
        courier.go_online();
        self.save_courier(&courier, "failed to save courier shift start")?;

        tracing::info!("courier {} is online", courier_id);
        Ok(())
    }

    pub fn courier_go_offline(
        &self,
        cancel: &CancelToken,
        courier_id: CourierId,
    ) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut courier = self.load_courier(courier_id)?;
        courier.go_offline()?;
        self.save_courier(&courier, "failed to save courier shift end")?;

        tracing::info!("courier {} is offline", courier_id);
        Ok(())
    }

    pub fn update_courier_location(
        &self,
        cancel: &CancelToken,
        courier_id: CourierId,
        lat: f64,
        lng: f64,
    ) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut courier = self.load_courier(courier_id)?;
        courier.update_location(lat, lng)?;
        self.save_courier(&courier, "failed to persist courier location")?;
        Ok(())
    }

    /// Couriers currently free to take an order.
    pub fn available_couriers(&self, cancel: &CancelToken) -> FulfillmentResult<Vec<Courier>> {
        ensure_active(cancel)?;
        self.couriers
            .find_available()
            .map_err(|e| FulfillmentError::storage("failed to list available couriers", e))
    }

    /// Put a courier on an order's delivery. The delivery record is
    /// created on first contact; a missing courier is a hard failure.
    /// Courier and delivery move together or not at all: if the delivery
    /// write fails after the courier write, the courier is reverted.
    pub fn assign_courier(
        &self,
        cancel: &CancelToken,
        order_id: OrderId,
        courier_id: CourierId,
    ) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut delivery = match self.deliveries.find_by_order_id(order_id) {
            Ok(Some(delivery)) => delivery,
            Ok(None) => Delivery::create(order_id),
            Err(e) => {
                return Err(FulfillmentError::storage(
                    format!("failed to load delivery for order {order_id}"),
                    e,
                ));
            }
        };

        let mut courier = self.load_courier(courier_id)?;
        courier.take_order()?;
        delivery.assign_courier(courier.id())?;

        self.save_courier(&courier, "failed to update courier status")?;

        if let Err(cause) = self.deliveries.save(&delivery) {
            tracing::warn!(
                "delivery save failed after courier {} took order {}, reverting courier: {}",
                courier_id,
                order_id,
                cause
            );
            courier.complete_order();
            if let Err(e) = self.couriers.save(&courier) {
                return Err(FulfillmentError::partial_failure(
                    "assign_courier",
                    format!(
                        "delivery for order {order_id} was not saved ({cause}) and courier {courier_id} is stranded busy: {e}"
                    ),
                ));
            }
            return Err(FulfillmentError::storage(
                format!("failed to save delivery assignment for order {order_id}"),
                cause,
            ));
        }

        tracing::info!("courier {} assigned to order {}", courier_id, order_id);
        Ok(())
    }

    /// The courier picked the order up: delivery OnWay, order Delivering.
    pub fn pickup(&self, cancel: &CancelToken, order_id: OrderId) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut delivery = self.load_delivery(order_id)?;
        delivery.pickup()?;
        self.save_delivery(&delivery, "failed to save delivery pickup")?;

        if let Err(e) = self.ship_order(order_id) {
            return Err(FulfillmentError::partial_failure(
                "pickup",
                format!(
                    "delivery for order {order_id} is on its way but the order was not updated: {e}"
                ),
            ));
        }

        tracing::info!("order {} picked up for delivery", order_id);
        Ok(())
    }

    pub fn update_location(
        &self,
        cancel: &CancelToken,
        order_id: OrderId,
        lat: f64,
        lng: f64,
    ) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut delivery = self.load_delivery(order_id)?;
        delivery.update_location(lat, lng)?;
        self.save_delivery(&delivery, "failed to persist location update")?;
        Ok(())
    }

    /// Close the trip: delivery Delivered, courier freed, order Completed.
    pub fn complete_delivery(&self, cancel: &CancelToken, order_id: OrderId) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut delivery = self.load_delivery(order_id)?;
        let courier_id = delivery.courier_id();
        delivery.complete()?;
        self.save_delivery(&delivery, "failed to save delivery completion")?;

        let courier_id = courier_id.ok_or_else(|| {
            FulfillmentError::partial_failure(
                "complete_delivery",
                format!("delivery for order {order_id} completed without a courier link"),
            )
        })?;

        if let Err(e) = self.free_courier(courier_id) {
            return Err(FulfillmentError::partial_failure(
                "complete_delivery",
                format!(
                    "delivery for order {order_id} completed but courier {courier_id} is still busy: {e}"
                ),
            ));
        }

        if let Err(e) = self.complete_order(order_id) {
            return Err(FulfillmentError::partial_failure(
                "complete_delivery",
                format!(
                    "delivery and courier updated but order {order_id} was not completed: {e}"
                ),
            ));
        }

        tracing::info!(
            "order {} delivered, courier {} is free again",
            order_id,
            courier_id
        );
        Ok(())
    }

    /// The courier could not hand the order over: delivery Failed, courier
    /// freed. The order is left as is for manual follow-up.
    pub fn fail_delivery(&self, cancel: &CancelToken, order_id: OrderId) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut delivery = self.load_delivery(order_id)?;
        let courier_id = delivery.courier_id();
        delivery.mark_failed()?;
        self.save_delivery(&delivery, "failed to save delivery failure")?;

        if let Some(courier_id) = courier_id {
            if let Err(e) = self.free_courier(courier_id) {
                return Err(FulfillmentError::partial_failure(
                    "fail_delivery",
                    format!(
                        "delivery for order {order_id} marked failed but courier {courier_id} is still busy: {e}"
                    ),
                ));
            }
            tracing::warn!(
                "delivery for order {} failed, courier {} freed",
                order_id,
                courier_id
            );
        } else {
            tracing::warn!("delivery for order {} failed before assignment", order_id);
        }

        Ok(())
    }

    fn ship_order(&self, order_id: OrderId) -> FulfillmentResult<()> {
        let mut order = self.load_order(order_id)?;
        order.ship_to_delivery()?;
        self.orders.save(&order).map_err(|e| {
            FulfillmentError::storage(format!("failed to update order {order_id} to delivering"), e)
        })
    }

    fn complete_order(&self, order_id: OrderId) -> FulfillmentResult<()> {
        let mut order = self.load_order(order_id)?;
        order.complete_delivery()?;
        self.orders.save(&order).map_err(|e| {
            FulfillmentError::storage(format!("failed to update order {order_id} to completed"), e)
        })
    }

    fn free_courier(&self, courier_id: CourierId) -> FulfillmentResult<()> {
        let mut courier = self.load_courier(courier_id)?;
        courier.complete_order();
        self.save_courier(&courier, "failed to save freed courier")
    }

    fn load_order(&self, order_id: OrderId) -> FulfillmentResult<Order> {
        self.orders
            .find_by_id(order_id)
            .map_err(|e| FulfillmentError::storage(format!("failed to load order {order_id}"), e))?
            .ok_or_else(|| FulfillmentError::not_found("order", order_id))
    }

    fn load_courier(&self, courier_id: CourierId) -> FulfillmentResult<Courier> {
        self.couriers
            .find_by_id(courier_id)
            .map_err(|e| {
                FulfillmentError::storage(format!("failed to locate courier {courier_id}"), e)
            })?
            .ok_or_else(|| FulfillmentError::not_found("courier", courier_id))
    }

    fn load_delivery(&self, order_id: OrderId) -> FulfillmentResult<Delivery> {
        self.deliveries
            .find_by_order_id(order_id)
            .map_err(|e| {
                FulfillmentError::storage(
                    format!("failed to load delivery for order {order_id}"),
                    e,
                )
            })?
            .ok_or_else(|| FulfillmentError::not_found("delivery for order", order_id))
    }

    fn save_delivery(&self, delivery: &Delivery, op: &str) -> FulfillmentResult<()> {
        self.deliveries.save(delivery).map_err(|e| {
            FulfillmentError::storage(format!("{op} for order {}", delivery.order_id()), e)
        })
    }

    fn save_courier(&self, courier: &Courier, op: &str) -> FulfillmentResult<()> {
        self.couriers
            .save(courier)
            .map_err(|e| FulfillmentError::storage(format!("{op} {}", courier.id()), e))
    }
}
