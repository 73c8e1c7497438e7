//! Order-side operations: creation, pricing adjustments, the paid mark.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plategrid_core::{CancelToken, CustomerId, Money, OrderId, ProductId};
use plategrid_orders::{DeliveryAddress, Order, OrderRepository, Topping};

use crate::error::{FulfillmentError, FulfillmentResult, ensure_active};

/// Request to open an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderInput {
    pub customer_id: CustomerId,
    pub address: DeliveryAddress,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub base_price: Money,
    pub size_multiplier: Decimal,
    pub toppings: Vec<Topping>,
}

pub struct OrderService<R> {
    orders: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(orders: R) -> Self {
        Self { orders }
    }

    /// Validate the request, build the order, price every line, persist.
    pub fn create_order(
        &self,
        cancel: &CancelToken,
        input: CreateOrderInput,
    ) -> FulfillmentResult<Order> {
        ensure_active(cancel)?;
        if input.items.is_empty() {
            return Err(FulfillmentError::validation(
                "order must have at least one item",
            ));
        }
        if !input.address.is_complete() {
            return Err(FulfillmentError::validation("incomplete delivery address"));
        }

        let mut order = Order::create(input.customer_id, input.address);
        for item in input.items {
            order.add_item(
                item.product_id,
                item.name,
                item.quantity,
                item.base_price,
                item.size_multiplier,
                item.toppings,
            )?;
        }

        self.save(&order, "failed to save new order")?;
        tracing::info!(
            "created order {} ({}) totaling {}",
            order.id(),
            order.order_number(),
            order.final_price()
        );
        Ok(order)
    }

    pub fn apply_promo_code(
        &self,
        cancel: &CancelToken,
        order_id: OrderId,
        code: String,
        discount: Money,
    ) -> FulfillmentResult<()> {
        ensure_active(cancel)?;
        if code.trim().is_empty() {
            return Err(FulfillmentError::validation("promo code is required"));
        }

        let mut order = self.load(order_id)?;
        order.apply_promo_code(code, discount)?;
        self.save(&order, "failed to save promo code")?;

        tracing::info!(
            "applied promo code to order {}, new total {}",
            order_id,
            order.final_price()
        );
        Ok(())
    }

    pub fn set_delivery_price(
        &self,
        cancel: &CancelToken,
        order_id: OrderId,
        price: Money,
    ) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut order = self.load(order_id)?;
        order.set_delivery_price(price)?;
        self.save(&order, "failed to save delivery price")?;

        tracing::info!(
            "set delivery price for order {}, new total {}",
            order_id,
            order.final_price()
        );
        Ok(())
    }

    /// The order-side Created → Paid transition.
    pub fn pay_order(&self, cancel: &CancelToken, order_id: OrderId) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut order = self.load(order_id)?;
        order.mark_paid()?;
        self.save(&order, "failed to save order after payment")?;

        tracing::info!("order {} marked paid", order_id);
        Ok(())
    }

    fn load(&self, order_id: OrderId) -> FulfillmentResult<Order> {
        self.orders
            .find_by_id(order_id)
            .map_err(|e| FulfillmentError::storage(format!("failed to load order {order_id}"), e))?
            .ok_or_else(|| FulfillmentError::not_found("order", order_id))
    }

    fn save(&self, order: &Order, op: &str) -> FulfillmentResult<()> {
        self.orders
            .save(order)
            .map_err(|e| FulfillmentError::storage(format!("{op} {}", order.id()), e))
    }
}
