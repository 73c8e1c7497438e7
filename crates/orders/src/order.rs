use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use plategrid_core::{CustomerId, Money, OrderId, ProductId, StorageError};

/// Order lifecycle.
///
/// Strictly linear: Created → Paid → Cooking → Ready → Delivering →
/// Completed. Canceled is terminal and reachable only before the kitchen
/// gets involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
    Cooking,
    Ready,
    Delivering,
    Completed,
    Canceled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            OrderStatus::Created => "created",
            OrderStatus::Paid => "paid",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        };
        f.write_str(name)
    }
}

/// A priced extra on an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topping {
    pub name: String,
    pub price: Money,
}

/// Destination of an order. City and street are the required part; the
/// rest is courier guidance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub city: String,
    pub street: String,
    pub house: String,
    pub apartment: String,
    pub floor: String,
    pub comment: String,
}

impl DeliveryAddress {
    pub fn is_complete(&self) -> bool {
        !self.city.trim().is_empty() && !self.street.trim().is_empty()
    }
}

/// A single order line. Immutable once added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ProductId,
    product_name: String,
    quantity: u32,
    base_price: Money,
    size_multiplier: Decimal,
    toppings: Vec<Topping>,
}

impl OrderItem {
    /// A non-positive size multiplier falls back to 1, the catalog
    /// convention for products without size variants.
    fn new(
        product_id: ProductId,
        product_name: String,
        quantity: u32,
        base_price: Money,
        size_multiplier: Decimal,
        toppings: Vec<Topping>,
    ) -> Self {
        let size_multiplier = if size_multiplier <= Decimal::ZERO {
            Decimal::ONE
        } else {
            size_multiplier
        };
        Self {
            product_id,
            product_name,
            quantity,
            base_price,
            size_multiplier,
            toppings,
        }
    }

    /// Exact line total: (base price × size multiplier + Σ toppings) × quantity.
    pub fn total(&self) -> Money {
        let toppings: Money = self.toppings.iter().map(|t| t.price).sum();
        (self.base_price.scale(self.size_multiplier) + toppings).times(self.quantity)
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn size_multiplier(&self) -> Decimal {
        self.size_multiplier
    }

    pub fn toppings(&self) -> &[Topping] {
        &self.toppings
    }
}

/// Rule violations raised by the order aggregate. Every rejected call
/// leaves the order untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Pricing mutations are only legal while the order is still Created.
    #[error("order is locked for changes")]
    Locked,

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("invalid discount")]
    InvalidDiscount,

    #[error("invalid status transition: cannot {action} while {from}")]
    InvalidTransition {
        from: OrderStatus,
        action: &'static str,
    },
}

/// Aggregate root: a customer order from creation to completed delivery.
///
/// `final_price` is derived state and is recomputed after every pricing
/// mutation; it never goes stale and never drops below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_number: String,
    customer_id: CustomerId,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    items: Vec<OrderItem>,
    address: DeliveryAddress,
    delivery_price: Money,
    discount: Money,
    promo_code: Option<String>,
    final_price: Money,
}

impl Order {
    /// Open a new order. Starts Created with no items and a zero total.
    pub fn create(customer_id: CustomerId, address: DeliveryAddress) -> Self {
        let created_at = Utc::now();
        Self {
            id: OrderId::new(),
            order_number: generate_order_number(created_at),
            customer_id,
            status: OrderStatus::Created,
            created_at,
            items: Vec::new(),
            address,
            delivery_price: Money::ZERO,
            discount: Money::ZERO,
            promo_code: None,
            final_price: Money::ZERO,
        }
    }

    /// Append a line and reprice. The line takes ownership of its
    /// toppings, so no caller alias can change it afterwards.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        product_name: String,
        quantity: u32,
        base_price: Money,
        size_multiplier: Decimal,
        toppings: Vec<Topping>,
    ) -> Result<(), OrderError> {
        if self.status != OrderStatus::Created {
            return Err(OrderError::Locked);
        }
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }

        self.items.push(OrderItem::new(
            product_id,
            product_name,
            quantity,
            base_price,
            size_multiplier,
            toppings,
        ));
        self.recalculate();
        Ok(())
    }

    pub fn apply_promo_code(&mut self, code: String, discount: Money) -> Result<(), OrderError> {
        if self.status != OrderStatus::Created {
            return Err(OrderError::Locked);
        }
        if discount.is_negative() {
            return Err(OrderError::InvalidDiscount);
        }

        self.promo_code = Some(code);
        self.discount = discount;
        self.recalculate();
        Ok(())
    }

    /// Delivery pricing obeys the same Created-only lock as the other
    /// pricing mutators.
    pub fn set_delivery_price(&mut self, price: Money) -> Result<(), OrderError> {
        if self.status != OrderStatus::Created {
            return Err(OrderError::Locked);
        }

        self.delivery_price = price;
        self.recalculate();
        Ok(())
    }

    fn recalculate(&mut self) {
        let items: Money = self.items.iter().map(OrderItem::total).sum();
        self.final_price = (items + self.delivery_price - self.discount).max(Money::ZERO);
    }

    /// Created → Paid.
    pub fn mark_paid(&mut self) -> Result<(), OrderError> {
        if self.status != OrderStatus::Created {
            return Err(self.invalid_transition("pay"));
        }
        self.status = OrderStatus::Paid;
        Ok(())
    }

    /// Paid → Cooking.
    pub fn send_to_kitchen(&mut self) -> Result<(), OrderError> {
        if self.status != OrderStatus::Paid {
            return Err(self.invalid_transition("send to kitchen"));
        }
        self.status = OrderStatus::Cooking;
        Ok(())
    }

    /// Cooking → Ready.
    pub fn mark_ready(&mut self) -> Result<(), OrderError> {
        if self.status != OrderStatus::Cooking {
            return Err(self.invalid_transition("mark ready"));
        }
        self.status = OrderStatus::Ready;
        Ok(())
    }

    /// Ready → Delivering.
    pub fn ship_to_delivery(&mut self) -> Result<(), OrderError> {
        if self.status != OrderStatus::Ready {
            return Err(self.invalid_transition("ship to delivery"));
        }
        self.status = OrderStatus::Delivering;
        Ok(())
    }

    /// Delivering → Completed.
    pub fn complete_delivery(&mut self) -> Result<(), OrderError> {
        if self.status != OrderStatus::Delivering {
            return Err(self.invalid_transition("complete delivery"));
        }
        self.status = OrderStatus::Completed;
        Ok(())
    }

    /// Terminal. Legal only before the kitchen is involved.
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if !matches!(self.status, OrderStatus::Created | OrderStatus::Paid) {
            return Err(self.invalid_transition("cancel"));
        }
        self.status = OrderStatus::Canceled;
        Ok(())
    }

    fn invalid_transition(&self, action: &'static str) -> OrderError {
        OrderError::InvalidTransition {
            from: self.status,
            action,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn address(&self) -> &DeliveryAddress {
        &self.address
    }

    pub fn delivery_price(&self) -> Money {
        self.delivery_price
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    pub fn final_price(&self) -> Money {
        self.final_price
    }
}

/// Human-readable order number: `PG-YYYY.MM.DD-` plus the first four hex
/// digits of a fresh v7 uuid.
fn generate_order_number(created_at: DateTime<Utc>) -> String {
    let tag = Uuid::now_v7().to_string();
    format!("PG-{}-{}", created_at.format("%Y.%m.%d"), &tag[..4])
}

/// Persistence port for orders. A missing row is `Ok(None)`, not an error.
pub trait OrderRepository {
    fn save(&self, order: &Order) -> Result<(), StorageError>;
    fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StorageError>;
}
