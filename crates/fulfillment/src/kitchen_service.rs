//! Kitchen operations and the ticket ↔ order saga.
//!
//! Write order matters in `accept_order`: the ticket lands first because a
//! Queued ticket with no cooking order behind it is harmless, while a
//! Cooking order with no ticket would strand the kitchen. No delete
//! operation exists for tickets, so an order-side failure after the ticket
//! write cannot be compensated and surfaces as a partial failure.

use plategrid_core::{CancelToken, OrderId, TicketId};
use plategrid_kitchen::{KitchenItem, KitchenTicket, TicketRepository};
use plategrid_orders::{Order, OrderRepository};

use crate::error::{FulfillmentError, FulfillmentResult, ensure_active};

pub struct KitchenService<T, O> {
    tickets: T,
    orders: O,
}

impl<T, O> KitchenService<T, O>
where
    T: TicketRepository,
    O: OrderRepository,
{
    pub fn new(tickets: T, orders: O) -> Self {
        Self { tickets, orders }
    }

    /// Queue a kitchen ticket for a paid order and move the order to
    /// Cooking. Topping names become the ingredient list.
    pub fn accept_order(
        &self,
        cancel: &CancelToken,
        order_id: OrderId,
    ) -> FulfillmentResult<KitchenTicket> {
        ensure_active(cancel)?;

        let mut order = self.load_order(order_id)?;
        if order.items().is_empty() {
            return Err(FulfillmentError::validation("ticket must contain items"));
        }
        order.send_to_kitchen()?;

        let items: Vec<KitchenItem> = order
            .items()
            .iter()
            .map(|line| KitchenItem {
                product_id: line.product_id(),
                name: line.product_name().to_string(),
                ingredients: line.toppings().iter().map(|t| t.name.clone()).collect(),
                quantity: line.quantity(),
                comment: String::new(),
            })
            .collect();

        let ticket = KitchenTicket::create(order_id, items);
        self.tickets.save(&ticket).map_err(|e| {
            FulfillmentError::storage(
                format!("failed to create kitchen ticket for order {order_id}"),
                e,
            )
        })?;

        if let Err(e) = self.orders.save(&order) {
            return Err(FulfillmentError::partial_failure(
                "accept_order",
                format!(
                    "kitchen ticket {} queued but order {order_id} was not moved to cooking: {e}",
                    ticket.id()
                ),
            ));
        }

        tracing::info!(
            "order {} accepted by the kitchen as ticket {}",
            order_id,
            ticket.id()
        );
        Ok(ticket)
    }

    pub fn start_cooking(&self, cancel: &CancelToken, ticket_id: TicketId) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut ticket = self.load_ticket(ticket_id)?;
        ticket.start_cooking()?;
        self.tickets.save(&ticket).map_err(|e| {
            FulfillmentError::storage(format!("failed to update ticket {ticket_id} to cooking"), e)
        })?;

        tracing::info!("ticket {} started cooking", ticket_id);
        Ok(())
    }

    /// Mark the ticket ready, then mirror the transition on the order.
    /// The order-side write has no compensating transition on the ticket,
    /// so its failure surfaces as a partial failure.
    pub fn mark_ready(&self, cancel: &CancelToken, ticket_id: TicketId) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut ticket = self.load_ticket(ticket_id)?;
        ticket.mark_ready()?;
        self.tickets.save(&ticket).map_err(|e| {
            FulfillmentError::storage(format!("failed to update ticket {ticket_id} to ready"), e)
        })?;

        if let Err(e) = self.mark_order_ready(ticket.order_id()) {
            return Err(FulfillmentError::partial_failure(
                "mark_ready",
                format!(
                    "ticket {ticket_id} is ready but order {} was not updated: {e}",
                    ticket.order_id()
                ),
            ));
        }

        tracing::info!(
            "ticket {} ready after cooking for {}s",
            ticket_id,
            ticket.cooking_duration().num_seconds()
        );
        Ok(())
    }

    /// The kitchen queue: every ticket not yet ready.
    pub fn pending_tickets(&self, cancel: &CancelToken) -> FulfillmentResult<Vec<KitchenTicket>> {
        ensure_active(cancel)?;
        self.tickets
            .find_pending()
            .map_err(|e| FulfillmentError::storage("failed to list pending tickets", e))
    }

    fn mark_order_ready(&self, order_id: OrderId) -> FulfillmentResult<()> {
        let mut order = self.load_order(order_id)?;
        order.mark_ready()?;
        self.orders.save(&order).map_err(|e| {
            FulfillmentError::storage(format!("failed to update order {order_id} to ready"), e)
        })
    }

    fn load_order(&self, order_id: OrderId) -> FulfillmentResult<Order> {
        self.orders
            .find_by_id(order_id)
            .map_err(|e| FulfillmentError::storage(format!("failed to load order {order_id}"), e))?
            .ok_or_else(|| FulfillmentError::not_found("order", order_id))
    }

    fn load_ticket(&self, ticket_id: TicketId) -> FulfillmentResult<KitchenTicket> {
        self.tickets
            .find_by_id(ticket_id)
            .map_err(|e| {
                FulfillmentError::storage(format!("failed to load kitchen ticket {ticket_id}"), e)
            })?
            .ok_or_else(|| FulfillmentError::not_found("kitchen ticket", ticket_id))
    }
}
