//! Payment operations and the payment ↔ order saga.
//!
//! `confirm_payment` and `cancel_order` touch two aggregates. There is no
//! transaction across the two ports; when the second write fails the first
//! is compensated through the payment's refund transition, and a failed
//! compensation surfaces as [`FulfillmentError::PartialFailure`].

use plategrid_core::{CancelToken, Money, OrderId};
use plategrid_orders::{Order, OrderRepository};
use plategrid_treasury::{Payment, PaymentMethod, PaymentRepository, PaymentStatus};

use crate::error::{FulfillmentError, FulfillmentResult, ensure_active};

pub struct PaymentService<P, O> {
    payments: P,
    orders: O,
}

impl<P, O> PaymentService<P, O>
where
    P: PaymentRepository,
    O: OrderRepository,
{
    pub fn new(payments: P, orders: O) -> Self {
        Self { payments, orders }
    }

    /// Open a Waiting payment for an order. The amount is the order's
    /// current final price, never caller-supplied, and must be positive.
    pub fn initiate_payment(
        &self,
        cancel: &CancelToken,
        order_id: OrderId,
        method: PaymentMethod,
    ) -> FulfillmentResult<Payment> {
        ensure_active(cancel)?;

        let order = self.load_order(order_id)?;
        let amount = order.final_price();
        if amount <= Money::ZERO {
            return Err(FulfillmentError::validation(
                "payment amount must be positive",
            ));
        }

        let payment = Payment::create(order_id, amount, method);
        self.payments.save(&payment).map_err(|e| {
            FulfillmentError::storage(
                format!("failed to register payment attempt for order {order_id}"),
                e,
            )
        })?;

        tracing::info!(
            "initiated {} payment of {} for order {}",
            payment.method(),
            payment.amount(),
            order_id
        );
        Ok(payment)
    }

    /// Confirm the payment, then mark the order paid. An order-side
    /// failure after the payment write is compensated by refunding.
    pub fn confirm_payment(
        &self,
        cancel: &CancelToken,
        order_id: OrderId,
        transaction_id: String,
    ) -> FulfillmentResult<()> {
        ensure_active(cancel)?;
        if transaction_id.trim().is_empty() {
            return Err(FulfillmentError::validation("transaction ID is required"));
        }

        let mut payment = self.load_payment(order_id)?;
        payment.confirm(transaction_id)?;
        self.save_payment(&payment, "failed to persist payment confirmation")?;

        if let Err(cause) = self.mark_order_paid(order_id) {
            tracing::warn!(
                "order update failed after payment confirmation for order {}, refunding: {}",
                order_id,
                cause
            );
            return Err(self.compensate_with_refund("confirm_payment", payment, cause));
        }

        tracing::info!("payment for order {} confirmed", order_id);
        Ok(())
    }

    pub fn decline_payment(&self, cancel: &CancelToken, order_id: OrderId) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut payment = self.load_payment(order_id)?;
        payment.decline()?;
        self.save_payment(&payment, "failed to persist payment decline")?;

        tracing::info!("payment for order {} declined", order_id);
        Ok(())
    }

    /// Cancel the order; if its payment already went through, refund it.
    /// A refund that cannot be persisted after the order write surfaces as
    /// a partial failure.
    pub fn cancel_order(&self, cancel: &CancelToken, order_id: OrderId) -> FulfillmentResult<()> {
        ensure_active(cancel)?;

        let mut order = self.load_order(order_id)?;
        order.cancel()?;
        self.orders.save(&order).map_err(|e| {
            FulfillmentError::storage(format!("failed to save canceled order {order_id}"), e)
        })?;

        match self.payments.find_by_order_id(order_id) {
            Ok(Some(mut payment)) if payment.status() == PaymentStatus::Success => {
                if let Err(e) = payment.refund() {
                    return Err(FulfillmentError::partial_failure(
                        "cancel_order",
                        format!(
                            "order {order_id} canceled but its payment could not be refunded: {e}"
                        ),
                    ));
                }
                if let Err(e) = self.payments.save(&payment) {
                    return Err(FulfillmentError::partial_failure(
                        "cancel_order",
                        format!(
                            "order {order_id} canceled but refund of payment {} was not persisted: {e}",
                            payment.id()
                        ),
                    ));
                }
                tracing::warn!(
                    "order {} canceled, payment {} refunded",
                    order_id,
                    payment.id()
                );
            }
            Ok(_) => {
                tracing::info!("order {} canceled, no successful payment to refund", order_id);
            }
            Err(e) => {
                return Err(FulfillmentError::partial_failure(
                    "cancel_order",
                    format!("order {order_id} canceled but the payment lookup failed: {e}"),
                ));
            }
        }

        Ok(())
    }

    fn mark_order_paid(&self, order_id: OrderId) -> FulfillmentResult<()> {
        let mut order = self.load_order(order_id)?;
        order.mark_paid()?;
        self.orders.save(&order).map_err(|e| {
            FulfillmentError::storage(
                format!("failed to update order {order_id} status after payment"),
                e,
            )
        })
    }

    /// Roll a freshly confirmed payment back to Refund. Returns the error
    /// the caller should surface: the original cause when compensation
    /// lands, a partial failure when it does not.
    fn compensate_with_refund(
        &self,
        op: &'static str,
        mut payment: Payment,
        cause: FulfillmentError,
    ) -> FulfillmentError {
        if let Err(e) = payment.refund() {
            return FulfillmentError::partial_failure(
                op,
                format!(
                    "order update failed ({cause}) and payment {} could not be refunded: {e}",
                    payment.id()
                ),
            );
        }
        if let Err(e) = self.payments.save(&payment) {
            return FulfillmentError::partial_failure(
                op,
                format!(
                    "order update failed ({cause}) and refund of payment {} was not persisted: {e}",
                    payment.id()
                ),
            );
        }

        tracing::warn!("payment {} refunded after failed order update", payment.id());
        cause
    }

    fn load_order(&self, order_id: OrderId) -> FulfillmentResult<Order> {
        self.orders
            .find_by_id(order_id)
            .map_err(|e| FulfillmentError::storage(format!("failed to load order {order_id}"), e))?
            .ok_or_else(|| FulfillmentError::not_found("order", order_id))
    }

    fn load_payment(&self, order_id: OrderId) -> FulfillmentResult<Payment> {
        self.payments
            .find_by_order_id(order_id)
            .map_err(|e| {
                FulfillmentError::storage(
                    format!("failed to load payment record for order {order_id}"),
                    e,
                )
            })?
            .ok_or_else(|| FulfillmentError::not_found("payment for order", order_id))
    }

    fn save_payment(&self, payment: &Payment, op: &str) -> FulfillmentResult<()> {
        self.payments
            .save(payment)
            .map_err(|e| FulfillmentError::storage(format!("{op} {}", payment.id()), e))
    }
}
