//! Payment-provider boundary.
//!
//! The gateway is opaque to the core: it creates orders and verifies
//! signatures, nothing more. A provider value is constructed once at
//! startup from `AppConfig` and injected by reference; booking state is
//! only touched after the provider answers, so a gateway outage can never
//! corrupt a booking.

use crate::{
    entities::{
        Booking, booking,
        booking::{PAYMENT_FAILED, PAYMENT_PAID, PAYMENT_PENDING},
    },
    errors::{Error, Result},
};
use sea_orm::{ActiveValue::Set, ConnectionTrait, prelude::*};
use tracing::{info, warn};

/// An order created at the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOrder {
    /// Gateway-issued order id
    pub order_id: String,
    /// Amount in minor currency units
    pub amount_minor: i64,
    /// ISO currency code
    pub currency: String,
}

/// The opaque payment gateway.
pub trait PaymentProvider: Send + Sync {
    /// Creates an order for the given amount in minor units.
    fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> impl std::future::Future<Output = Result<ProviderOrder>> + Send;

    /// Verifies a payment signature against an order.
    fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}

/// Creates a gateway order for a booking and marks payment pending.
///
/// The booking total is converted to minor units (x100) the way the
/// gateway expects.
pub async fn create_order_for_booking<C, P>(
    db: &C,
    provider: &P,
    booking_id: i64,
    currency: &str,
) -> Result<ProviderOrder>
where
    C: ConnectionTrait,
    P: PaymentProvider,
{
    let current = Booking::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "booking", id: booking_id })?;

    #[allow(clippy::cast_possible_truncation)]
    let amount_minor = (current.total_amount * 100.0).round() as i64;
    let order = provider.create_order(amount_minor, currency).await?;

    let mut pending: booking::ActiveModel = current.into();
    pending.payment_status = Set(Some(PAYMENT_PENDING.to_string()));
    pending.update(db).await?;

    info!(booking_id, order_id = %order.order_id, "created payment order");
    Ok(order)
}

/// Verifies a gateway callback and settles the booking's payment status.
///
/// A verified signature marks the booking paid; a rejected one marks it
/// failed and surfaces [`Error::PaymentVerificationFailed`].
pub async fn confirm_payment<C, P>(
    db: &C,
    provider: &P,
    booking_id: i64,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<booking::Model>
where
    C: ConnectionTrait,
    P: PaymentProvider,
{
    let current = Booking::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "booking", id: booking_id })?;

    let verified = provider.verify_signature(order_id, payment_id, signature).await?;

    let mut settle: booking::ActiveModel = current.into();
    if verified {
        settle.payment_status = Set(Some(PAYMENT_PAID.to_string()));
        let paid = settle.update(db).await?;
        info!(booking_id, "payment verified");
        Ok(paid)
    } else {
        settle.payment_status = Set(Some(PAYMENT_FAILED.to_string()));
        settle.update(db).await?;
        warn!(booking_id, "payment signature rejected");
        Err(Error::PaymentVerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::booking::place;
    use crate::test_utils::{setup_test_db, staged_cart};

    /// Gateway double: accepts orders and verifies one known signature.
    struct MockProvider {
        accept_signature: &'static str,
    }

    impl PaymentProvider for MockProvider {
        async fn create_order(&self, amount_minor: i64, currency: &str) -> Result<ProviderOrder> {
            Ok(ProviderOrder {
                order_id: format!("order_{amount_minor}"),
                amount_minor,
                currency: currency.to_string(),
            })
        }

        async fn verify_signature(
            &self,
            _order_id: &str,
            _payment_id: &str,
            signature: &str,
        ) -> Result<bool> {
            Ok(signature == self.accept_signature)
        }
    }

    /// Gateway double that is down.
    struct FailingProvider;

    impl PaymentProvider for FailingProvider {
        async fn create_order(&self, _amount: i64, _currency: &str) -> Result<ProviderOrder> {
            Err(Error::PaymentProvider("gateway unreachable".to_string()))
        }

        async fn verify_signature(&self, _o: &str, _p: &str, _s: &str) -> Result<bool> {
            Err(Error::PaymentProvider("gateway unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_order_converts_to_minor_units() -> Result<()> {
        let db = setup_test_db().await?;
        let (event, _slot) = staged_cart(&db, 1, 2).await?;
        let placed = place(&db, 1).await?;

        let provider = MockProvider { accept_signature: "good" };
        let order =
            create_order_for_booking(&db, &provider, placed.booking.id, "INR").await?;

        #[allow(clippy::cast_possible_truncation)]
        let expected = (event.price * 2.0 * 100.0).round() as i64;
        assert_eq!(order.amount_minor, expected);

        let refreshed = Booking::find_by_id(placed.booking.id).one(&db).await?.unwrap();
        assert_eq!(refreshed.payment_status.as_deref(), Some(PAYMENT_PENDING));

        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_payment_settles_status() -> Result<()> {
        let db = setup_test_db().await?;
        let (_event, _slot) = staged_cart(&db, 1, 1).await?;
        let placed = place(&db, 1).await?;
        let provider = MockProvider { accept_signature: "good" };

        let paid =
            confirm_payment(&db, &provider, placed.booking.id, "o1", "p1", "good").await?;
        assert_eq!(paid.payment_status.as_deref(), Some(PAYMENT_PAID));

        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_payment_rejects_bad_signature() -> Result<()> {
        let db = setup_test_db().await?;
        let (_event, _slot) = staged_cart(&db, 1, 1).await?;
        let placed = place(&db, 1).await?;
        let provider = MockProvider { accept_signature: "good" };

        assert!(matches!(
            confirm_payment(&db, &provider, placed.booking.id, "o1", "p1", "forged").await,
            Err(Error::PaymentVerificationFailed)
        ));

        let refreshed = Booking::find_by_id(placed.booking.id).one(&db).await?.unwrap();
        assert_eq!(refreshed.payment_status.as_deref(), Some(PAYMENT_FAILED));

        Ok(())
    }

    #[tokio::test]
    async fn test_provider_outage_leaves_booking_untouched() -> Result<()> {
        let db = setup_test_db().await?;
        let (_event, _slot) = staged_cart(&db, 1, 1).await?;
        let placed = place(&db, 1).await?;

        assert!(matches!(
            create_order_for_booking(&db, &FailingProvider, placed.booking.id, "INR").await,
            Err(Error::PaymentProvider(_))
        ));

        let refreshed = Booking::find_by_id(placed.booking.id).one(&db).await?.unwrap();
        assert_eq!(refreshed.payment_status, None);
        assert_eq!(refreshed.status, crate::entities::booking::STATUS_CONFIRMED);

        Ok(())
    }
}
