//! Order lifecycle status.
//!
//! The backend is the sole authority over transitions; the client uses this
//! state machine to gate which requests it offers (admin actions, payment
//! reference re-submission) and to interpret the status strings on the wire.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Wire names are the backend's Spanish status strings. The happy path is
/// `Pending → PaymentReview → Shipped → Delivered`; a payment under review
/// may instead be `Rejected`, after which the customer can submit a new
/// payment reference (back to `PaymentReview`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order created, awaiting a payment reference.
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    /// A payment reference was submitted and is under manual review.
    #[serde(rename = "Pago Revisión")]
    PaymentReview,
    /// The payment was rejected; a new reference may be submitted.
    #[serde(rename = "Pago Rechazado")]
    Rejected,
    /// Payment accepted, order handed to delivery.
    #[serde(rename = "Enviado")]
    Shipped,
    /// Order received by the customer. Terminal.
    #[serde(rename = "Entregado")]
    Delivered,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::PaymentReview,
        Self::Rejected,
        Self::Shipped,
        Self::Delivered,
    ];

    /// The backend's wire name for this status.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::PaymentReview => "Pago Revisión",
            Self::Rejected => "Pago Rechazado",
            Self::Shipped => "Enviado",
            Self::Delivered => "Entregado",
        }
    }

    /// Whether the customer may (re-)submit a payment reference.
    ///
    /// Matches the storefront's retry rules: a pending order needs its
    /// first reference, an order under review may correct it, and a
    /// rejected payment may be retried with a new reference.
    #[must_use]
    pub const fn accepts_payment_reference(self) -> bool {
        matches!(self, Self::Pending | Self::PaymentReview | Self::Rejected)
    }

    /// Whether a transition from `self` to `next` may be requested.
    ///
    /// Admin actions: ship or reject an order under review, deliver a
    /// shipped order. Submitting a payment reference moves any
    /// reference-accepting status to `PaymentReview`. The backend still
    /// has the final say; this only gates what the client offers.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending | Self::Rejected, Self::PaymentReview)
                | (Self::PaymentReview, Self::PaymentReview | Self::Rejected | Self::Shipped)
                | (Self::Shipped, Self::Delivered)
        )
    }

    /// Statuses reachable from `self` through an admin action.
    #[must_use]
    pub fn admin_actions(self) -> &'static [Self] {
        match self {
            Self::PaymentReview => &[Self::Shipped, Self::Rejected],
            Self::Shipped => &[Self::Delivered],
            Self::Pending | Self::Rejected | Self::Delivered => &[],
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendiente" => Ok(Self::Pending),
            "Pago Revisión" => Ok(Self::PaymentReview),
            "Pago Rechazado" => Ok(Self::Rejected),
            "Enviado" => Ok(Self::Shipped),
            "Entregado" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            let back: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);

            let parsed: OrderStatus = status.wire_name().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn deserializes_backend_strings() {
        let status: OrderStatus = serde_json::from_str("\"Pago Revisión\"").unwrap();
        assert_eq!(status, OrderStatus::PaymentReview);

        let status: OrderStatus = serde_json::from_str("\"Pago Rechazado\"").unwrap();
        assert_eq!(status, OrderStatus::Rejected);
    }

    #[test]
    fn unknown_status_is_an_error() {
        assert!(serde_json::from_str::<OrderStatus>("\"Cancelado\"").is_err());
        assert!("Cancelado".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn payment_reference_gating() {
        assert!(OrderStatus::Pending.accepts_payment_reference());
        assert!(OrderStatus::PaymentReview.accepts_payment_reference());
        assert!(OrderStatus::Rejected.accepts_payment_reference());
        assert!(!OrderStatus::Shipped.accepts_payment_reference());
        assert!(!OrderStatus::Delivered.accepts_payment_reference());
    }

    #[test]
    fn transition_matrix() {
        use OrderStatus::{Delivered, PaymentReview, Pending, Rejected, Shipped};

        // Reference submission
        assert!(Pending.can_transition_to(PaymentReview));
        assert!(Rejected.can_transition_to(PaymentReview));
        // Admin review outcomes
        assert!(PaymentReview.can_transition_to(Shipped));
        assert!(PaymentReview.can_transition_to(Rejected));
        assert!(Shipped.can_transition_to(Delivered));

        // Nothing skips review, nothing leaves Delivered
        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Rejected.can_transition_to(Shipped));
        for status in OrderStatus::ALL {
            assert!(!Delivered.can_transition_to(status));
        }
    }

    #[test]
    fn admin_actions_follow_the_lifecycle() {
        assert_eq!(
            OrderStatus::PaymentReview.admin_actions(),
            &[OrderStatus::Shipped, OrderStatus::Rejected]
        );
        assert_eq!(OrderStatus::Shipped.admin_actions(), &[OrderStatus::Delivered]);
        assert!(OrderStatus::Delivered.admin_actions().is_empty());
    }
}
