//! Payment allocation and reversal protocol.

pub mod service;
pub mod types;

pub use service::PaymentService;
pub use types::{NewPayment, Payment, PaymentAllocation, PaymentDirection};
