//! Application layer orchestrating a single checkout.
//!
//! `PaymentController` is the entry point: it provisions the checkout SDK via
//! the script loader, opens a gateway session and hands the terminal event to
//! the `EnrollmentReconciler`, which records the enrollment and payment together.

pub mod controller;
pub mod loader;
pub mod reconciler;
