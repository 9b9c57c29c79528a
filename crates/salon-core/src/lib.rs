//! # salon-core: Domain Types for the Salon Store
//!
//! Record shapes for customers, staff, services, appointments, tally items
//! and retail products, plus the inputs used to create and patch them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Salon Store Layers                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Application layer (out of tree)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ camelCase JSON / TS bindings           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salon-core (THIS CRATE) ★                       │   │
//! │  │   types: Customer, Employee, Service, Appointment, ...          │   │
//! │  │   input: NewCustomer, CustomerPatch, ...                        │   │
//! │  │   NO I/O • NO DATABASE                                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    salon-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Persisted records and their enums
//! - [`input`] - Create inputs and sparse update patches
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use salon_core::{Gender, NewCustomer};
//!
//! let input = NewCustomer {
//!     name: "Asha".to_string(),
//!     phone: "9990001111".to_string(),
//!     email: None,
//!     gender: Gender::Female,
//!     last_visit: None,
//!     preferred_services: vec!["svc-1".to_string()],
//!     notes: None,
//!     photo: None,
//! };
//!
//! let customer = input.into_customer("cust-example".to_string(), Utc::now());
//! assert_eq!(customer.visit_count, 0);
//! ```

pub mod input;
pub mod types;

pub use input::*;
pub use types::*;

/// Id prefix for generated customer ids.
pub const CUSTOMER_ID_PREFIX: &str = "cust";

/// Id prefix for generated employee ids.
pub const EMPLOYEE_ID_PREFIX: &str = "emp";

/// Id prefix for generated tally item ids.
pub const TALLY_ID_PREFIX: &str = "tally";
