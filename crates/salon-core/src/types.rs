//! # Domain Types
//!
//! Record shapes persisted by the salon store.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │    Employee     │   │    Service      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (cust-…)    │   │  id (emp-…)     │   │  id (supplied)  │       │
//! │  │  phone (unique) │   │  specialties[]  │   │  duration, price│       │
//! │  │  preferred[]    │   │  working_hours  │   │                 │       │
//! │  └────────▲────────┘   └────────▲────────┘   └─────────────────┘       │
//! │           │ FK                  │ FK                                    │
//! │  ┌────────┴─────────────────────┴──┐   ┌─────────────────┐             │
//! │  │          Appointment             │   │   TallyItem     │             │
//! │  │  customer_id, employee_id        │   │  (snapshot, no  │             │
//! │  │  service_ids[] (not enforced)    │   │   foreign keys) │             │
//! │  └──────────────────────────────────┘   └─────────────────┘             │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    Product      │  retail stock, standalone                          │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fields marked `[]` are lists. They travel as JSON arrays on the wire and
//! are stored as JSON text in a single column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Enumerations
// =============================================================================

/// Customer gender, constrained by a CHECK in the `customers` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Lifecycle of an appointment.
///
/// Transitions are not policed; any status may be written at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

/// How a tally item was (or will be) paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Unified Payments Interface transfer.
    Upi,
}

/// Payment outcome of a tally item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl Gender {
    /// Column value as stored in SQLite.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl AppointmentStatus {
    /// Column value as stored in SQLite.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl PaymentMethod {
    /// Column value as stored in SQLite.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
        }
    }
}

impl PaymentStatus {
    /// Column value as stored in SQLite.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(Gender, AppointmentStatus, PaymentMethod, PaymentStatus);

// =============================================================================
// Customer
// =============================================================================

/// A salon customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// `cust-<uuid>` for customers created through the repository.
    pub id: String,

    pub name: String,

    /// Unique across all customers (enforced by the store).
    pub phone: String,

    pub email: Option<String>,

    pub gender: Gender,

    /// Number of completed visits.
    #[serde(default)]
    pub visit_count: i64,

    /// Lifetime spend.
    #[serde(default)]
    pub total_spent: f64,

    /// Date of the most recent visit, as written by the application.
    pub last_visit: Option<String>,

    /// Ordered list of service ids the customer usually books.
    #[serde(default)]
    pub preferred_services: Vec<String>,

    pub notes: Option<String>,

    /// Photo URL or data URI.
    pub photo: Option<String>,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Employee
// =============================================================================

/// Daily working window in `HH:MM` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

impl Default for WorkingHours {
    /// 09:00 to 18:00.
    fn default() -> Self {
        WorkingHours {
            start: "09:00".to_string(),
            end: "18:00".to_string(),
        }
    }
}

/// A staff member who performs services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// `emp-<uuid>` for employees created through the repository.
    pub id: String,
    pub name: String,
    pub role: String,

    /// Not part of seed documents; empty when unknown.
    #[serde(default)]
    pub email: String,

    /// Not part of seed documents; empty when unknown.
    #[serde(default)]
    pub phone: String,

    pub photo: Option<String>,

    /// Stored as INTEGER 0/1.
    #[serde(default = "default_available")]
    pub available: bool,

    #[serde(default)]
    pub specialties: Vec<String>,

    /// 0 to 5. Not bounded by the store.
    #[serde(default = "default_rating")]
    pub rating: f64,

    pub next_available: Option<String>,

    #[serde(default)]
    pub working_hours: WorkingHours,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Rating given to new employees.
pub const DEFAULT_EMPLOYEE_RATING: f64 = 5.0;

pub(crate) fn default_rating() -> f64 {
    DEFAULT_EMPLOYEE_RATING
}

pub(crate) fn default_available() -> bool {
    true
}

// =============================================================================
// Service
// =============================================================================

/// A bookable salon service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Minutes.
    pub duration: i64,
    pub price: f64,
    pub category: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Appointment
// =============================================================================

/// A booking of one or more services for a customer with an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,

    /// References `customers.id` (enforced).
    pub customer_id: String,

    /// References `employees.id` (enforced).
    pub employee_id: String,

    /// Service ids in booking order. Not checked against `services`.
    pub service_ids: Vec<String>,

    /// `YYYY-MM-DD`.
    pub date: String,

    /// `HH:MM`.
    pub time: String,

    pub status: AppointmentStatus,
    pub total: f64,
    pub notes: Option<String>,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Tally Item
// =============================================================================

/// One service line on a tally item, frozen at the time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TallyService {
    pub name: String,
    pub price: f64,
}

/// A point-of-sale record.
///
/// Uses the snapshot pattern: customer and staff are copied in as plain
/// strings, so later edits or deletions elsewhere do not affect history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TallyItem {
    /// `tally-<uuid>`.
    pub id: String,
    pub date: String,
    pub time: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub staff_name: String,
    pub services: Vec<TallyService>,
    pub total_cost: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,

    /// Stamped when the item is created.
    #[ts(as = "Option<String>")]
    pub payment_date: Option<DateTime<Utc>>,

    /// Set once a UPI payment is confirmed.
    pub upi_transaction_id: Option<String>,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl TallyItem {
    /// Sum of the service line prices.
    ///
    /// Independent of `total_cost`, which is whatever the caller recorded.
    pub fn services_total(&self) -> f64 {
        self.services.iter().map(|s| s.price).sum()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A retail product sold at the counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
    pub category: String,
    #[serde(default)]
    pub stock: i64,
    pub description: Option<String>,
    pub brand: Option<String>,
    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
