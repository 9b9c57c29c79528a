//! # Create Inputs and Partial Updates
//!
//! What callers hand to the repositories.
//!
//! ## Inputs vs Records
//! ```text
//! NewCustomer ──into_customer(id, now)──► Customer  (defaults filled in)
//! CustomerPatch ─────────────────────────► UPDATE … SET <only Some fields>
//! ```
//!
//! Customers, employees and tally items get their ids from the repository.
//! Services, appointments and products carry a caller-supplied `id`.
//!
//! Every patch field is an `Option`. `None` means "leave the column alone";
//! `Some(v)` means "write v". An all-`None` patch only refreshes `updated_at`.
//!
//! Fields over nullable columns are `Option<Option<T>>` so a patch can clear
//! them:
//!
//! ```text
//! {}                 → None          column untouched
//! {"notes": null}    → Some(None)    notes = NULL
//! {"notes": "VIP"}   → Some(Some(_)) notes = 'VIP'
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::types::{
    default_available, default_rating, Appointment, AppointmentStatus, Customer, Employee,
    Gender, PaymentMethod, PaymentStatus, Product, Service, TallyItem, TallyService,
    WorkingHours,
};

// =============================================================================
// Customer
// =============================================================================

/// Input for creating a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub gender: Gender,
    #[serde(default)]
    pub last_visit: Option<String>,
    #[serde(default)]
    pub preferred_services: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl NewCustomer {
    /// Materializes the record. New customers start with no visits and no spend.
    pub fn into_customer(self, id: String, now: DateTime<Utc>) -> Customer {
        Customer {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            gender: self.gender,
            visit_count: 0,
            total_spent: 0.0,
            last_visit: self.last_visit,
            preferred_services: self.preferred_services,
            notes: self.notes,
            photo: self.photo,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sparse update for a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    pub gender: Option<Gender>,
    pub visit_count: Option<i64>,
    pub total_spent: Option<f64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<Option<String>>,
    pub preferred_services: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub photo: Option<Option<String>>,
}

// =============================================================================
// Employee
// =============================================================================

/// Input for creating an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub specialties: Vec<String>,
    /// Defaults to 5.0 when omitted.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub next_available: Option<String>,
    /// Defaults to 09:00 to 18:00 when omitted.
    #[serde(default)]
    pub working_hours: Option<WorkingHours>,
}

impl NewEmployee {
    pub fn into_employee(self, id: String, now: DateTime<Utc>) -> Employee {
        Employee {
            id,
            name: self.name,
            role: self.role,
            email: self.email,
            phone: self.phone,
            photo: self.photo,
            available: self.available,
            specialties: self.specialties,
            rating: self.rating.unwrap_or_else(default_rating),
            next_available: self.next_available,
            working_hours: self.working_hours.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sparse update for an employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub photo: Option<Option<String>>,
    pub available: Option<bool>,
    pub specialties: Option<Vec<String>>,
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub next_available: Option<Option<String>>,
    /// Replaces both ends of the window.
    pub working_hours: Option<WorkingHours>,
}

// =============================================================================
// Service
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub id: String,
    pub name: String,
    pub duration: i64,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewService {
    pub fn into_service(self, now: DateTime<Utc>) -> Service {
        Service {
            id: self.id,
            name: self.name,
            duration: self.duration,
            price: self.price,
            category: self.category,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    pub name: Option<String>,
    pub duration: Option<i64>,
    pub price: Option<f64>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

// =============================================================================
// Appointment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub id: String,
    pub customer_id: String,
    pub employee_id: String,
    pub service_ids: Vec<String>,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    pub total: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn into_appointment(self, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id: self.id,
            customer_id: self.customer_id,
            employee_id: self.employee_id,
            service_ids: self.service_ids,
            date: self.date,
            time: self.time,
            status: self.status,
            total: self.total,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    pub customer_id: Option<String>,
    pub employee_id: Option<String>,
    pub service_ids: Option<Vec<String>>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub total: Option<f64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

// =============================================================================
// Tally Item
// =============================================================================

/// Input for recording a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewTallyItem {
    pub date: String,
    pub time: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub staff_name: String,
    pub services: Vec<TallyService>,
    pub total_cost: f64,
    pub payment_method: PaymentMethod,
    /// Stored exactly as given; pending when omitted.
    #[serde(default)]
    pub payment_status: PaymentStatus,
}

impl NewTallyItem {
    /// Materializes the record with `payment_date` stamped to `now` and no
    /// UPI transaction id.
    pub fn into_tally_item(self, id: String, now: DateTime<Utc>) -> TallyItem {
        TallyItem {
            id,
            date: self.date,
            time: self.time,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            staff_name: self.staff_name,
            services: self.services,
            total_cost: self.total_cost,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            payment_date: Some(now),
            upi_transaction_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TallyPatch {
    pub date: Option<String>,
    pub time: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub staff_name: Option<String>,
    pub services: Option<Vec<TallyService>>,
    pub total_cost: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub upi_transaction_id: Option<Option<String>>,
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl NewProduct {
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            image: self.image,
            category: self.category,
            stock: self.stock,
            description: self.description,
            brand: self.brand,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub brand: Option<Option<String>>,
}

/// Maps a present field to `Some`, so an explicit `null` becomes `Some(None)`.
/// Absent fields never reach this and fall back to `#[serde(default)]`.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_EMPLOYEE_RATING;

    #[test]
    fn test_new_customer_starts_without_visits() {
        let now = Utc::now();
        let input: NewCustomer = serde_json::from_str(
            r#"{"name":"Asha","phone":"9990001111","gender":"female","preferredServices":["svc-1"]}"#,
        )
        .unwrap();

        let customer = input.into_customer("cust-1".to_string(), now);

        assert_eq!(customer.visit_count, 0);
        assert_eq!(customer.total_spent, 0.0);
        assert_eq!(customer.preferred_services, vec!["svc-1"]);
        assert_eq!(customer.created_at, now);
        assert_eq!(customer.updated_at, now);
    }

    #[test]
    fn test_new_employee_defaults() {
        let input: NewEmployee =
            serde_json::from_str(r#"{"name":"Ravi","role":"Barber"}"#).unwrap();

        let employee = input.into_employee("emp-1".to_string(), Utc::now());

        assert_eq!(employee.rating, DEFAULT_EMPLOYEE_RATING);
        assert_eq!(employee.working_hours.start, "09:00");
        assert_eq!(employee.working_hours.end, "18:00");
        assert!(employee.available);
        assert!(employee.specialties.is_empty());
        assert_eq!(employee.email, "");
    }

    #[test]
    fn test_new_employee_keeps_explicit_values() {
        let input = NewEmployee {
            name: "Meera".to_string(),
            role: "Colorist".to_string(),
            email: "meera@example.com".to_string(),
            phone: "9000000000".to_string(),
            photo: None,
            available: false,
            specialties: vec!["Color".to_string()],
            rating: Some(4.2),
            next_available: Some("14:00".to_string()),
            working_hours: Some(WorkingHours {
                start: "11:00".to_string(),
                end: "20:00".to_string(),
            }),
        };

        let employee = input.into_employee("emp-2".to_string(), Utc::now());

        assert_eq!(employee.rating, 4.2);
        assert!(!employee.available);
        assert_eq!(employee.working_hours.start, "11:00");
    }

    #[test]
    fn test_new_tally_item_stamps_payment_date() {
        let now = Utc::now();
        let input = NewTallyItem {
            date: "2024-03-01".to_string(),
            time: "10:30".to_string(),
            customer_name: "Asha".to_string(),
            customer_phone: "9990001111".to_string(),
            staff_name: "Priya".to_string(),
            services: vec![],
            total_cost: 0.0,
            payment_method: PaymentMethod::Upi,
            payment_status: PaymentStatus::Completed,
        };

        let item = input.into_tally_item("tally-1".to_string(), now);

        assert_eq!(item.payment_date, Some(now));
        assert_eq!(item.payment_status, PaymentStatus::Completed);
        assert!(item.upi_transaction_id.is_none());
    }

    #[test]
    fn test_patch_fields_default_to_absent() {
        let patch: CustomerPatch = serde_json::from_str(r#"{"notes":"VIP"}"#).unwrap();

        assert_eq!(
            patch,
            CustomerPatch {
                notes: Some(Some("VIP".to_string())),
                ..Default::default()
            }
        );
        assert!(patch.email.is_none());
    }

    #[test]
    fn test_explicit_null_is_distinct_from_absent() {
        let patch: CustomerPatch =
            serde_json::from_str(r#"{"notes":null,"email":null,"name":"Asha"}"#).unwrap();

        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.email, Some(None));
        assert_eq!(patch.photo, None);
        assert_eq!(patch.name.as_deref(), Some("Asha"));

        let patch: ProductPatch = serde_json::from_str(r#"{"brand":null}"#).unwrap();
        assert_eq!(patch.brand, Some(None));
        assert_eq!(patch.image, None);
    }

    #[test]
    fn test_absent_patch_fields_are_not_serialized() {
        let patch = TallyPatch {
            upi_transaction_id: Some(None),
            ..Default::default()
        };

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["upiTransactionId"], serde_json::Value::Null);
        assert!(json.get("upiTransactionId").is_some());

        let json = serde_json::to_value(TallyPatch::default()).unwrap();
        assert!(json.get("upiTransactionId").is_none());
    }
}
