//! Fixtures shared by the repository tests.

use std::time::Duration;

use crate::pool::{Database, DbConfig};
use salon_core::{
    Gender, NewCustomer, NewEmployee, NewProduct, NewService, NewTallyItem, PaymentMethod,
    PaymentStatus, TallyService,
};

/// Fresh, isolated in-memory store with the schema applied.
pub(crate) async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Lets the clock move so a later `updated_at` compares greater.
pub(crate) async fn tick() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

pub(crate) fn new_customer(name: &str, phone: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        phone: phone.to_string(),
        email: None,
        gender: Gender::Female,
        last_visit: None,
        preferred_services: Vec::new(),
        notes: None,
        photo: None,
    }
}

pub(crate) fn new_employee(name: &str, role: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        role: role.to_string(),
        email: String::new(),
        phone: String::new(),
        photo: None,
        available: true,
        specialties: Vec::new(),
        rating: None,
        next_available: None,
        working_hours: None,
    }
}

pub(crate) fn new_service(id: &str, name: &str, price: f64) -> NewService {
    NewService {
        id: id.to_string(),
        name: name.to_string(),
        duration: 30,
        price,
        category: "Hair".to_string(),
        description: None,
    }
}

pub(crate) fn new_product(id: &str, name: &str, price: f64) -> NewProduct {
    NewProduct {
        id: id.to_string(),
        name: name.to_string(),
        price,
        image: None,
        category: "Hair Care".to_string(),
        stock: 10,
        description: None,
        brand: None,
    }
}

pub(crate) fn new_tally_item(date: &str, time: &str, method: PaymentMethod) -> NewTallyItem {
    NewTallyItem {
        date: date.to_string(),
        time: time.to_string(),
        customer_name: "Asha".to_string(),
        customer_phone: "9990001111".to_string(),
        staff_name: "Ravi".to_string(),
        services: vec![TallyService {
            name: "Haircut".to_string(),
            price: 300.0,
        }],
        total_cost: 300.0,
        payment_method: method,
        payment_status: PaymentStatus::Pending,
    }
}
