//! Shared customer fixtures.

use chrono::{Duration, Utc};
use jia_protocol::Customer;

/// Minimal customer with the given id and name.
pub fn customer(id: i64, name: &str) -> Customer {
    Customer {
        id,
        name: name.to_string(),
        company: None,
        gst_number: None,
        pan_number: None,
        address: None,
        email_address: None,
        phone_number: None,
        created_at: Utc::now() - Duration::days(90),
    }
}

/// Five well-known customers with distinct GSTs and cities.
pub fn sample_customers() -> Vec<Customer> {
    let rows = [
        (1, "Acme Corporation", "27AADCA0425P1Z7", "Mumbai", 120),
        (2, "Stark Industries", "29AABCS1234P1Z5", "Bangalore", 80),
        (3, "Wayne Enterprises", "06AABCW5896P1Z3", "Delhi", 45),
        (4, "Globex Corporation", "33AARCG7485P1Z6", "Chennai", 20),
        (5, "Initech Inc", "19AADCI2541P1Z4", "Hyderabad", 3),
    ];
    rows.iter()
        .map(|(id, name, gst, city, age_days)| Customer {
            id: *id,
            name: (*name).to_string(),
            company: Some((*name).to_string()),
            gst_number: Some((*gst).to_string()),
            pan_number: None,
            address: Some((*city).to_string()),
            email_address: Some(format!(
                "contact@{}.example",
                name.split_whitespace().next().unwrap_or("x").to_lowercase()
            )),
            phone_number: Some(format!("98765432{id:02}")),
            created_at: Utc::now() - Duration::days(*age_days),
        })
        .collect()
}
