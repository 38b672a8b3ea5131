//! Built-in sample data.
//!
//! These keys are always available to templates. Callers shadow any of them
//! by supplying a custom value under the same key.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::variables::CustomData;

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Carlos", "Maria", "James", "Laura", "Michael", "Carmen", "Anthony", "Isabel", "Frank",
];

const LAST_NAMES: &[&str] = &[
    "Garcia", "Rodriguez", "Smith", "Fernandez", "Lopez", "Martin", "Johnson", "Perez", "Brown",
    "Walker",
];

const COMPANIES: &[&str] = &[
    "TechCorp",
    "InnovaSoft",
    "DataPro",
    "CloudTech",
    "DevStudio",
    "WebFlow",
    "AppLab",
    "CodeWorks",
    "DigitalHub",
    "NetSolutions",
];

const PRODUCTS: &[&str] = &[
    "Smartphone Pro",
    "Laptop Ultra",
    "Tablet Max",
    "Monitor 4K",
    "Headphones Pro",
    "Digital Camera",
    "Smartwatch",
    "RGB Keyboard",
    "Gaming Mouse",
    "Bluetooth Speaker",
];

const CITIES: &[&str] = &[
    "Madrid", "Barcelona", "Valencia", "Seville", "Zaragoza", "Malaga", "Murcia", "Palma",
    "Bilbao", "Alicante",
];

fn pick(options: &[&str]) -> String {
    options
        .choose(&mut rand::thread_rng())
        .map(|value| value.to_string())
        .unwrap_or_default()
}

fn between(low: u32, high: u32) -> u32 {
    rand::thread_rng().gen_range(low..=high)
}

fn random_code(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect()
}

fn random_date() -> Result<String, String> {
    let year = between(2024, 2025) as i32;
    let date = NaiveDate::from_ymd_opt(year, between(1, 12), between(1, 28))
        .ok_or_else(|| "generated an invalid calendar date".to_string())?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Builds the built-in default data table.
pub fn builtin() -> Arc<CustomData> {
    let data = CustomData::new()
        // Names
        .with_generator("first_name", || Ok(pick(FIRST_NAMES)))
        .with_generator("last_name", || Ok(pick(LAST_NAMES)))
        .with_generator("full_name", || {
            Ok(format!("{} {}", pick(FIRST_NAMES), pick(LAST_NAMES)))
        })
        .with_generator("display_name", || {
            let last = pick(LAST_NAMES);
            let initial = last.chars().next().unwrap_or('X');
            Ok(format!("{} {}.", pick(FIRST_NAMES), initial))
        })
        .with_generator("username", || {
            Ok(format!(
                "{}{}",
                pick(FIRST_NAMES).to_lowercase(),
                between(10, 99)
            ))
        })
        .with_generator("email", || {
            Ok(format!(
                "{}.{}@email.com",
                pick(FIRST_NAMES).to_lowercase(),
                pick(LAST_NAMES).to_lowercase()
            ))
        })
        // Company
        .with_generator("company", || Ok(pick(COMPANIES)))
        .with_generator("company_name", || Ok(pick(COMPANIES)))
        .with_choices(
            "department",
            ["Sales", "Marketing", "IT", "HR", "Finance"],
        )
        .with_choices(
            "position",
            ["Manager", "Analyst", "Coordinator", "Specialist", "Director"],
        )
        // Dates and time
        .with_generator("date", random_date)
        .with_generator("year", || Ok(between(2024, 2025).to_string()))
        .with_choices(
            "month",
            ["January", "February", "March", "April", "May", "June"],
        )
        .with_generator("day", || Ok(between(1, 31).to_string()))
        .with_generator("time", || {
            Ok(format!("{}:{:02}", between(9, 18), between(0, 59)))
        })
        // Numbers
        .with_generator("age", || Ok(between(18, 65).to_string()))
        .with_generator("price", || {
            Ok(format!("{:.2}", rand::thread_rng().gen_range(1.0..1000.0)))
        })
        .with_generator("quantity", || Ok(between(1, 10).to_string()))
        .with_generator("total", || {
            let unit: f64 = rand::thread_rng().gen_range(0.0..999.0);
            Ok(format!("{:.2}", unit * f64::from(between(1, 5))))
        })
        .with_generator("discount", || Ok(between(5, 25).to_string()))
        .with_choices("tax", ["21", "10", "4"])
        // Products
        .with_generator("product", || Ok(pick(PRODUCTS)))
        .with_generator("product_name", || Ok(pick(PRODUCTS)))
        .with_choices(
            "category",
            ["Electronics", "Clothing", "Home", "Sports", "Books"],
        )
        .with_choices("brand", ["Apple", "Samsung", "Sony", "Nike", "Adidas"])
        .with_generator("model", || Ok(format!("Pro-{}", between(2020, 2025))))
        // Contact
        .with_generator("phone", || {
            Ok(format!(
                "+34 {} {} {}",
                between(600, 699),
                between(100, 999),
                between(100, 999)
            ))
        })
        .with_generator("address", || {
            Ok(format!(
                "{} Street {}",
                pick(&["Main", "High", "Central", "King"]),
                between(1, 200)
            ))
        })
        .with_generator("city", || Ok(pick(CITIES)))
        .with_literal("country", "Spain")
        .with_generator("postal_code", || {
            Ok(format!("{}{}", between(10, 50), between(100, 999)))
        })
        // IDs
        .with_generator("order_id", || Ok(format!("ORD-{}", between(1000, 9999))))
        .with_generator("invoice_id", || Ok(format!("INV-{}", between(1000, 9999))))
        .with_generator("customer_id", || Ok(format!("CUST-{}", between(100, 999))))
        .with_generator("transaction_id", || Ok(format!("TXN-{}", random_code(6))))
        // Status
        .with_choices(
            "status",
            ["Active", "Pending", "Completed", "In Progress"],
        )
        .with_choices("priority", ["High", "Medium", "Low"])
        .with_choices("type", ["Premium", "Standard", "Basic"])
        .with_generator("version", || {
            Ok(format!(
                "{}.{}.{}",
                between(1, 3),
                between(0, 9),
                between(0, 9)
            ))
        })
        .with_generator("code", || Ok(random_code(6)))
        .with_generator("reference", || Ok(format!("REF-{}", between(1000, 9999))));

    Arc::new(data)
}
