//! Starter catalogue loaded into fresh tables.

use crate::domain::{Entity, EntityId, Product, ProductDraft, User, UserDraft};

const PRODUCTS: [(&str, f64); 5] = [
    ("Product A", 10.99),
    ("Product B", 15.49),
    ("Product C", 12.38),
    ("Product D", 60.00),
    ("Product E", 33.99),
];

const USERS: [(&str, &str); 5] = [
    ("Mario Rossi", "Mario@Mario.com"),
    ("Alessio Bianchi", "Alessio@Alessio.com"),
    ("Anna Viola", "Anna@Anna.com"),
    ("Alvaro Verdi", "Alvaro@Alvaro.com"),
    ("Pietro Rossi", "Pietro@Pietro.com"),
];

pub fn products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(|(name, price)| {
            Product::from_draft(EntityId::generate(), ProductDraft::new(*name, *price))
        })
        .collect()
}

pub fn users() -> Vec<User> {
    USERS
        .iter()
        .map(|(name, email)| {
            User::from_draft(EntityId::generate(), UserDraft::new(*name, *email))
        })
        .collect()
}
