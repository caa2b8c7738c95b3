//! Basic tnetstring serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_tnetstring::{from_slice, to_vec};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
        },
    ];

    let wire = to_vec(&users)?;
    println!("Wire ({} bytes):\n{}\n", wire.len(), String::from_utf8_lossy(&wire));

    let users_back: Vec<User> = from_slice(&wire)?;
    assert_eq!(users, users_back);
    println!("Round-trip successful");

    Ok(())
}
