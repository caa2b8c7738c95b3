//! Working with Value when the shape is only known at runtime.
//!
//! Run with: cargo run --example dynamic_values

use serde::Serialize;
use serde_tnetstring::{from_slice, tnet, to_value, to_vec, Deserializer, Value};
use std::error::Error;

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = tnet!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging"],
        "debug": true
    });

    let wire = to_vec(&config)?;
    println!("Config on the wire:\n{}\n", String::from_utf8_lossy(&wire));

    let decoded: Value = from_slice(&wire)?;
    if let Some(host) = decoded.get("host").and_then(Value::as_str) {
        println!("host: {}", host);
    }
    if let Some(port) = decoded.get("port").and_then(Value::as_i64) {
        println!("port: {}", port);
    }
    if let Some(features) = decoded.get("features").and_then(Value::as_list) {
        println!("features: {} items\n", features.len());
    }

    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };
    let user_value = to_value(&user)?;
    println!("User as Value: {:?}", user_value);
    println!("  is_dict:   {}", user_value.is_dict());
    println!("  is_list:   {}", user_value.is_list());
    println!("  is_string: {}\n", user_value.is_string());

    // Frames are self-delimiting, so a byte stream can carry many values back to back.
    let mut stream = Vec::new();
    stream.extend(to_vec(&config)?);
    stream.extend(to_vec(&user)?);
    stream.extend(to_vec(&Value::Null)?);
    for value in Deserializer::from_reader(stream.as_slice()).into_iter::<Value>() {
        let value = value?;
        println!("frame: dict={} null={}", value.is_dict(), value.is_null());
    }

    Ok(())
}
