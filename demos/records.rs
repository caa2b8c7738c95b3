//! Controlling dictionary keys with field directives.
//!
//! Run with: cargo run --example records

use serde_tnetstring::{from_slice, record, to_vec, Record};
use std::error::Error;

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Session {
        #[tnet = "sid"]
        pub id: u64,
        pub user: String,
        #[tnet = "note,omitempty"]
        pub note: String,
        #[tnet = "-"]
        pub cache_hits: u32,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let tags = Session::field_tags();
    println!("Keys written for Session: {:?}\n", tags.names());

    let session = Session {
        id: 7,
        user: "alice".to_string(),
        note: String::new(),
        cache_hits: 12,
    };

    let wire = to_vec(&session)?;
    println!("Wire: {}", String::from_utf8_lossy(&wire));

    let back: Session = from_slice(&wire)?;
    println!("Decoded: {:?}", back);
    assert_eq!(back, Session { cache_hits: 0, ..session });

    match from_slice::<Session>(b"9:2:id,1:7#}") {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Rejected unknown key: {}", e),
    }

    Ok(())
}
