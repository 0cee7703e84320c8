//! Reads a CON text document, prints it back and converts it to binary.
//!
//! Run with: cargo run --example round_trip -- input.json [output.con]
//!
//! Set `RUST_LOG=confile=trace` to see per-node compression events.

use confile::{decode_binary, encode_binary, parse_text, print_text_with_options, ConOptions};
use std::error::Error;
use std::{env, fs};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = r#"{
    "name": "demo",
    "tags": ["binary", "text", "zlib"],
    "payload": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
    "ratio": 0.75,
    "count": 3
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let text = match args.first() {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };

    let value = parse_text(&text)?;
    println!("{}", print_text_with_options(&value, &ConOptions::pretty()));

    let options = ConOptions::default();
    let bytes = encode_binary(&value, &options)?;
    println!(
        "\ntext: {} bytes, binary: {} bytes",
        text.len(),
        bytes.len()
    );

    assert_eq!(decode_binary(&bytes)?, value);
    println!("✓ Binary round-trip successful");

    if let Some(path) = args.get(1) {
        fs::write(path, &bytes)?;
        println!("Wrote {}", path);
    }

    Ok(())
}
