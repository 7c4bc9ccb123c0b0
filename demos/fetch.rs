//! Runs a single GET round trip and dumps the exchange.
//!
//! ```text
//! RUST_LOG=debug cargo run --example fetch -- https://example.com/ [--body] [--json]
//! ```
//!
//! With `--json` the body is decoded into a `serde_json::Value` and printed, otherwise the body is
//! left on the response and shows up in the dump when `--body` is given.
use std::io::stdout;

use anyhow::{bail, Result};
use trip::Command;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut url = None;
    let mut dump_body = false;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--body" => dump_body = true,
            "--json" => json = true,
            _ if url.is_none() => url = Some(arg),
            _ => bail!("unexpected argument: {arg}"),
        }
    }
    let Some(url) = url else {
        bail!("usage: fetch <url> [--body] [--json]");
    };

    let mut cmd = Command::get(&url)?;
    let mut model = serde_json::Value::Null;
    let result = if json {
        cmd.output(&mut model).await
    } else {
        cmd.run().await
    };

    cmd.dump(&mut stdout(), dump_body);

    match result {
        Ok(status) => {
            println!("status: {status}");
            if json {
                println!("{}", serde_json::to_string_pretty(&model)?);
            }
        }
        Err(e) => println!("status: {} error: {}", e.status_code(), e),
    }
    Ok(())
}
