//! Get, set and delete commands.

use std::time::Duration;

use serde_json::Value;

use common::AppResult;

use super::{open_handle, Context};
use crate::cli::{KeyArgs, SetArgs};

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Execute the get command
pub async fn get(args: KeyArgs, ctx: Context) -> AppResult<()> {
    let handle = open_handle(&ctx).await?;
    match handle.get::<Value>(&args.key)? {
        Some(value) => println!("{}", value),
        None => println!("(nil)"),
    }
    handle.close();
    Ok(())
}

/// Execute the set command
pub async fn set(args: SetArgs, ctx: Context) -> AppResult<()> {
    let handle = open_handle(&ctx).await?;
    let value = parse_value(&args.value);

    match args.ttl {
        Some(secs) => handle.set_with_ttl(&args.key, &value, Duration::from_secs(secs))?,
        None => handle.set(&args.key, &value)?,
    }
    if handle.is_placeholder() {
        tracing::warn!(key = %args.key, "Cache disabled, value was not stored");
    }
    println!("OK");
    handle.close();
    Ok(())
}

/// Execute the del command
pub async fn delete(args: KeyArgs, ctx: Context) -> AppResult<()> {
    let handle = open_handle(&ctx).await?;
    let removed = handle.delete(&args.key)?;
    println!("{}", u8::from(removed));
    handle.close();
    Ok(())
}
