// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! Configures a suitable default [`tracing`] implementation.
//!
//! This uses a compact log format specialised for GUI applications and a
//! default filter that can be overwritten using `RUST_LOG`: all
//! [`DEBUG`](tracing::Level::DEBUG) messages in debug mode, all
//! [`INFO`](tracing::Level::INFO) messages in release mode.
//!
//! If a `tracing` backend is already configured, this will not overwrite it.

use std::error::Error;

use time::macros::format_description;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Initializes the global tracing subscriber.
///
/// Returns an error if a subscriber is already installed or `RUST_LOG` could
/// not be parsed.
pub fn try_init_tracing() -> Result<(), Box<dyn Error>> {
    let env_filter_builder = EnvFilter::builder()
        .with_default_directive(default_level().into())
        .with_env_var("RUST_LOG");
    let parse_err = env_filter_builder
        .from_env()
        .err()
        .map(|err| format!("failed to parse RUST_LOG environment variable: {err:#}"));
    let env_filter = env_filter_builder.from_env_lossy();

    // More concise than even the 'Compact' default: GUI apps run for short
    // periods, so the time without the date and with millisecond precision
    // is enough, and the target is almost always visual noise.
    let timer = UtcTime::new(format_description!(
        "[hour repr:24]:[minute]:[second].[subsecond digits:3]Z"
    ));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_timer(timer)
        .with_target(false)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).try_init()?;

    if let Some(err) = parse_err {
        return Err(err.into());
    }
    Ok(())
}

/// Initializes tracing for tests, ignoring the already-installed case so
/// every test can call it.
pub fn try_init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_filter(LevelFilter::TRACE),
        )
        .try_init();
}
