// Copyright 2024-2026 runtime-gate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Structured logging for the runtime gate.

mod logging;

pub use logging::{init_logging, LogConfig, LogError, LogFormat, DEFAULT_FILTER};
