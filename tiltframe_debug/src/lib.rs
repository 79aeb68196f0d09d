// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, event recording, and JSON snapshots for tiltframe
//! diagnostics.
//!
//! This crate provides [`TraceSink`](tiltframe_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: keeps every event in memory as a
//!   [`recorder::RecordedEvent`].
//! - [`snapshot`]: writes the reference scene, the bound visual, and recorded
//!   events as JSON.

pub mod pretty;
pub mod recorder;
pub mod snapshot;
