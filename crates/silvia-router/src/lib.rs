// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification for inbound SilvIA messages.
//!
//! This crate provides:
//! - [`classify`]: maps message text to exactly one [`Intent`]
//! - the individual predicates ([`is_name_query`], [`is_history_query`],
//!   [`alert_kind`], [`is_greeting`]) used by layered dispatch
//!
//! Classification is pure keyword and phrase matching over normalized text.
//! No network, no state.

pub mod classifier;

pub use classifier::{
    alert_kind, classify, is_greeting, is_history_query, is_name_query,
    normalize, AlertKind, Intent,
};
