// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for per-conversation preferences.
//!
//! A single `users` table maps a chat id to its selected locale. All access
//! goes through `tokio-rusqlite`'s background thread.

pub mod adapter;
pub mod database;
pub mod queries;
pub mod schema;

pub use adapter::SqliteStorage;
pub use database::Database;
