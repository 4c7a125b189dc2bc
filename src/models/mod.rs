// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod quote;
pub mod user;

pub use quote::{NewQuote, Quote};
pub use user::{AuthProvider, Preferences, PreferencesUpdate, User, UserProfile};
