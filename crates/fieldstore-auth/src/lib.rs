//! Authentication subsystem: roles, user registration and login.

#![forbid(unsafe_code)]

pub mod handler;

mod prelude;

// vim: ts=4
