//! Request handlers

pub mod candidates;
