//! Live departure board server.
//!
//! Finds stations by fuzzy name search and keeps one station's departure
//! board fresh, polling the schedule provider on a fixed period.

pub mod config;
pub mod display;
pub mod domain;
pub mod scheduler;
pub mod search;
pub mod source;
pub mod web;

#[cfg(test)]
mod test_support;
