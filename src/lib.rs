//! Open Space - session planning for open space events
//!
//! This crate schedules the topics of an open space session into
//! (time slot, room) cells, seating the most demanded topics first and
//! repairing presenters booked into two rooms at once.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
