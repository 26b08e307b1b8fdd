//! Stop locator server.
//!
//! Answers: "Given where I am, which stops of this bus line are closest,
//! and where should my trip start?" Straight-line distances rank every
//! stop; a road-routing service refines the nearest few when it is
//! reachable.

pub mod config;
pub mod domain;
pub mod geo;
pub mod geocode;
pub mod lines;
pub mod position;
pub mod ranking;
pub mod routing;
pub mod web;
