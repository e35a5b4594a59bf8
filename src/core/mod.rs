// src/core/mod.rs — Session model and conversation control

pub mod assistant;
pub mod controller;
pub mod history;
pub mod itinerary;
pub mod session;
pub mod types;
