//! Street Simulation Library
//!
//! A city-street micro-simulation (traffic signal, vehicles, pedestrians and
//! a day/night cycle) that runs headless and hands a snapshot to a renderer.

pub mod simulation;
