//! Integration tests for the value synthesis engine

mod config_integration;
mod container_generation;
mod executable_generation;
mod parameter_extraction;
mod registry_resolution;
mod targeted_generation;
