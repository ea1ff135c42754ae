//! visionlab-service: upload an image, label it, describe the reactions between its labels.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;
