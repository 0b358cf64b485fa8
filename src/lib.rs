//! Lead Score Redirect API Library
//!
//! Reads a contact's quality score from the CRM, classifies it into a tier
//! and answers with the matching redirect URL. Two diagnostic endpoints
//! expose the full decision and the raw custom fields.
//!
//! # Modules
//!
//! - `api`: Router and CORS setup.
//! - `config`: Configuration management.
//! - `crm_client`: CRM contact lookup client.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: CRM and response data models.
//! - `scoring`: Quality score extraction and tier classification.

pub mod api;
pub mod config;
pub mod crm_client;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod scoring;
