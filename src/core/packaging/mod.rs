// Core packaging module - builds the browser extension zip.

pub mod package_models;
pub mod package_service;

pub use package_models::*;
pub use package_service::*;
