//! Formsmith - form designer core: field model, document mutations, and
//! component-tree import

pub mod commands;
pub mod config;
pub mod convert;
pub mod errors;
pub mod ids;
pub mod models;
pub mod mutator;
pub mod session;
pub mod templates;
pub mod validation;
