//! Core types: managed repository definitions, the registry and report rows

pub mod entities;
pub mod value_objects;
