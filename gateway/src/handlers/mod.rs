//! HTTP handlers, one per endpoint

pub mod combos;
pub mod envios;
pub mod root;
