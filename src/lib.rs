//! Explorador de categorías documentales: construcción del árbol
//! Módulo → Categoría → Subcarpeta, recuento de documentos, filtrado y
//! consultas para el panel de documentos, servidos por HTTP.

pub mod aggregate;
pub mod api;
pub mod app_state;
pub mod config;
pub mod engine;
pub mod filter;
pub mod lookup;
pub mod models;
pub mod rights;
pub mod session;
pub mod snapshot;
pub mod tree;
