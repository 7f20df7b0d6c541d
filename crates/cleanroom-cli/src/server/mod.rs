//! HTTP service: upload, clean, edit and download datasets by session.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
