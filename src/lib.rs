//! AudioWave API: wallet-keyed identity, track metadata and social
//! interactions behind a small REST surface.

pub mod config;
pub mod entities;
pub mod error;
pub mod http;
pub mod identity;
pub mod models;
pub mod service;
pub mod session;
pub mod state;
pub mod store;
