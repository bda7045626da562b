//! Filedrop library
//!
//! A minimal local-filesystem upload store: payloads go in, stable
//! relative keys and derived public URLs come out.

pub mod config;
pub mod error;
pub mod services;
pub mod storage;
