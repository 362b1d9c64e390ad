//! SCIPI CMS - content management backend for the society's website
//!
//! Public REST API for the marketing site plus an authenticated admin API
//! for content management.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
