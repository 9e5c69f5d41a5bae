//! Pocketshop storefront widget.
//!
//! A product catalog with infinite scroll and pagination, plus a shopping cart
//! persisted to a local key-value store. The widget renders into a
//! [`surface::Surface`] and is driven by [`widget::Event`]s.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart_manager;
pub mod catalog;
pub mod catalog_loader;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod storage;
pub mod surface;
pub mod views;
pub mod widget;

#[cfg(test)]
mod test_support;
