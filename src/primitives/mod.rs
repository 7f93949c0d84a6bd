//! Page Primitives - Behavior attached to rendered page blocks.
//!
//! This module provides the building blocks the page is composed of:
//! - [`animated_section`], [`animated_card`], [`feature_card`] - Reveal on scroll
//! - [`tilt_card`], [`magnetic_button`] - Pointer-follow effects
//! - [`navbar`] - Navigation links fed by the scroll spy
//! - [`sparkles`] - Deterministic decorative particles
//!
//! # Architecture
//!
//! Every block exists on the host before its primitive runs (the markup put
//! it there). A primitive:
//! 1. Tags the element with its base class
//! 2. Attaches the controller for its behavior
//! 3. Returns a handle whose unmount detaches the controller
//!
//! Sparkles and floating gradients have no runtime behavior; they only
//! contribute markup.

mod animated;
mod navbar;
mod pointer;
pub mod sparkles;
mod types;

pub use animated::{animated_card, animated_section, feature_card};
pub use navbar::{nav_label, nav_links, navbar, navbar_class, NavLink, Navbar, NAV_CTA_HREF, NAV_CTA_LABEL};
pub use pointer::{magnetic_button, tilt_card};
pub use sparkles::{generate, generate_all, generate_all_with, generate_with, ParticleSpec, SparkleParams};
pub use types::*;
