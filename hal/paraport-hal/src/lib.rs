//! Paraport Hardware Abstraction Layer
//!
//! This crate defines the register access traits that every port backend
//! implements. Higher layers never call port instructions directly; they are
//! handed a [`PortIo`] at port initialization and pass it by reference to
//! everything that touches hardware.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  paraport-core (pins, direction, ports) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  paraport-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ ioperm + in/  │       │ vendor driver │
//! │ out (Linux)   │       │ (inpout-style)│
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`port::PortIo`] - Single byte register read/write
//! - [`delay::Delay`] - Microsecond delay that reports failure

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
#[cfg(feature = "mock")]
pub mod mock;
pub mod port;

// Re-export key traits at crate root for convenience
pub use delay::Delay;
#[cfg(feature = "mock")]
pub use mock::MockPortIo;
pub use port::PortIo;
