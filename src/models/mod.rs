//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod branch;
pub mod parcel;
pub mod staff;

pub use branch::Branch;
pub use parcel::{Parcel, ParcelStatus, ParcelWithBranches, StatusHistoryEntry};
pub use staff::{Staff, StaffWithBranch};
