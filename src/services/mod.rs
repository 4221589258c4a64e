//! Servicios del sistema
//!
//! TransitionService es el único escritor del estado de un parcel;
//! ReportService solo lee; notification es el colaborador best-effort
//! que se dispara después de cada commit.

pub mod notification;
pub mod report_service;
pub mod transition_service;

pub use report_service::{ReportKind, ReportService};
pub use transition_service::TransitionService;
