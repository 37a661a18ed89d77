//! HTTP handler families, one module per entity. Each module exports a
//! `router()` with its role gates already layered; `crate::app` nests them
//! under `/api/v1`.

pub mod announcement;
pub mod appointment;
pub mod auth;
pub mod employee;
pub mod feedback;
pub mod land;
pub mod land_file;
pub mod land_owner;
pub mod office;
pub mod report;
pub mod user;
