//! DTOs de la API
//!
//! Requests y responses que cruzan el borde HTTP.

pub mod api_response;
pub mod batch_dto;
pub mod report_dto;
pub mod vehicle_dto;
