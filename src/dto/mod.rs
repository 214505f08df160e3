//! DTOs de la API: requests, queries y sobres de respuesta

pub mod api_response;
pub mod auth_dto;
pub mod mechanic_dto;
pub mod stats_dto;
pub mod wash_record_dto;
pub mod worker_dto;
