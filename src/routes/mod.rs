pub mod auth_routes;
pub mod mechanic_routes;
pub mod report_routes;
pub mod wash_record_routes;
pub mod worker_routes;
