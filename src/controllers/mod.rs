pub mod auth_controller;
pub mod customer_controller;
pub mod mechanic_controller;
pub mod report_controller;
pub mod wash_record_controller;
pub mod worker_controller;
pub mod worker_stats_controller;
