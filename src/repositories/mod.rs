pub mod mechanic_repository;
pub mod wash_record_repository;
pub mod worker_repository;

pub use mechanic_repository::MechanicRepository;
pub use wash_record_repository::WashRecordRepository;
pub use worker_repository::WorkerRepository;
