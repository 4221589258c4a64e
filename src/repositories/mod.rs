pub mod branch_repository;
pub mod history_repository;
pub mod parcel_repository;
pub mod staff_repository;

pub use branch_repository::BranchRepository;
pub use history_repository::HistoryRepository;
pub use parcel_repository::ParcelRepository;
pub use staff_repository::StaffRepository;
