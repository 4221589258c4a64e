pub mod branch_controller;
pub mod parcel_controller;
pub mod report_controller;
pub mod staff_controller;
