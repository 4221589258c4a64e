pub mod branch_routes;
pub mod parcel_routes;
pub mod report_routes;
pub mod staff_routes;
