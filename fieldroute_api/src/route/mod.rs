pub mod optimize;
pub mod planner;
