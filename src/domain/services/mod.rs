pub mod broadcast;
pub mod change_detector;
pub mod match_lifecycle;
pub mod payloads;
pub mod standings;
