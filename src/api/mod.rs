pub mod attendance;
pub mod pages;
