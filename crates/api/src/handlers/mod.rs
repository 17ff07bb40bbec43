pub mod attendance;
pub mod people;
