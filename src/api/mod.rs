pub mod attendance;
pub mod leave;
pub mod trainer;
