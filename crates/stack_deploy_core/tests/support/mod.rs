pub mod cloud;
pub mod workspace;
