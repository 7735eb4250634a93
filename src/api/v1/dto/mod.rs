pub mod echo;
pub mod me;
