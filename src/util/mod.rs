pub mod alphabet;
pub mod pos;
