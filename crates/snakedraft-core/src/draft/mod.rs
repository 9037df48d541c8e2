pub mod pick;
pub mod position;
pub mod snake;
pub mod state;
pub mod teams;
