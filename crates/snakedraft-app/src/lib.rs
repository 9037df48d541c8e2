// Application layer for the snake draft tracker: configuration, the
// recommendation seam and the stdin/stdout transport.

pub mod config;
pub mod recommender;
pub mod transport;
