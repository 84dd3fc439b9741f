pub mod graph;
pub mod interaction;
pub mod routes;
