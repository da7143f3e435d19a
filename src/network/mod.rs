mod collect;
mod graph;
mod load;
mod parse;

pub use collect::build_network_file;
pub use graph::Network;
pub use load::load_network;
#[cfg(test)]
pub use load::parse_network;
