// Sources module: catalog clients and the helpers they share

pub mod artifact;
pub mod hash;
pub mod http;
pub mod modrinth;
pub mod paper;
pub mod search;
pub mod version_matcher;
