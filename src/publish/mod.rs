pub mod artifact_writer;
pub mod front_matter;
pub mod path_deriver;
pub mod publisher;
pub mod render_client;
