pub mod catalog_writer;
pub mod command_reader;
