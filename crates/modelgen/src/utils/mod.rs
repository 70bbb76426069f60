pub mod input_file;
