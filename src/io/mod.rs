pub mod array_file;
pub mod fasta;
pub mod sequence;
