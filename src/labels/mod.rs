pub mod label_table;

pub use label_table::LabelTable;
