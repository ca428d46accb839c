pub mod export_xlsx;

pub use export_xlsx::write_flat_table_xlsx;
