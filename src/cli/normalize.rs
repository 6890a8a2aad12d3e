use std::path::Path;

use crate::cli::{emit, render};
use crate::error::Result;
use crate::loader::load_table;
use crate::normalizer::{normalize, to_raw};

pub fn run(file: &str, format: Option<&str>, output: Option<&str>) -> Result<()> {
    let table = load_table(Path::new(file), format)?;
    let transactions = normalize(&table)?;
    let csv = render::table_csv(&to_raw(&transactions))?;
    emit(csv.trim_end(), output)
}
