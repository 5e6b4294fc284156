use std::io::Read;

use crate::dop::io_common::{open_file, read_rows};
use crate::dop::*;

pub fn read_house_csv<R: Read>(reader: R, path: &str) -> ConvertResult<Vec<HouseTally>> {
    read_rows(reader, path, parse_house_row)
}

pub fn read_house_file(path: &str) -> ConvertResult<Vec<HouseTally>> {
    info!("Attempting to read House file {:?}", path);
    read_house_csv(open_file(path)?, path)
}
