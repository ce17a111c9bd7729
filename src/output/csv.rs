//! RFC 4180 style cell quoting on top of `csv_core`

use csv_core::{ReadFieldResult, Reader, WriteResult, Writer};

const BUFFER_SIZE: usize = 4096;

/// Quote a cell if it contains a quote, comma, CR or LF
pub fn csv_escape(value: &str) -> String {
    let mut writer = Writer::new();
    let mut input = value.as_bytes();
    let mut output = [0; BUFFER_SIZE];
    let mut cell = Vec::with_capacity(value.len() + 2);

    loop {
        let (result, nin, nout) = writer.field(input, &mut output);
        cell.extend_from_slice(&output[..nout]);
        input = &input[nin..];
        if result == WriteResult::InputEmpty {
            break;
        }
    }
    let (_, nout) = writer.finish(&mut output);
    cell.extend_from_slice(&output[..nout]);

    String::from_utf8_lossy(&cell).into_owned()
}

/// Read one cell back, undoing [`csv_escape`]
///
/// Only the first field is returned if `cell` holds several.
pub fn csv_unescape(cell: &str) -> String {
    let mut reader = Reader::new();
    let mut input = cell.as_bytes();
    let mut output = [0; BUFFER_SIZE];
    let mut field = Vec::with_capacity(cell.len());

    // An empty input slice tells the reader the data has ended.
    loop {
        let (result, nin, nout) = reader.read_field(input, &mut output);
        field.extend_from_slice(&output[..nout]);
        input = &input[nin..];
        match result {
            ReadFieldResult::InputEmpty | ReadFieldResult::OutputFull => {}
            ReadFieldResult::Field { .. } | ReadFieldResult::End => break,
        }
    }

    String::from_utf8_lossy(&field).into_owned()
}
