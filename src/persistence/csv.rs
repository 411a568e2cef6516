use serde_json::Value;

use super::Codec;
use crate::error::Result;
use crate::record::Attributes;

/// One header row naming every field, then one row per record.
///
/// Cells hold strings verbatim and every other value as JSON text. A string
/// that would itself read back as JSON (`"15"`, `"true"`, `""`) is written
/// as a quoted JSON string instead. An empty cell means the record does not
/// hold that field. Rows that hold no fields at all are written under a
/// single unnamed column, one quoted empty cell per row.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvCodec;

impl CsvCodec {
    fn header(rows: &[Attributes]) -> Vec<String> {
        let mut header: Vec<String> = Vec::new();
        for row in rows {
            for field in row.keys() {
                if !header.iter().any(|known| known == field) {
                    header.push(field.clone());
                }
            }
        }
        header
    }

    fn encode_cell(value: &Value) -> String {
        match value {
            Value::String(text)
                if !text.is_empty() && serde_json::from_str::<Value>(text).is_err() =>
            {
                text.clone()
            }
            other => other.to_string(),
        }
    }

    fn decode_cell(cell: &str) -> Option<Value> {
        if cell.is_empty() {
            return None;
        }
        Some(serde_json::from_str(cell).unwrap_or_else(|_| Value::String(cell.to_string())))
    }
}

impl Codec for CsvCodec {
    fn format(&self) -> &'static str {
        "csv"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn encode(&self, rows: &[Attributes]) -> Result<Vec<u8>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut header = Self::header(rows);
        let mut builder = csv::WriterBuilder::new();
        if header.is_empty() {
            header.push(String::new());
            builder.quote_style(csv::QuoteStyle::Always);
        }

        let mut writer = builder.from_writer(Vec::new());
        writer.write_record(&header).map_err(|err| self.error(err))?;
        for row in rows {
            let cells = header.iter().map(|field| {
                row.get(field)
                    .map(Self::encode_cell)
                    .unwrap_or_default()
            });
            writer.write_record(cells).map_err(|err| self.error(err))?;
        }
        writer.into_inner().map_err(|err| self.error(err))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Attributes>> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);
        let header: Vec<String> = reader
            .headers()
            .map_err(|err| self.error(err))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| self.error(err))?;
            let mut row = Attributes::new();
            for (field, cell) in header.iter().zip(record.iter()) {
                if let Some(value) = Self::decode_cell(cell) {
                    row.insert(field.clone(), value);
                }
            }
            rows.push(row);
        }
        Ok(rows)
    }
}
