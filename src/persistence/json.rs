use super::Codec;
use crate::error::Result;
use crate::record::Attributes;

/// A JSON array of objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, rows: &[Attributes]) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(rows).map_err(|err| self.error(err))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Attributes>> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(bytes).map_err(|err| self.error(err))
    }
}
