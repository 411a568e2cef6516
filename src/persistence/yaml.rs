use super::Codec;
use crate::error::Result;
use crate::record::Attributes;

/// A YAML sequence of mappings.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn format(&self) -> &'static str {
        "yaml"
    }

    fn extension(&self) -> &'static str {
        "yml"
    }

    fn encode(&self, rows: &[Attributes]) -> Result<Vec<u8>> {
        serde_yaml::to_string(rows)
            .map(String::into_bytes)
            .map_err(|err| self.error(err))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Attributes>> {
        let text = std::str::from_utf8(bytes).map_err(|err| self.error(err))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let rows: Option<Vec<Attributes>> = serde_yaml::from_str(text).map_err(|err| self.error(err))?;
        Ok(rows.unwrap_or_default())
    }
}
