use std::collections::BTreeMap;
use std::io::BufRead;

use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFields {
    fields: BTreeMap<String, String>,
}

impl ControlFields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| anyhow!("missing required field '{key}'"))
    }
}

pub fn parse_control_block(content: &str) -> Result<ControlFields> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    let mut last_key: Option<String> = None;

    for (offset, line) in content.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if line.starts_with([' ', '\t']) {
            let key = last_key.as_ref().ok_or_else(|| {
                anyhow!(
                    "continuation line {} has no preceding field: '{}'",
                    offset + 1,
                    line.trim()
                )
            })?;
            let value = fields.entry(key.clone()).or_default();
            if value.is_empty() {
                value.push_str(line.trim());
            } else {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| anyhow!("malformed field line {}: '{line}'", offset + 1))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow!("empty field name on line {}: '{line}'", offset + 1));
        }
        fields.insert(key.to_string(), value.trim().to_string());
        last_key = Some(key.to_string());
    }

    Ok(ControlFields { fields })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBlock {
    pub first_line: usize,
    pub content: String,
}

pub struct RecordBlocks<R> {
    reader: R,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> RecordBlocks<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            finished: false,
        }
    }

    fn read_block(&mut self) -> Result<Option<RecordBlock>> {
        let mut block: Option<RecordBlock> = None;
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("failed reading line {}", self.line_number + 1))?;
            if read == 0 {
                self.finished = true;
                return Ok(block);
            }
            self.line_number += 1;

            if line.trim().is_empty() {
                if block.is_some() {
                    return Ok(block);
                }
                continue;
            }

            let block = block.get_or_insert_with(|| RecordBlock {
                first_line: self.line_number,
                content: String::new(),
            });
            block.content.push_str(line.trim_end_matches(['\r', '\n']));
            block.content.push('\n');
        }
    }
}

impl<R: BufRead> Iterator for RecordBlocks<R> {
    type Item = Result<RecordBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_block() {
            Ok(block) => block.map(Ok),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
