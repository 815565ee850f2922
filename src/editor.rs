use std::path::Path;

use indexmap::IndexMap;

use crate::error::{EditError, Result};
use crate::parser::{label_pairs, rewrite_label_line, structure, Instruction};
use crate::store::{FileStore, LineStore};

const LABEL: &str = "LABEL";

/// Editor over a Dockerfile held in a [`LineStore`]. Every operation
/// re-reads the lines and re-derives the instruction structure, so line
/// spans are always fresh; nothing is cached here. Each mutation is one
/// read-compute-write round trip: the full replacement line sequence is
/// written, or nothing is.
pub struct Dockerfile<S: LineStore = FileStore> {
    store: S,
}

impl Dockerfile<FileStore> {
    /// Open the Dockerfile at `path` (a file, or a directory containing one).
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::from_store(FileStore::new(path))
    }

    /// Like [`open`](Self::open), but the file content is cached in memory
    /// between operations.
    pub fn open_cached(path: impl AsRef<Path>) -> Self {
        Self::from_store(FileStore::with_cache(path))
    }

    /// Full file content as one string.
    pub fn content(&mut self) -> Result<String> {
        self.store.content()
    }

    /// Overwrite the file with `content`.
    pub fn set_content(&mut self, content: &str) -> Result<()> {
        self.store.set_content(content)
    }
}

impl<S: LineStore> Dockerfile<S> {
    pub fn from_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn lines(&mut self) -> Result<Vec<String>> {
        self.store.read_lines()
    }

    pub fn set_lines(&mut self, lines: &[String]) -> Result<()> {
        self.store.write_lines(lines)
    }

    /// Current instruction list, re-derived from the stored lines.
    pub fn structure(&mut self) -> Result<Vec<Instruction>> {
        Ok(structure(&self.store.read_lines()?))
    }

    /// JSON projection `[{"NAME": "value"}, ...]` in file order.
    pub fn json(&mut self) -> Result<String> {
        let mut projection = Vec::new();
        for insn in self.structure()? {
            let mut entry = serde_json::Map::new();
            entry.insert(insn.name, serde_json::Value::String(insn.value));
            projection.push(serde_json::Value::Object(entry));
        }
        Ok(serde_json::to_string(&projection)?)
    }

    /// Value of the last matching instruction. Last wins, which is the one
    /// that takes effect for instructions like CMD.
    pub fn get_value(&mut self, name: &str) -> Result<Option<String>> {
        let name = name.to_uppercase();
        Ok(self
            .structure()?
            .into_iter()
            .filter(|insn| insn.name == name)
            .last()
            .map(|insn| insn.value))
    }

    /// Value of the first matching instruction (FROM conventionally has one
    /// definitive occurrence near the top).
    pub fn get_first_value(&mut self, name: &str) -> Result<Option<String>> {
        let name = name.to_uppercase();
        Ok(self
            .structure()?
            .into_iter()
            .find(|insn| insn.name == name)
            .map(|insn| insn.value))
    }

    /// Base image, i.e. the value of the first FROM instruction.
    pub fn baseimage(&mut self) -> Result<Option<String>> {
        self.get_first_value("FROM")
    }

    pub fn set_baseimage(&mut self, image: &str) -> Result<()> {
        self.replace_value("FROM", image, None)
    }

    /// Value of the last CMD instruction.
    pub fn cmd(&mut self) -> Result<Option<String>> {
        self.get_value("CMD")
    }

    pub fn set_cmd(&mut self, value: &str) -> Result<()> {
        self.replace_value("CMD", value, None)
    }

    /// Replace every matching instruction's whole line span with the single
    /// line `NAME new_value`, collapsing continuations. With `old_value`,
    /// only instructions whose current value equals it are touched.
    ///
    /// LABEL is rejected up front; its pairs need key-aware merging, see
    /// [`set_label`](Self::set_label) and [`set_labels`](Self::set_labels).
    pub fn replace_value(
        &mut self,
        name: &str,
        new_value: &str,
        old_value: Option<&str>,
    ) -> Result<()> {
        let name = name.to_uppercase();
        if name == LABEL {
            return Err(EditError::LabelReplaceUnsupported);
        }

        let count = {
            let lines = self.store.read_lines()?;
            structure(&lines).iter().filter(|i| i.name == name).count()
        };

        // Each splice shifts every later line number, so the structure is
        // re-derived before every edit. Selecting the k-th same-name
        // instruction keeps the walk stable: a rewritten instruction stays
        // at its ordinal and is never picked up again.
        for ordinal in 0..count {
            let mut lines = self.store.read_lines()?;
            let insns = structure(&lines);
            let Some(insn) = insns.iter().filter(|i| i.name == name).nth(ordinal) else {
                continue;
            };
            if let Some(old) = old_value {
                if insn.value != old {
                    continue;
                }
            }
            let new_line = format!("{} {}\n", name, new_value);
            lines.splice(insn.start_line..=insn.end_line, [new_line]);
            self.store.write_lines(&lines)?;
        }
        Ok(())
    }

    /// Delete every matching instruction's line span, optionally filtered by
    /// exact value. No write happens when nothing matched.
    pub fn delete_instructions(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let name = name.to_uppercase();
        let mut lines = self.store.read_lines()?;
        let insns = structure(&lines);

        let mut deleted = false;
        // Reverse order keeps earlier spans valid while later ones go.
        for insn in insns.iter().rev() {
            if insn.name != name {
                continue;
            }
            if let Some(filter) = value {
                if insn.value != filter {
                    continue;
                }
            }
            lines.drain(insn.start_line..=insn.end_line);
            deleted = true;
        }

        if deleted {
            self.store.write_lines(&lines)?;
        }
        Ok(())
    }

    /// Append `NAME value` as a new line at end of file.
    pub fn append_instruction(&mut self, name: &str, value: &str) -> Result<()> {
        let name = name.to_uppercase();
        let mut lines = self.store.read_lines()?;
        lines.push(format!("{} {}\n", name, value));
        self.store.write_lines(&lines)
    }

    /// Append one label as `LABEL "key"="value"`.
    pub fn append_label(&mut self, key: &str, value: &str) -> Result<()> {
        let mut lines = self.store.read_lines()?;
        lines.push(format!("{} \"{}\"=\"{}\"\n", LABEL, key, value));
        self.store.write_lines(&lines)
    }

    /// Labels from all LABEL instructions, in file order. Later instructions
    /// overwrite earlier keys with the same name.
    pub fn labels(&mut self) -> Result<IndexMap<String, String>> {
        let mut labels = IndexMap::new();
        for insn in self.structure()? {
            if insn.name != LABEL {
                continue;
            }
            for (key, value) in label_pairs(&insn.value) {
                labels.insert(key, value);
            }
        }
        Ok(labels)
    }

    /// Bulk label replace: deletes all existing LABEL instructions, then
    /// appends one quoted key=value line per entry. Destructive — labels
    /// absent from `labels` are gone afterwards.
    pub fn set_labels(&mut self, labels: &IndexMap<String, String>) -> Result<()> {
        self.delete_instructions(LABEL, None)?;
        for (key, value) in labels {
            self.append_label(key, value)?;
        }
        Ok(())
    }

    /// Update a single existing label in place, preserving the other pairs
    /// on the same instruction. Only the first LABEL instruction defining
    /// `key` is rewritten, even when duplicates exist. Fails with
    /// [`EditError::LabelNotFound`] when the key does not exist; this
    /// operation never creates labels.
    pub fn set_label(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.labels()?.contains_key(key) {
            return Err(EditError::LabelNotFound(key.to_string()));
        }

        let mut lines = self.store.read_lines()?;
        let insns = structure(&lines);
        for insn in insns.iter().filter(|i| i.name == LABEL) {
            if let Some(new_line) = rewrite_label_line(&insn.value, key, value)? {
                lines.splice(insn.start_line..=insn.end_line, [new_line]);
                self.store.write_lines(&lines)?;
                return Ok(());
            }
        }

        // The label map saw the key but the rewrite scan did not find it;
        // abort instead of writing anything.
        Err(EditError::LabelScanMismatch(key.to_string()))
    }

    /// Update several existing labels; each key must already be present.
    pub fn change_labels(&mut self, labels: &IndexMap<String, String>) -> Result<()> {
        for (key, value) in labels {
            self.set_label(key, value)?;
        }
        Ok(())
    }
}
