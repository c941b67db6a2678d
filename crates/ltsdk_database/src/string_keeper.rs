//! # String Keeper
//!
//! Localized string table keyed by numeric id, with an optional voice-over
//! path per string. All integers are little-endian.
//!
//! ```text
//! "SKDB"
//! version: u32 (1)
//! id count: u32
//! string count: u32           distinct text offsets used by the entries
//! voice count: u32            ids that carry a voice path
//! string table size: u32
//! id count x { id: u32, string offset: u32, voice offset: u32 (u32::MAX = none) }
//! string table                NUL-terminated UTF-8
//! ```
//!
//! Entries are sorted by id. Identical texts share one table slot.

use std::collections::{BTreeMap, HashMap, HashSet};

use ltsdk_platform::{InStream, OutStream};

use crate::error::{DatabaseError, DatabaseResult};

/// File magic.
pub const STRING_KEEPER_MAGIC: [u8; 4] = *b"SKDB";

/// Current format version.
pub const STRING_KEEPER_VERSION: u32 = 1;

/// Voice offset meaning "no voice path".
pub const NO_VOICE: u32 = u32::MAX;

const ENTRY_SIZE: u64 = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
struct StringEntry {
    id: u32,
    text: String,
    voice: Option<String>,
}

fn read_u32(stream: &mut dyn InStream) -> DatabaseResult<u32> {
    let mut bytes = [0u8; 4];
    stream.read(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

fn too_big() -> DatabaseError {
    DatabaseError::Corrupt("string keeper exceeds 4 GiB".to_string())
}

/// Appends `s` to the table unless an identical string is already there.
fn intern<'a>(table: &mut Vec<u8>, offsets: &mut HashMap<&'a str, u32>, s: &'a str) -> DatabaseResult<u32> {
    if let Some(&offset) = offsets.get(s) {
        return Ok(offset);
    }
    let offset = u32::try_from(table.len()).map_err(|_| too_big())?;
    table.extend_from_slice(s.as_bytes());
    table.push(0);
    offsets.insert(s, offset);
    Ok(offset)
}

/// Number of distinct string offsets, the header's string count.
fn index_texts(offsets: impl Iterator<Item = u32>) -> u32 {
    let distinct: HashSet<u32> = offsets.collect();
    u32::try_from(distinct.len()).unwrap_or(u32::MAX)
}

fn c_string(table: &[u8], offset: u32) -> DatabaseResult<String> {
    let start = offset as usize;
    let tail = table
        .get(start..)
        .ok_or_else(|| DatabaseError::Corrupt(format!("string offset {offset} past table end")))?;
    let len = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| DatabaseError::Corrupt(format!("string at {offset} is not terminated")))?;
    String::from_utf8(tail[..len].to_vec()).map_err(|_| DatabaseError::Corrupt(format!("string at {offset} is not UTF-8")))
}

/// Loaded string table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringKeeper {
    entries: Vec<StringEntry>,
}

impl StringKeeper {
    /// Reads a string keeper file.
    pub fn load(stream: &mut dyn InStream) -> DatabaseResult<Self> {
        let mut magic = [0u8; 4];
        stream.read(&mut magic)?;
        if magic != STRING_KEEPER_MAGIC {
            return Err(DatabaseError::InvalidMagic(magic));
        }
        let version = read_u32(stream)?;
        if version != STRING_KEEPER_VERSION {
            return Err(DatabaseError::UnsupportedVersion(version));
        }

        let id_count = read_u32(stream)?;
        let string_count = read_u32(stream)?;
        let voice_count = read_u32(stream)?;
        let table_size = read_u32(stream)?;

        let remaining = stream.len().saturating_sub(stream.pos());
        if u64::from(id_count) * ENTRY_SIZE + u64::from(table_size) > remaining {
            return Err(DatabaseError::Corrupt(format!(
                "{id_count} ids and a {table_size} byte table do not fit in {remaining} bytes"
            )));
        }

        let mut index = Vec::with_capacity(id_count as usize);
        for _ in 0..id_count {
            index.push((read_u32(stream)?, read_u32(stream)?, read_u32(stream)?));
        }
        let mut table = vec![0u8; table_size as usize];
        stream.read(&mut table)?;

        let texts = index_texts(index.iter().map(|&(_, text, _)| text));
        if texts != string_count {
            return Err(DatabaseError::Corrupt(format!(
                "header claims {string_count} strings, found {texts}"
            )));
        }

        let mut entries = Vec::with_capacity(index.len());
        let mut voices = 0u32;
        for (id, text, voice) in index {
            if entries.last().is_some_and(|prev: &StringEntry| prev.id >= id) {
                return Err(DatabaseError::Corrupt(format!("id {id} out of order")));
            }
            let voice = if voice == NO_VOICE {
                None
            } else {
                voices += 1;
                Some(c_string(&table, voice)?)
            };
            entries.push(StringEntry {
                id,
                text: c_string(&table, text)?,
                voice,
            });
        }
        if voices != voice_count {
            return Err(DatabaseError::Corrupt(format!(
                "header claims {voice_count} voice paths, found {voices}"
            )));
        }

        tracing::debug!("loaded string keeper with {} strings", entries.len());
        Ok(Self { entries })
    }

    fn entry(&self, id: u32) -> Option<&StringEntry> {
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Text for `id`, or `default` if there is none.
    #[must_use]
    pub fn get_string<'a>(&'a self, id: u32, default: &'a str) -> &'a str {
        self.entry(id).map_or(default, |e| e.text.as_str())
    }

    /// Voice-over path for `id`.
    #[must_use]
    pub fn get_voice_path(&self, id: u32) -> Option<&str> {
        self.entry(id)?.voice.as_deref()
    }

    /// True if `id` has a string.
    #[must_use]
    pub fn has_string(&self, id: u32) -> bool {
        self.entry(id).is_some()
    }

    /// Number of ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no ids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|e| e.id)
    }
}

/// Builds string keeper files.
#[derive(Clone, Debug, Default)]
pub struct StringKeeperWriter {
    entries: BTreeMap<u32, (String, Option<String>)>,
}

impl StringKeeperWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a string. Returns false if `id` is taken or a text contains NUL.
    pub fn add(&mut self, id: u32, text: &str, voice: Option<&str>) -> bool {
        if self.entries.contains_key(&id) || text.contains('\0') || voice.is_some_and(|v| v.contains('\0')) {
            return false;
        }
        self.entries.insert(id, (text.to_string(), voice.map(str::to_string)));
        true
    }

    /// Number of ids added.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the file.
    pub fn save(&self, stream: &mut dyn OutStream) -> DatabaseResult<()> {
        let mut table = Vec::new();
        let mut offsets: HashMap<&str, u32> = HashMap::new();

        let mut index = Vec::with_capacity(self.entries.len());
        for (&id, (text, voice)) in &self.entries {
            let text_offset = intern(&mut table, &mut offsets, text)?;
            let voice_offset = match voice {
                Some(voice) => intern(&mut table, &mut offsets, voice)?,
                None => NO_VOICE,
            };
            index.push((id, text_offset, voice_offset));
        }

        let id_count = u32::try_from(index.len()).map_err(|_| too_big())?;
        let distinct_texts = index_texts(index.iter().map(|&(_, text, _)| text));
        let voice_count = u32::try_from(index.iter().filter(|(_, _, v)| *v != NO_VOICE).count())
            .map_err(|_| too_big())?;
        let table_size = u32::try_from(table.len()).map_err(|_| too_big())?;

        stream.write(&STRING_KEEPER_MAGIC)?;
        for value in [STRING_KEEPER_VERSION, id_count, distinct_texts, voice_count, table_size] {
            stream.write(&value.to_le_bytes())?;
        }
        for (id, text, voice) in index {
            stream.write(&id.to_le_bytes())?;
            stream.write(&text.to_le_bytes())?;
            stream.write(&voice.to_le_bytes())?;
        }
        stream.write(&table)?;
        stream.flush()?;
        Ok(())
    }
}
