use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use fleet_store::DataLayout;

use crate::error::{ShopError, ShopResult};
use crate::report::render_mirror;
use crate::state::ShopState;

/// Snapshot file magic; the trailing digit is the format version.
const MAGIC: &[u8; 8] = b"FLTSNAP1";

/// Header size: 8 bytes magic + 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 16;

/// Durable, authoritative storage for shop state.
///
/// On-disk format of `<location>.snapshot`:
/// ```text
/// [8 bytes: magic "FLTSNAP1"]
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized ShopState)]
/// ```
///
/// Every save writes a temporary file next to the target and renames it into
/// place, so a crash mid-write leaves the previous snapshot intact. The
/// human-readable `<location>.txt` mirror is regenerated from the state after
/// each save and is never read back.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    layout: DataLayout,
}

impl SnapshotStore {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// Whether a snapshot exists for `location`.
    pub fn exists(&self, location: &str) -> ShopResult<bool> {
        Ok(self.layout.snapshot_path(location)?.is_file())
    }

    /// Persist `state` atomically, then refresh its mirror.
    ///
    /// Only the snapshot decides success; a mirror that cannot be written is
    /// logged and left stale.
    pub fn save(&self, state: &ShopState) -> ShopResult<()> {
        let path = self.layout.snapshot_path(&state.location)?;
        let bytes = encode(state)?;
        write_atomic(&path, &bytes)?;

        let mirror = self.layout.mirror_path(&state.location)?;
        if let Err(e) = write_atomic(&mirror, render_mirror(state).as_bytes()) {
            warn!(path = %mirror.display(), error = %e, "failed to refresh shop mirror");
        }

        debug!(
            location = %state.location,
            bytes = bytes.len(),
            transactions = state.history.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Load the snapshot for `location` in full, or fail.
    pub fn load(&self, location: &str) -> ShopResult<ShopState> {
        let path = self.layout.snapshot_path(location)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ShopError::SnapshotNotFound(path));
            }
            Err(e) => return Err(e.into()),
        };

        let state = decode(&bytes).map_err(|reason| ShopError::CorruptSnapshot {
            path: path.clone(),
            reason,
        })?;
        if state.location != location {
            return Err(ShopError::CorruptSnapshot {
                path,
                reason: format!("snapshot belongs to location {:?}", state.location),
            });
        }

        info!(
            location,
            available = state.available.len(),
            rented = state.rented.len(),
            transactions = state.history.len(),
            "snapshot loaded"
        );
        Ok(state)
    }
}

/// Frame a state as snapshot bytes.
pub fn encode(state: &ShopState) -> ShopResult<Vec<u8>> {
    let payload =
        bincode::serialize(state).map_err(|e| ShopError::Serialization(e.to_string()))?;
    let length = u32::try_from(payload.len())
        .map_err(|_| ShopError::Serialization("snapshot exceeds 4 GiB".into()))?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Validate and decode snapshot bytes. The error is a human-readable reason.
pub fn decode(bytes: &[u8]) -> Result<ShopState, String> {
    if bytes.len() < HEADER_SIZE {
        return Err(format!("file too short ({} bytes)", bytes.len()));
    }
    if &bytes[..8] != MAGIC {
        return Err("bad magic; not a shop snapshot".into());
    }

    let length = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
    let expected_crc = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
    let payload = &bytes[HEADER_SIZE..];

    if payload.len() != length {
        return Err(format!(
            "payload length mismatch: header says {length}, file has {}",
            payload.len()
        ));
    }

    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(format!(
            "CRC mismatch: expected {expected_crc:#010x}, got {actual_crc:#010x}"
        ));
    }

    bincode::deserialize(payload).map_err(|e| format!("undecodable payload: {e}"))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> ShopResult<()> {
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
