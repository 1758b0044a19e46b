// SPDX-License-Identifier: MIT OR Apache-2.0
//! Asset slots with explicit load outcomes.
//!
//! Optional assets (the hand model, sounds) never feed failures into the
//! sequencer. Each slot records whether its asset loaded, fell back to a
//! degraded substitute, or failed outright, and rendering code queries it.
//! Loads are tagged with a [`LoadTicket`]; invalidating the slot makes any
//! completion that arrives later a no-op.

use crate::error::{HubError, Result};
use std::path::{Path, PathBuf};

/// Outcome of an asset load
#[derive(Debug, Clone, PartialEq)]
pub enum AssetStatus<T> {
    /// Nothing requested, or a load is in flight
    Pending,
    /// Asset ready
    Loaded(T),
    /// Asset unavailable; a degraded substitute is used
    Fallback(String),
    /// Asset unavailable with no substitute
    Failed(String),
}

impl<T> AssetStatus<T> {
    /// The loaded asset, if any
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(asset) => Some(asset),
            _ => None,
        }
    }

    /// Whether the load has finished (any outcome but `Pending`)
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Generation tag handed out when a load begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// Holder for one asset and its load generation
#[derive(Debug, Clone)]
pub struct AssetSlot<T> {
    status: AssetStatus<T>,
    generation: u64,
}

impl<T> AssetSlot<T> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            status: AssetStatus::Pending,
            generation: 0,
        }
    }

    /// Begin a load; the returned ticket must accompany the result
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.status = AssetStatus::Pending;
        LoadTicket(self.generation)
    }

    /// Store a load result. Returns false (and drops the result) if the
    /// ticket is stale.
    pub fn complete(&mut self, ticket: LoadTicket, status: AssetStatus<T>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                "Dropping stale asset load (ticket {}, current {})",
                ticket.0,
                self.generation
            );
            return false;
        }
        self.status = status;
        true
    }

    /// Whether a ticket still belongs to the current generation
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Forget the asset and orphan any in-flight load
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.status = AssetStatus::Pending;
    }

    /// Current status
    pub fn status(&self) -> &AssetStatus<T> {
        &self.status
    }
}

impl<T> Default for AssetSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Binary glTF hand model
#[derive(Debug, Clone, PartialEq)]
pub struct HandModel {
    /// Source file
    pub path: PathBuf,
    /// glTF container version
    pub version: u32,
    /// Raw container bytes
    pub bytes: Vec<u8>,
}

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_HEADER_LEN: usize = 12;

impl HandModel {
    /// Validate a GLB container header and wrap the bytes
    pub fn from_glb(path: &Path, bytes: Vec<u8>) -> Result<Self> {
        let invalid = |reason: &str| HubError::InvalidAsset {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        if bytes.len() < GLB_HEADER_LEN {
            return Err(invalid("file shorter than GLB header"));
        }
        if &bytes[0..4] != GLB_MAGIC {
            return Err(invalid("missing glTF magic"));
        }

        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let declared = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        if declared > bytes.len() {
            return Err(invalid("declared length exceeds file size"));
        }

        Ok(Self {
            path: path.to_path_buf(),
            version,
            bytes,
        })
    }
}

/// What the renderer draws for the emerging hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandVisual {
    /// The loaded model
    Model,
    /// Procedural stand-in geometry
    Procedural,
}

impl HandVisual {
    /// Pick the visual for a slot's current status
    pub fn for_status(status: &AssetStatus<HandModel>) -> Self {
        match status {
            AssetStatus::Loaded(_) => Self::Model,
            _ => Self::Procedural,
        }
    }
}

/// Read and validate a hand model
pub async fn load_hand_model(path: PathBuf) -> AssetStatus<HandModel> {
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Hand model {:?} unavailable: {}. Using procedural hand.", path, e);
            return AssetStatus::Fallback(format!("read failed: {e}"));
        }
    };

    match HandModel::from_glb(&path, bytes) {
        Ok(model) => {
            tracing::info!("Loaded hand model {:?} (glTF v{})", path, model.version);
            AssetStatus::Loaded(model)
        }
        Err(e) => {
            tracing::warn!("{}. Using procedural hand.", e);
            AssetStatus::Fallback(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glb_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(GLB_MAGIC);
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 4]);
        bytes
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut slot: AssetSlot<u32> = AssetSlot::new();
        let ticket = slot.begin();
        slot.invalidate();

        assert!(!slot.is_current(ticket));
        assert!(!slot.complete(ticket, AssetStatus::Loaded(1)));
        assert_eq!(slot.status(), &AssetStatus::Pending);

        let ticket = slot.begin();
        assert!(slot.complete(ticket, AssetStatus::Loaded(2)));
        assert_eq!(slot.status().loaded(), Some(&2));
    }

    #[test]
    fn test_glb_validation() {
        let path = Path::new("hand.glb");
        let model = HandModel::from_glb(path, glb_bytes()).unwrap();
        assert_eq!(model.version, 2);

        assert!(HandModel::from_glb(path, b"glTF".to_vec()).is_err());
        let mut wrong_magic = glb_bytes();
        wrong_magic[0] = b'x';
        assert!(HandModel::from_glb(path, wrong_magic).is_err());
    }

    #[test]
    fn test_visual_degrades_to_procedural() {
        assert_eq!(HandVisual::for_status(&AssetStatus::Pending), HandVisual::Procedural);
        assert_eq!(
            HandVisual::for_status(&AssetStatus::Fallback("missing".into())),
            HandVisual::Procedural
        );
    }

    #[tokio::test]
    async fn test_missing_model_falls_back() {
        let status = load_hand_model(PathBuf::from("/no/such/hand.glb")).await;
        assert!(matches!(status, AssetStatus::Fallback(_)));
    }

    #[tokio::test]
    async fn test_loads_model_from_disk() {
        let path = std::env::temp_dir().join(format!("hauntedhub_hand_{}.glb", std::process::id()));
        std::fs::write(&path, glb_bytes()).unwrap();

        let status = load_hand_model(path.clone()).await;
        assert_eq!(HandVisual::for_status(&status), HandVisual::Model);

        std::fs::remove_file(path).unwrap();
    }
}
