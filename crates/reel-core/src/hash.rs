//! Content hashing for deterministic rendering verification.
//!
//! Produces a SHA-256 hash of frame buffer data so two generations from the
//! same inputs can be compared bit for bit.

use sha2::{Digest, Sha256};

use crate::frame::FrameBuffer;

/// A content hash digest (SHA-256, 32 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn update_with_frame(hasher: &mut Sha256, frame: &FrameBuffer) {
    // Dimensions are part of the digest so equal bytes at different sizes differ.
    hasher.update(frame.width.to_le_bytes());
    hasher.update(frame.height.to_le_bytes());
    hasher.update(&frame.data);
}

fn finish(hasher: Sha256) -> ContentHash {
    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    ContentHash::from_bytes(bytes)
}

/// Compute the content hash of a single frame buffer.
pub fn hash_frame(frame: &FrameBuffer) -> ContentHash {
    let mut hasher = Sha256::new();
    update_with_frame(&mut hasher, frame);
    finish(hasher)
}

/// Compute the content hash of an ordered sequence of frames.
pub fn hash_frames<'a, I>(frames: I) -> ContentHash
where
    I: IntoIterator<Item = &'a FrameBuffer>,
{
    let mut hasher = Sha256::new();
    let mut count: u64 = 0;
    for frame in frames {
        update_with_frame(&mut hasher, frame);
        count += 1;
    }
    hasher.update(count.to_le_bytes());
    finish(hasher)
}
