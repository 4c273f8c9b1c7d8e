//! Key points: short notes the user keeps next to their tasks

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    id: u64,
    content: String,
}

impl KeyPoint {
    pub fn new(id: u64, content: String) -> Self {
        Self { id, content }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
