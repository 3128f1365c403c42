use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id:          String,
    pub name:        String,
    pub description: String,
    /// Free text, e.g. "Group Stage", "Final".
    pub stage:       String,
}

impl Tournament {
    pub fn new(name: &str, description: &str, stage: &str) -> Self {
        Self {
            id: format!("tournament_{}", uuid::Uuid::new_v4().simple()),
            name: name.to_string(),
            description: description.to_string(),
            stage: stage.to_string(),
        }
    }
}
