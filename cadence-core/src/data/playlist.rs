use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Playlist {
    pub id: i64,
    pub name: Arc<str>,
}

impl Playlist {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
