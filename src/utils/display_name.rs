use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Retention window for the remembered display name, matching the original
/// cookie lifetime.
pub const DEFAULT_TTL_DAYS: i64 = 180;

#[derive(Serialize, Deserialize)]
struct StoredName {
    name: String,
    expires_at: DateTime<Utc>,
}

/// Persists the uploader's display name so the name field can be prefilled on
/// the next start. The desktop stand-in for the original's cookie.
pub struct DisplayNameStore {
    path: PathBuf,
}

impl DisplayNameStore {
    /// Store under the platform config directory, falling back to the working
    /// directory when none is known.
    pub fn default_location() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::at(base.join("wedding-uploader").join("display_name.json"))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, name: &str) -> io::Result<()> {
        self.save_with_ttl(name, DEFAULT_TTL_DAYS)
    }

    pub fn save_with_ttl(&self, name: &str, ttl_days: i64) -> io::Result<()> {
        let stored = StoredName {
            name: name.to_string(),
            expires_at: Utc::now() + Duration::days(ttl_days),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&stored).map_err(io::Error::other)?;
        fs::write(&self.path, json)
    }

    /// Returns the remembered name, or `None` when nothing was saved, the
    /// entry expired, or the file is unreadable.
    pub fn load(&self) -> Option<String> {
        let stored = read_stored(&self.path)?;
        if stored.expires_at <= Utc::now() {
            log::debug!("stored display name expired");
            return None;
        }
        Some(stored.name)
    }
}

fn read_stored(path: &Path) -> Option<StoredName> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}
