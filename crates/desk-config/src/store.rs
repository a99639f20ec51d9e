//! Durable store for the configuration document.
//!
//! The parsed document lives in memory behind one mutex; every mutation runs
//! inside a closure that persists before the lock is released. This keeps
//! ticket numbers unique and registry entries intact when handlers interleave
//! at await points. An unreadable or unparseable document resets to the
//! default root rather than failing startup.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{anyhow, Context, Result};
use desk_core::{format_ticket_number, write_text_atomic};

use crate::model::{ConfigDocument, GuildConfig};

pub struct ConfigStore {
    path: PathBuf,
    document: Mutex<ConfigDocument>,
}

impl ConfigStore {
    /// Opens the store, creating the document file with an empty root when it
    /// does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = read_document(&path);
        let store = Self {
            path,
            document: Mutex::new(document),
        };
        if !store.path.exists() {
            let guard = store
                .document
                .lock()
                .map_err(|_| anyhow!("config store mutex is poisoned"))?;
            store.persist(&guard)?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Re-reads the document from durable storage, replacing in-memory state.
    pub fn reload(&self) -> Result<()> {
        let fresh = read_document(&self.path);
        let mut guard = self
            .document
            .lock()
            .map_err(|_| anyhow!("config store mutex is poisoned"))?;
        *guard = fresh;
        Ok(())
    }

    /// Returns the guild's config, synthesizing and persisting defaults on
    /// first touch so absence is never observed afterwards.
    pub fn guild(&self, guild_id: &str) -> Result<GuildConfig> {
        let mut guard = self
            .document
            .lock()
            .map_err(|_| anyhow!("config store mutex is poisoned"))?;
        if !guard.guilds.contains_key(guild_id) {
            guard
                .guilds
                .insert(guild_id.to_string(), GuildConfig::default());
            self.persist(&guard)?;
        }
        Ok(guard
            .guilds
            .get(guild_id)
            .cloned()
            .unwrap_or_default())
    }

    /// Mutates the guild's config under the store lock and persists the
    /// document before returning. The guild entry is synthesized first when
    /// missing.
    pub fn update_guild<T>(
        &self,
        guild_id: &str,
        mutate: impl FnOnce(&mut GuildConfig) -> T,
    ) -> Result<T> {
        let mut guard = self
            .document
            .lock()
            .map_err(|_| anyhow!("config store mutex is poisoned"))?;
        let entry = guard.guilds.entry(guild_id.to_string()).or_default();
        let value = mutate(entry);
        self.persist(&guard)?;
        Ok(value)
    }

    /// Consumes the next ticket number for the guild. The counter increment
    /// persists even when the caller's creation flow later fails.
    pub fn allocate_ticket_number(&self, guild_id: &str) -> Result<String> {
        self.update_guild(guild_id, |cfg| {
            cfg.ticket_count = cfg.ticket_count.saturating_add(1);
            format_ticket_number(cfg.ticket_count)
        })
    }

    pub fn is_guild_configured(&self, guild_id: &str) -> Result<bool> {
        Ok(self.guild(guild_id)?.is_configured())
    }

    /// Guild ids currently present in the document, for sweep enumeration.
    pub fn guild_ids(&self) -> Result<Vec<String>> {
        let guard = self
            .document
            .lock()
            .map_err(|_| anyhow!("config store mutex is poisoned"))?;
        Ok(guard.guilds.keys().cloned().collect())
    }

    fn persist(&self, document: &ConfigDocument) -> Result<()> {
        let mut payload = serde_json::to_string_pretty(document)
            .context("failed to serialize config document")?;
        payload.push('\n');
        write_text_atomic(&self.path, &payload)
            .with_context(|| format!("failed to write config document {}", self.path.display()))
    }
}

fn read_document(path: &Path) -> ConfigDocument {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return ConfigDocument::default();
    };
    // Corruption is non-fatal: the document resets to the empty root.
    serde_json::from_str::<ConfigDocument>(&raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_touch_synthesizes_and_persists_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let store = ConfigStore::open(&path).expect("open");

        let cfg = store.guild("g1").expect("guild");
        assert_eq!(cfg, GuildConfig::default());

        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(raw.contains("\"g1\""));
        assert!(raw.contains("\"cooldown\": 600"));
    }

    #[test]
    fn corrupt_document_resets_to_empty_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").expect("write");

        let store = ConfigStore::open(&path).expect("open");
        assert!(store.guild_ids().expect("ids").is_empty());
    }

    #[test]
    fn allocate_ticket_number_is_monotonic_and_persisted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let store = ConfigStore::open(&path).expect("open");

        assert_eq!(store.allocate_ticket_number("g1").expect("n"), "0001");
        assert_eq!(store.allocate_ticket_number("g1").expect("n"), "0002");
        assert_eq!(store.allocate_ticket_number("g2").expect("n"), "0001");

        let reopened = ConfigStore::open(&path).expect("reopen");
        assert_eq!(reopened.allocate_ticket_number("g1").expect("n"), "0003");
    }

    #[test]
    fn reload_replaces_in_memory_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let store = ConfigStore::open(&path).expect("open");
        store
            .update_guild("g1", |cfg| cfg.settings_complete = true)
            .expect("update");

        let mut external = ConfigDocument::default();
        external.guilds.insert(
            "g2".to_string(),
            GuildConfig {
                cooldown: 30,
                ..GuildConfig::default()
            },
        );
        let payload = serde_json::to_string_pretty(&external).expect("encode");
        std::fs::write(&path, payload).expect("write");

        store.reload().expect("reload");
        assert_eq!(store.guild_ids().expect("ids"), vec!["g2".to_string()]);
        assert_eq!(store.guild("g2").expect("guild").cooldown, 30);
    }

    #[test]
    fn update_guild_persists_before_returning() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let store = ConfigStore::open(&path).expect("open");

        store
            .update_guild("g1", |cfg| {
                cfg.blacklist.push("u9".to_string());
            })
            .expect("update");

        let reopened = ConfigStore::open(&path).expect("reopen");
        assert!(reopened.guild("g1").expect("guild").is_blacklisted("u9"));
    }
}
