//! Caché de permisos de sesión por usuario con refresco por antigüedad.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Permisos de un usuario tal y como los resuelve el servicio remoto.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPermissions {
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub permissions: BTreeMap<String, Value>,
    #[serde(default)]
    pub doc_categories: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedPermissions {
    pub permissions: UserPermissions,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PermissionCache {
    ttl: Duration,
    entries: HashMap<String, CachedPermissions>,
}

impl PermissionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, user: &str) -> Option<&CachedPermissions> {
        self.entries.get(user)
    }

    /// Hay que refrescar si no hay entrada o si supera el TTL.
    pub fn needs_refresh(&self, user: &str, now: DateTime<Utc>) -> bool {
        match self.entries.get(user) {
            Some(entry) => now - entry.stored_at > self.ttl,
            None => true,
        }
    }

    pub fn store(
        &mut self,
        user: &str,
        permissions: UserPermissions,
        now: DateTime<Utc>,
    ) -> &CachedPermissions {
        let entry = CachedPermissions {
            permissions,
            stored_at: now,
        };
        self.entries.insert(user.to_string(), entry);
        &self.entries[user]
    }

    /// Invalida la entrada del usuario (cierre de sesión).
    pub fn remove(&mut self, user: &str) -> Option<CachedPermissions> {
        self.entries.remove(user)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
