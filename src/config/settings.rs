use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Groups the listener, hub, storage and logging settings.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub hub: HubSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
}

/// Configuration settings for the server.
///
/// Defines the host and port the WebSocket listener will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Configuration settings for the broadcast hub.
#[derive(Debug, Deserialize, Clone)]
pub struct HubSettings {
    /// Upper bound on simultaneously registered connections.
    pub max_connections: usize,
    /// Capacity of each connection's outbound mailbox. A full mailbox drops
    /// broadcasts for that connection only.
    pub mailbox_capacity: usize,
    /// Capacity of the aggregation channel feeding the router.
    pub inbound_capacity: usize,
}

/// Location of the embedded credential database.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub hub: Option<PartialHubSettings>,
    pub storage: Option<PartialStorageSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialHubSettings {
    pub max_connections: Option<usize>,
    pub mailbox_capacity: Option<usize>,
    pub inbound_capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStorageSettings {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Settings {
    /// Fills every value missing from `partial` with the matching default.
    pub fn merged_with(partial: PartialSettings) -> Self {
        let default = Settings::default();

        Settings {
            server: ServerSettings {
                host: partial
                    .server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(default.server.host),
                port: partial
                    .server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(default.server.port),
            },
            hub: HubSettings {
                max_connections: partial
                    .hub
                    .as_ref()
                    .and_then(|h| h.max_connections)
                    .unwrap_or(default.hub.max_connections),
                // tokio channels reject a zero capacity
                mailbox_capacity: partial
                    .hub
                    .as_ref()
                    .and_then(|h| h.mailbox_capacity)
                    .unwrap_or(default.hub.mailbox_capacity)
                    .max(1),
                inbound_capacity: partial
                    .hub
                    .as_ref()
                    .and_then(|h| h.inbound_capacity)
                    .unwrap_or(default.hub.inbound_capacity)
                    .max(1),
            },
            storage: StorageSettings {
                path: partial
                    .storage
                    .as_ref()
                    .and_then(|s| s.path.clone())
                    .unwrap_or(default.storage.path),
            },
            log: LogSettings {
                level: partial
                    .log
                    .and_then(|l| l.level)
                    .unwrap_or(default.log.level),
            },
        }
    }

    /// The `host:port` pair the listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            hub: HubSettings::default(),
            storage: StorageSettings {
                path: "chathub_db".to_string(),
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            max_connections: 1000,
            mailbox_capacity: 64,
            inbound_capacity: 256,
        }
    }
}
