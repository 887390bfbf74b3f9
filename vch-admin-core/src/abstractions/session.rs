use crate::types::ServerInfo;

/// Access to the current management session's identity.
pub trait SessionProvider: Send + Sync {
    /// The servers the session is connected to. Directory queries are scoped
    /// to the first entry's `service_guid`.
    fn servers_info(&self) -> Vec<ServerInfo>;
}
