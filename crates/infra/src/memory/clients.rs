use facturation_billing::{ClientDirectory, StorageError};
use facturation_clients::Client;
use facturation_core::ClientId;

use super::keyed_store::InMemoryKeyedStore;

/// In-memory client directory.
#[derive(Debug, Default)]
pub struct InMemoryClientDirectory {
    clients: InMemoryKeyedStore<ClientId, Client>,
}

impl InMemoryClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a client record.
    pub fn register(&self, client: Client) -> Result<ClientId, StorageError> {
        let id = client.id_typed();
        self.clients.upsert(id, client)?;
        Ok(id)
    }

    pub fn remove(&self, id: ClientId) -> Result<(), StorageError> {
        self.clients.remove(&id)?;
        Ok(())
    }

    /// All clients, by display name.
    pub fn list(&self) -> Result<Vec<Client>, StorageError> {
        let mut clients = self.clients.list()?;
        clients.sort_by_cached_key(|c| (c.display_name(), c.id_typed()));
        Ok(clients)
    }
}

impl ClientDirectory for InMemoryClientDirectory {
    fn find_client(&self, id: ClientId) -> Result<Option<Client>, StorageError> {
        self.clients.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_clients_are_found_and_listed_by_name() {
        let dir = InMemoryClientDirectory::new();
        let zed = dir.register(Client::organisation(ClientId::new(), "Zed")).unwrap();
        dir.register(Client::individual(ClientId::new(), "Anne", "Durand")).unwrap();

        assert!(dir.find_client(zed).unwrap().is_some());
        assert!(dir.find_client(ClientId::new()).unwrap().is_none());

        let names: Vec<String> = dir.list().unwrap().iter().map(Client::display_name).collect();
        assert_eq!(names, ["Anne Durand", "Zed"]);

        dir.remove(zed).unwrap();
        assert!(dir.find_client(zed).unwrap().is_none());
    }
}
