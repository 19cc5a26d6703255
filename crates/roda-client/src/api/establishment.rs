//! # Establishment Endpoints
//!
//! The signed-in establishment's own profile and addresses.

use tracing::{debug, info};

use roda_core::{Address, Establishment, EstablishmentUpdate};

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct EstablishmentApi {
    client: ApiClient,
}

impl EstablishmentApi {
    pub fn new(client: ApiClient) -> Self {
        EstablishmentApi { client }
    }

    /// `GET /establishment/me`
    pub async fn me(&self) -> ClientResult<Establishment> {
        debug!("Fetching own establishment");
        self.client.get(&["establishment", "me"]).await
    }

    /// `PATCH /establishment/me`
    pub async fn update_me(&self, update: &EstablishmentUpdate) -> ClientResult<Establishment> {
        let updated: Establishment = self.client.patch(&["establishment", "me"], update).await?;
        info!(establishment_id = %updated.id, "Establishment updated");
        Ok(updated)
    }

    /// `GET /establishment/address`
    pub async fn addresses(&self) -> ClientResult<Vec<Address>> {
        self.client.get(&["establishment", "address"]).await
    }

    /// `POST /establishment/address`
    pub async fn create_address(&self, address: &Address) -> ClientResult<Address> {
        self.client.post(&["establishment", "address"], address).await
    }

    /// `PATCH /establishment/address/:id`
    pub async fn update_address(&self, id: &str, address: &Address) -> ClientResult<Address> {
        self.client
            .patch(&["establishment", "address", id], address)
            .await
    }

    /// `DELETE /establishment/address/:id`
    pub async fn delete_address(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&["establishment", "address", id]).await?;
        info!(address_id = id, "Address deleted");
        Ok(())
    }
}
