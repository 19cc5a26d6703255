//! # Establishment Commands
//!
//! The signed-in admin's own establishment: profile and addresses.

use tracing::debug;

use roda_client::ApiClient;
use roda_core::validation::require;
use roda_core::{Address, Establishment, EstablishmentUpdate};

use crate::error::Notice;

pub async fn get_profile(client: &ApiClient) -> Result<Establishment, Notice> {
    debug!("get_profile command");
    Ok(client.establishment().me().await?)
}

pub async fn update_profile(
    client: &ApiClient,
    update: &EstablishmentUpdate,
) -> Result<Establishment, Notice> {
    if let Some(name) = &update.name {
        require("name", name)?;
    }
    debug!(?update, "update_profile command");
    Ok(client.establishment().update_me(update).await?)
}

pub async fn list_addresses(client: &ApiClient) -> Result<Vec<Address>, Notice> {
    Ok(client.establishment().addresses().await?)
}

/// Creates an address after checking the required fields.
pub async fn add_address(client: &ApiClient, address: &Address) -> Result<Address, Notice> {
    validate_address(address)?;
    Ok(client.establishment().create_address(address).await?)
}

pub async fn update_address(
    client: &ApiClient,
    id: &str,
    address: &Address,
) -> Result<Address, Notice> {
    validate_address(address)?;
    Ok(client.establishment().update_address(id, address).await?)
}

pub async fn delete_address(client: &ApiClient, id: &str) -> Result<Notice, Notice> {
    client.establishment().delete_address(id).await?;
    Ok(Notice::success("Address removed."))
}

fn validate_address(address: &Address) -> Result<(), Notice> {
    require("street", &address.street)?;
    require("number", &address.number)?;
    require("neighborhood", &address.neighborhood)?;
    require("city", &address.city)?;
    require("state", &address.state)?;
    require("zipCode", &address.zip_code)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_validate_address_reports_first_missing_field() {
        let address = Address {
            street: "Rua das Flores".into(),
            number: "  ".into(),
            ..Default::default()
        };

        let notice = validate_address(&address).unwrap_err();
        assert_eq!(notice.code, ErrorCode::ValidationError);
        assert_eq!(notice.fields[0].field, "number");
    }
}
