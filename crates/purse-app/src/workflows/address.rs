//! Address Workflow - Deposit Address Allocation

use purse_core::ToastTheme;

use crate::bridge::{NetworkId, ReceiveAddress};
use crate::core::AppCore;
use crate::errors::AppError;
use crate::views::OperationKey;
use crate::workflows::surface;

/// Allocate a new deposit address on `network`.
///
/// **What it does**: requests the address and publishes it to [`AppCore::last_address`]
/// **Returns**: the address; hitting the per-network limit surfaces
/// [`ADDRESS_LIMIT_REACHED`](crate::errors::ADDRESS_LIMIT_REACHED) with its own message
pub async fn create_receive_address(
    app: &AppCore,
    network: &NetworkId,
) -> Result<ReceiveAddress, AppError> {
    let _guard = app.operations().begin(OperationKey::CreateAddress);
    let address = app
        .api()
        .create_receive_address(network)
        .await
        .map_err(|err| surface(app, OperationKey::CreateAddress, err))?;

    tracing::info!(%network, "receive address created");
    app.views().last_address.set(Some(address.clone()));
    app.notify("Address created", ToastTheme::Success);
    Ok(address)
}
