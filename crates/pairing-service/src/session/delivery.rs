//! Credential artifact delivery back to the owning device.

use crate::fault;
use crate::phone::PhoneIdentifier;
use crate::session::store::{SessionStore, StoreError, CREDENTIALS_FILE};
use tracing::{debug, info};
use wa_gateway_client::{ConnectionHandle, OutgoingMessage};

/// MIME type of the delivered credential artifact.
pub const ARTIFACT_MIMETYPE: &str = "application/json";

const WARNING_TEXT: &str = "\u{26a0}\u{fe0f} DO NOT SHARE THIS FILE\n\n\
It grants full access to your account. Keep it on your own device and \
delete it from this chat once saved.";

/// Send the credential artifact, then a plain-text warning, to the device
/// owner.
///
/// The store is read once; both sends are independent and best-effort. A
/// failure on either is logged and does not roll back or retry the other.
pub async fn deliver(
    connection: &dyn ConnectionHandle,
    store: &SessionStore,
    number: &PhoneIdentifier,
) -> Result<(), StoreError> {
    let artifact = store.read_credentials().await?;
    let recipient = number.user_address();
    debug!(recipient = %recipient, bytes = artifact.len(), "delivering credential artifact");

    let mut clean = true;

    let document = OutgoingMessage::document(&artifact, ARTIFACT_MIMETYPE, CREDENTIALS_FILE);
    if let Err(err) = connection.send(&recipient, document).await {
        fault::log_fault("credential attachment send", &err);
        clean = false;
    }

    if let Err(err) = connection
        .send(&recipient, OutgoingMessage::text(WARNING_TEXT))
        .await
    {
        fault::log_fault("warning message send", &err);
        clean = false;
    }

    if clean {
        info!(phone_number = %number, "session credentials sent");
    }
    Ok(())
}
