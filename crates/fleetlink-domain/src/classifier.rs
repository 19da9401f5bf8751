use crate::error::{CallError, CallResult, DeviceRejection};
use crate::payload::Payload;
use crate::response::{ResponseCode, ResponseMessage};

/// Classify a response: `Ok` for an accepted response, a typed
/// [`DeviceRejection`] otherwise.
///
/// Pure: the same response always yields the same classification.
pub fn classify(response: &ResponseMessage) -> CallResult<()> {
    let message = response
        .exception_message
        .clone()
        .unwrap_or_default();

    match response.response_code {
        ResponseCode::Accepted => Ok(()),
        ResponseCode::BadRequest => Err(DeviceRejection::BadRequest(message).into()),
        ResponseCode::NotFound => Err(DeviceRejection::NotFound(message).into()),
        ResponseCode::InternalError => Err(DeviceRejection::InternalError(message).into()),
        ResponseCode::Other(code) => Err(DeviceRejection::UnknownCode { code, message }.into()),
    }
}

/// Classify a response and, when accepted, extract a typed result from its
/// payload.
///
/// A failing extractor is reported as `ContentExtraction`, never conflated
/// with a device-side rejection.
pub fn classify_with<T, F>(response: &ResponseMessage, extract: F) -> CallResult<T>
where
    F: FnOnce(&Payload) -> anyhow::Result<T>,
{
    classify(response)?;
    extract(&response.message.payload)
        .map_err(|e| CallError::ContentExtraction(e.to_string()))
}
