use crate::message::Message;

/// Device disposition on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Accepted,
    BadRequest,
    NotFound,
    InternalError,
    /// Code outside the known set; preserved for diagnostics.
    Other(u32),
}

impl ResponseCode {
    pub fn from_u32(code: u32) -> Self {
        match code {
            200 => ResponseCode::Accepted,
            400 => ResponseCode::BadRequest,
            404 => ResponseCode::NotFound,
            500 => ResponseCode::InternalError,
            other => ResponseCode::Other(other),
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            ResponseCode::Accepted => 200,
            ResponseCode::BadRequest => 400,
            ResponseCode::NotFound => 404,
            ResponseCode::InternalError => 500,
            ResponseCode::Other(code) => *code,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ResponseCode::Accepted)
    }
}

/// Inbound response correlated to a request.
///
/// The envelope id is the id of the request this response answers. When the
/// code is not [`ResponseCode::Accepted`] the device's exception message is
/// carried alongside.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMessage {
    pub message: Message,
    pub response_code: ResponseCode,
    pub exception_message: Option<String>,
}

impl ResponseMessage {
    pub fn request_id(&self) -> &str {
        &self.message.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip() {
        for code in [200u32, 400, 404, 500] {
            assert_eq!(ResponseCode::from_u32(code).as_u32(), code);
        }
    }

    #[test]
    fn unknown_code_is_preserved() {
        let code = ResponseCode::from_u32(418);
        assert_eq!(code, ResponseCode::Other(418));
        assert_eq!(code.as_u32(), 418);
        assert!(!code.is_accepted());
    }
}
