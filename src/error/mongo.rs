use std::fmt;

use serde::Serialize;

/// Structured error information extracted from MongoDB driver errors.
///
/// Attached to error payloads so the console can show the server's code name
/// next to the message.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Write a one-line description of a driver error.
///
/// Used by the `Display` implementation of `ConsoleError::MongoDb`, which ends
/// up in the `err` slot of the rendered page.
pub fn format_mongodb_error(
    f: &mut fmt::Formatter<'_>,
    error: &mongodb::error::Error,
) -> fmt::Result {
    let info = extract_error_info(error);
    let message = info.message.unwrap_or_else(|| error.to_string());

    match (info.code_name, info.code) {
        (Some(name), Some(code)) => write!(f, "{message} ({name}, code {code})"),
        (None, Some(code)) => write!(f, "{message} (code {code})"),
        _ => write!(f, "{message}"),
    }
}

/// Extract structured information from a MongoDB error using the driver API.
pub fn extract_error_info(error: &mongodb::error::Error) -> ErrorInfo {
    use mongodb::error::{ErrorKind, WriteFailure};

    let mut info = ErrorInfo::default();

    match error.kind.as_ref() {
        ErrorKind::Command(command_error) => {
            info.error_type = Some("mongo.command_error".to_string());
            info.code = Some(command_error.code);
            info.code_name = Some(command_error.code_name.clone())
                .filter(|name| !name.is_empty())
                .or_else(|| known_code_name(command_error.code));
            info.message = Some(command_error.message.clone());
        }
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            info.error_type = Some("mongo.write_error".to_string());
            info.code = Some(write_error.code);
            info.code_name = known_code_name(write_error.code);
            info.message = Some(write_error.message.clone());
        }
        ErrorKind::Write(WriteFailure::WriteConcernError(wc_error)) => {
            info.error_type = Some("mongo.write_concern_error".to_string());
            info.code = Some(wc_error.code);
            info.code_name = known_code_name(wc_error.code);
            info.message = Some(wc_error.message.clone());
        }
        ErrorKind::Authentication { message, .. } => {
            info.error_type = Some("mongo.authentication_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::InvalidArgument { message, .. } => {
            info.error_type = Some("mongo.invalid_argument".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::ServerSelection { message, .. } => {
            info.error_type = Some("mongo.server_selection_error".to_string());
            info.message = Some(message.clone());
        }
        _ => {
            info.message = Some(error.to_string());
        }
    }

    info
}

/// Code names for the errors an admin console hits most often.
fn known_code_name(code: i32) -> Option<String> {
    let name = match code {
        2 => "BadValue",
        9 => "FailedToParse",
        11000 | 11001 => "DuplicateKey",
        13 => "Unauthorized",
        26 => "NamespaceNotFound",
        50 => "MaxTimeMSExpired",
        59 => "CommandNotFound",
        _ => return None,
    };

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_info_payload_shape() {
        let info = ErrorInfo {
            error_type: Some("mongo.write_error".to_string()),
            code: Some(11000),
            code_name: known_code_name(11000),
            message: None,
        };

        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            serde_json::json!({
                "type": "mongo.write_error",
                "code": 11000,
                "codeName": "DuplicateKey",
            })
        );
    }

    #[test]
    fn test_known_code_names() {
        assert_eq!(known_code_name(11000).as_deref(), Some("DuplicateKey"));
        assert_eq!(known_code_name(26).as_deref(), Some("NamespaceNotFound"));
        assert_eq!(known_code_name(12345), None);
    }

    #[test]
    fn test_error_info_skips_empty_fields() {
        let info = ErrorInfo {
            message: Some("boom".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "boom" }));
    }
}
