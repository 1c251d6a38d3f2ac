use crate::error::{AppError, Result};
use base64ct::{Base64, Encoding};

/// Username and password carried by an HTTP Basic `Authorization` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Parse the value of an `Authorization: Basic <base64>` header
pub fn parse_basic(header: &str) -> Result<BasicCredentials> {
    let encoded = header
        .strip_prefix("Basic ")
        .or_else(|| header.strip_prefix("basic "))
        .ok_or_else(|| AppError::Authentication("Expected Basic credentials".to_string()))?;

    let decoded = Base64::decode_vec(encoded.trim())
        .map_err(|_| AppError::Authentication("Malformed Basic credentials".to_string()))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AppError::Authentication("Credentials are not valid UTF-8".to_string()))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| AppError::Authentication("Malformed Basic credentials".to_string()))?;

    if username.is_empty() {
        return Err(AppError::Authentication("Empty username".to_string()));
    }

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Build an `Authorization` header value; used by the CLI and tests
pub fn encode_basic(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        Base64::encode_string(format!("{}:{}", username, password).as_bytes())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_header() {
        // passwords may contain colons
        let header = encode_basic("maria.santos", "s3nh@:x");
        let creds = parse_basic(&header).unwrap();
        assert_eq!(creds.username, "maria.santos");
        assert_eq!(creds.password, "s3nh@:x");
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            parse_basic("Bearer abc"),
            Err(AppError::Authentication(_))
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_basic("Basic !!!").is_err());
        // no separator
        let header = format!("Basic {}", Base64::encode_string(b"semdoispontos"));
        assert!(parse_basic(&header).is_err());
        let header = format!("Basic {}", Base64::encode_string(b":senha"));
        assert!(parse_basic(&header).is_err());
    }
}
