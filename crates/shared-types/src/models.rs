use serde::{Deserialize, Serialize};

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct LoginRequest {
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Inserisci un'email valida"))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Password obbligatoria"))
    )]
    pub password: String,
}

/// Signed-in operator (safe to send to client).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    /// Backend auth user id (uuid).
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// Pure predicate over the cached session.
pub fn is_logged_in(user: Option<&AuthUser>) -> bool {
    user.is_some_and(|u| !u.id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_in_needs_a_user_id() {
        assert!(!is_logged_in(None));
        let blank = AuthUser {
            id: String::new(),
            email: "a@b.it".to_string(),
        };
        assert!(!is_logged_in(Some(&blank)));
        let user = AuthUser {
            id: "6a1c".to_string(),
            email: "segreteria@topdance.it".to_string(),
        };
        assert!(is_logged_in(Some(&user)));
    }

    #[test]
    fn auth_user_tolerates_missing_email() {
        let user: AuthUser = serde_json::from_str(r#"{"id":"6a1c"}"#).unwrap();
        assert_eq!(user.email, "");
    }

    #[cfg(feature = "validation")]
    #[test]
    fn login_request_validation() {
        use validator::Validate;
        let bad = LoginRequest {
            email: "nope".to_string(),
            password: String::new(),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
