//! Secrecy capability and sensitive-data markers
//!
//! A type that can produce a masked form of itself implements [`Secret`].
//! Masked serialization is installed per type by implementing `Serialize`
//! through [`masked::serialize`], most easily with
//! [`impl_secret_serialize!`](crate::impl_secret_serialize). serde's own
//! forwarding impls then carry the masking through references, `Box`, `Arc`,
//! collections and `Option`, where `None` encodes as `null` without ever
//! calling [`Secret::secret`].
//!
//! The `Sensitive<T>` wrapper ensures that sensitive data (passwords,
//! tokens, API keys) is never accidentally logged, displayed or serialized.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Redaction marker used by [`Sensitive`]
pub const REDACTED: &str = "***REDACTED***";

/// Capability of a value to reveal only a masked form of itself
///
/// Implementing `Secret` does not change how a type serializes. Masking only
/// happens when `Serialize` is implemented through [`masked::serialize`],
/// either with [`impl_secret_serialize!`](crate::impl_secret_serialize) or a
/// `#[serde(serialize_with = "masked::serialize")]` field attribute. A type
/// that implements `Secret` and also derives `Serialize` writes its raw value.
///
/// ```
/// use ctxlog_core_types::{impl_secret_serialize, Secret};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Leaky(String);
///
/// impl Secret for Leaky {
///     fn secret(&self) -> String {
///         "***".to_string()
///     }
/// }
///
/// struct Card(String);
///
/// impl Secret for Card {
///     fn secret(&self) -> String {
///         "***".to_string()
///     }
/// }
///
/// impl_secret_serialize!(Card);
///
/// // Derived Serialize ignores the capability
/// assert_eq!(serde_json::to_string(&Leaky("4111".into())).unwrap(), r#""4111""#);
/// assert_eq!(serde_json::to_string(&Card("4111".into())).unwrap(), r#""***""#);
/// ```
pub trait Secret {
    /// The masked representation written in place of the real value
    fn secret(&self) -> String;
}

impl<T: Secret + ?Sized> Secret for &T {
    fn secret(&self) -> String {
        (**self).secret()
    }
}

impl<T: Secret + ?Sized> Secret for Box<T> {
    fn secret(&self) -> String {
        (**self).secret()
    }
}

impl<T: Secret + ?Sized> Secret for Arc<T> {
    fn secret(&self) -> String {
        (**self).secret()
    }
}

impl<T: Secret + ?Sized> Secret for Rc<T> {
    fn secret(&self) -> String {
        (**self).secret()
    }
}

/// serde helpers that encode a [`Secret`] through its masked form
///
/// ```
/// use ctxlog_core_types::{masked, Secret};
/// use serde::Serialize;
///
/// struct Token(String);
///
/// impl Secret for Token {
///     fn secret(&self) -> String {
///         "tok_***".to_string()
///     }
/// }
///
/// #[derive(Serialize)]
/// struct Login {
///     #[serde(serialize_with = "masked::serialize")]
///     token: Token,
///     #[serde(serialize_with = "masked::option::serialize")]
///     refresh: Option<Box<Token>>,
/// }
///
/// let login = Login { token: Token("abc".into()), refresh: None };
/// let json = serde_json::to_string(&login).unwrap();
/// assert_eq!(json, r#"{"token":"tok_***","refresh":null}"#);
/// ```
pub mod masked {
    use super::Secret;
    use serde::Serializer;

    /// Encode `value` as its masked string
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Secret + ?Sized,
        S: Serializer,
    {
        serializer.serialize_str(&value.secret())
    }

    pub mod option {
        use super::Secret;
        use serde::Serializer;

        /// Encode `None` as `null` and `Some` as the masked string
        pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
        where
            T: Secret,
            S: Serializer,
        {
            match value {
                Some(inner) => super::serialize(inner, serializer),
                None => serializer.serialize_none(),
            }
        }
    }
}

/// Implement `serde::Serialize` for a [`Secret`] type through its masked form
///
/// ```
/// use ctxlog_core_types::{impl_secret_serialize, Secret};
///
/// struct Phone(String);
///
/// impl Secret for Phone {
///     fn secret(&self) -> String {
///         format!("{}***", &self.0[..3])
///     }
/// }
///
/// impl_secret_serialize!(Phone);
///
/// assert_eq!(serde_json::to_string(&Phone("5551234".into())).unwrap(), r#""555***""#);
/// ```
#[macro_export]
macro_rules! impl_secret_serialize {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::__serde::Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
                where
                    S: $crate::__serde::Serializer,
                {
                    $crate::masked::serialize(self, serializer)
                }
            }
        )+
    };
}

/// Wrapper for sensitive data that redacts itself in Debug, Display and serialization
///
/// # Example
///
/// ```
/// use ctxlog_core_types::Sensitive;
///
/// let password = Sensitive::new("secret123");
/// println!("{:?}", password); // Prints: ***REDACTED***
/// println!("{}", password);   // Prints: ***REDACTED***
///
/// // Access the actual value when needed
/// assert_eq!(password.expose(), &"secret123");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying sensitive value
    ///
    /// Use this method sparingly and only when the sensitive data
    /// must be accessed (e.g., for authentication).
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Secret for Sensitive<T> {
    fn secret(&self) -> String {
        REDACTED.to_string()
    }
}

impl<T> serde::Serialize for Sensitive<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        masked::serialize(self, serializer)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::cell::Cell;

    #[test]
    fn test_sensitive_debug_redaction() {
        let secret = Sensitive::new("my-secret-password");
        let debug_str = format!("{:?}", secret);
        assert_eq!(debug_str, REDACTED);
        assert!(!debug_str.contains("my-secret-password"));
    }

    #[test]
    fn test_sensitive_display_redaction() {
        let secret = Sensitive::new("api-key-12345");
        let display_str = format!("{}", secret);
        assert_eq!(display_str, REDACTED);
        assert!(!display_str.contains("api-key"));
    }

    #[test]
    fn test_sensitive_serialize_redaction() {
        let json = serde_json::to_string(&Sensitive::new("hunter2")).unwrap();
        assert_eq!(json, format!("\"{}\"", REDACTED));
    }

    #[test]
    fn test_sensitive_expose() {
        let secret = Sensitive::new(42);
        assert_eq!(secret.expose(), &42);
    }

    #[test]
    fn test_sensitive_into_inner() {
        let secret = Sensitive::new(String::from("test"));
        let inner = secret.into_inner();
        assert_eq!(inner, "test");
    }

    #[test]
    fn test_sensitive_with_struct() {
        #[derive(Debug, Serialize)]
        #[allow(dead_code)]
        struct User {
            username: String,
            password: Sensitive<String>,
        }

        let user = User {
            username: "alice".to_string(),
            password: Sensitive::new("secret123".to_string()),
        };

        let debug_str = format!("{:?}", user);
        assert!(debug_str.contains("alice"));
        assert!(debug_str.contains(REDACTED));
        assert!(!debug_str.contains("secret123"));

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret123"));
    }

    struct Pin {
        digits: &'static str,
        revealed: Cell<u32>,
    }

    impl Secret for Pin {
        fn secret(&self) -> String {
            self.revealed.set(self.revealed.get() + 1);
            format!("{}**", &self.digits[..2])
        }
    }

    #[test]
    fn test_pointer_wrappers_forward_the_capability() {
        let pin = Pin {
            digits: "1234",
            revealed: Cell::new(0),
        };

        assert_eq!((&pin).secret(), "12**");
        assert_eq!(Box::new(&pin).secret(), "12**");
        assert_eq!(Rc::new(&pin).secret(), "12**");
        assert_eq!(pin.revealed.get(), 3);
    }

    #[test]
    fn test_masked_option_none_never_reveals() {
        #[derive(Serialize)]
        struct Holder<'a> {
            #[serde(serialize_with = "masked::option::serialize")]
            pin: Option<&'a Pin>,
        }

        let json = serde_json::to_string(&Holder { pin: None }).unwrap();
        assert_eq!(json, r#"{"pin":null}"#);

        let pin = Pin {
            digits: "9876",
            revealed: Cell::new(0),
        };
        let json = serde_json::to_string(&Holder { pin: Some(&pin) }).unwrap();
        assert_eq!(json, r#"{"pin":"98**"}"#);
        assert_eq!(pin.revealed.get(), 1);
    }
}
