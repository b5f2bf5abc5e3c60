//! BGP NOTIFICATION messages ([RFC 4271] §4.5).
//!
//! [RFC 4271]: http://www.iana.org/go/rfc4271

use std::fmt;

use crate::{Error, ParseCursor};

/// A BGP NOTIFICATION message: the error that caused a session to be torn
/// down, plus whatever diagnostic data accompanied it.
#[derive(Clone, Debug)]
pub struct Notification {
    /// Major error code.
    pub major_err_code: u8,
    /// Minor error code, whose meaning depends on `major_err_code`.
    pub minor_err_code: u8,
    /// Optional diagnostic data.
    pub data: Vec<u8>,
}

impl Notification {
    pub(crate) fn parse(mut cur: ParseCursor, body_len: usize) -> Result<Notification, Error> {
        if body_len < 2 {
            return Err(Error::invalid(
                "NOTIFICATION body must carry at least the error code pair",
            ));
        }
        let major_err_code = cur.read_u8()?;
        let minor_err_code = cur.read_u8()?;
        let data = cur.rest().to_vec();

        Ok(Notification {
            major_err_code,
            minor_err_code,
            data,
        })
    }

    /// A human-readable description of `major_err_code`.
    pub fn major(&self) -> String {
        match self.major_err_code {
            1 => "Message Header Error".to_string(),
            2 => "OPEN Message Error".to_string(),
            3 => "UPDATE Message Error".to_string(),
            4 => "Hold Timer Expired".to_string(),
            5 => "Finite State Machine Error".to_string(),
            6 => "Cease".to_string(),
            _ => format!("Major Code {}", self.major_err_code),
        }
    }

    /// The minor error code, as a string (no IANA registry lookup is
    /// performed -- its meaning depends on `major_err_code`).
    pub fn minor(&self) -> String {
        format!("{}", self.minor_err_code)
    }

    /// The diagnostic data, decoded as UTF-8 if possible.
    pub fn message(&self) -> Option<String> {
        String::from_utf8(self.data.clone()).ok()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} / {} {}",
            self.major(),
            self.minor(),
            self.message().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_known_major_code() {
        let notification = Notification {
            major_err_code: 6,
            minor_err_code: 3,
            data: vec![],
        };
        assert_eq!(&notification.to_string(), "Cease / 3 ");

        let notification = Notification {
            major_err_code: 2,
            minor_err_code: 1,
            data: b"Unsupported Capability".to_vec(),
        };
        assert_eq!(
            &notification.to_string(),
            "OPEN Message Error / 1 Unsupported Capability"
        );
    }

    #[test]
    fn display_unknown_major_code() {
        let notification = Notification {
            major_err_code: 9,
            minor_err_code: 0,
            data: vec![],
        };
        assert_eq!(&notification.to_string(), "Major Code 9 / 0 ");
    }

    #[test]
    fn parse_rejects_short_body() {
        let cur = ParseCursor::new(&[6]);
        assert!(Notification::parse(cur, 1).is_err());
    }
}
