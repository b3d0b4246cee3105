//! Token carriers: the header or cookie a token travels in.

/// Scheme prefix on header values and on the stored cookie value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Where a token was found on a request.
///
/// API clients send `Authorization: Bearer <token>`; browsers send the
/// access cookie, whose value is stored as `Bearer <token>` too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCarrier<'a> {
    Header(&'a str),
    Cookie(&'a str),
}

impl<'a> TokenCarrier<'a> {
    /// The carrier value as received.
    pub fn raw(&self) -> &'a str {
        match *self {
            TokenCarrier::Header(value) | TokenCarrier::Cookie(value) => value,
        }
    }

    /// The bare token: one leading `Bearer ` stripped if present, `None` if
    /// nothing is left.
    pub fn extract(&self) -> Option<&'a str> {
        let raw = self.raw();
        let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw);
        (!token.is_empty()).then_some(token)
    }
}

/// The bare token from an optional carrier. `None` when no carrier was
/// sent or it holds nothing but the prefix.
pub fn extract_from_carrier<'a>(carrier: Option<TokenCarrier<'a>>) -> Option<&'a str> {
    carrier?.extract()
}

/// Format a token the way it is stored in the access cookie.
pub fn bearer_value(token: &str) -> String {
    format!("{BEARER_PREFIX}{token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bearer_prefix_from_header() {
        let carrier = TokenCarrier::Header("Bearer abc.def.ghi");
        assert_eq!(carrier.extract(), Some("abc.def.ghi"));
    }

    #[test]
    fn unprefixed_value_is_unchanged() {
        assert_eq!(TokenCarrier::Header("abc.def.ghi").extract(), Some("abc.def.ghi"));
        assert_eq!(TokenCarrier::Cookie("abc.def.ghi").extract(), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_value_round_trips_through_bearer_value() {
        let stored = bearer_value("abc.def.ghi");
        assert_eq!(stored, "Bearer abc.def.ghi");
        assert_eq!(TokenCarrier::Cookie(&stored).extract(), Some("abc.def.ghi"));
    }

    #[test]
    fn strips_exactly_one_prefix() {
        let carrier = TokenCarrier::Cookie("Bearer Bearer abc");
        assert_eq!(carrier.extract(), Some("Bearer abc"));
    }

    #[test]
    fn prefix_match_is_exact() {
        assert_eq!(TokenCarrier::Header("bearer abc").extract(), Some("bearer abc"));
        assert_eq!(TokenCarrier::Header("Bearerabc").extract(), Some("Bearerabc"));
    }

    #[test]
    fn empty_carrier_yields_nothing() {
        assert_eq!(TokenCarrier::Header("").extract(), None);
        assert_eq!(TokenCarrier::Cookie("Bearer ").extract(), None);
    }

    #[test]
    fn absent_carrier_yields_nothing() {
        assert_eq!(extract_from_carrier(None), None);
        assert_eq!(
            extract_from_carrier(Some(TokenCarrier::Header("Bearer t"))),
            Some("t")
        );
    }
}
