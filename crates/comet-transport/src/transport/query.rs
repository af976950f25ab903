//! Canonical query-string construction.

use url::form_urlencoded;

/// Build the canonical query string shared by send and abort requests.
///
/// Produces `?transport=<name>&connectionToken=<urlEncodedToken>` followed by
/// the optional custom-query fragment, which must already include its own
/// leading separator. Send and abort use the same convention so server-side
/// routing matches both to the same logical session.
pub fn build(transport: &str, connection_token: &str, custom_query: &str) -> String {
    let encoded_token: String = form_urlencoded::byte_serialize(connection_token.as_bytes()).collect();
    format!("?transport={transport}&connectionToken={encoded_token}{custom_query}")
}

/// URL-encode a payload as the single `data` form field used by send.
///
/// Uses `application/x-www-form-urlencoded` rules, so spaces become `+`
/// rather than `%20`. Servers decode both spellings identically for form
/// bodies; only the bytes on the wire differ.
pub(crate) fn encode_data_body(data: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("data", data)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_fixed_order_query() {
        assert_eq!(
            build("sse", "tok123", "&x=1"),
            "?transport=sse&connectionToken=tok123&x=1"
        );
    }

    #[test]
    fn empty_custom_query_appends_nothing() {
        assert_eq!(
            build("longPolling", "tok123", ""),
            "?transport=longPolling&connectionToken=tok123"
        );
    }

    #[test]
    fn encodes_connection_token() {
        assert_eq!(
            build("sse", "a/b+c=", ""),
            "?transport=sse&connectionToken=a%2Fb%2Bc%3D"
        );
    }

    #[test]
    fn encodes_data_body() {
        assert_eq!(encode_data_body("hello world&more"), "data=hello+world%26more");
    }
}
