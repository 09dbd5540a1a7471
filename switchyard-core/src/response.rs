//! The response collaborator contract.

/// What the terminal request handler needs from a host response object.
///
/// Only the default fallbacks write to the response; the chain executor
/// passes it through untouched.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be answered by the default fallbacks",
    label = "missing `Response` implementation",
    note = "Implement `Response` for `{Self}`, or supply both `on_error` and `on_no_match`."
)]
pub trait Response: Send + 'static {
    /// Set the status code.
    fn set_status(&mut self, status: u16);

    /// Write the body and finish the response.
    fn send(&mut self, body: String);
}

#[cfg(feature = "http")]
impl<B: From<String> + Send + 'static> Response for http::Response<B> {
    fn set_status(&mut self, status: u16) {
        *self.status_mut() =
            http::StatusCode::from_u16(status).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn send(&mut self, body: String) {
        *self.body_mut() = B::from(body);
    }
}
