//! The request collaborator contract.

use crate::params::Params;

/// What the router needs from a host request object.
///
/// The router reads the method and path to select layers and, when a
/// router is built with `attach_params`, writes matched parameters through
/// [`Request::params_mut`]. Nothing else about the request is touched.
///
/// # Example
///
/// ```rust
/// use switchyard_core::{Params, Request};
///
/// struct Incoming {
///     method: String,
///     url: String,
///     params: Params,
/// }
///
/// impl Request for Incoming {
///     fn method(&self) -> &str {
///         &self.method
///     }
///
///     fn path(&self) -> &str {
///         self.url.split('?').next().unwrap_or("/")
///     }
///
///     fn params_mut(&mut self) -> Option<&mut Params> {
///         Some(&mut self.params)
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be routed",
    label = "missing `Request` implementation",
    note = "Implement `Request` to expose the method and path of `{Self}`."
)]
pub trait Request: Send + 'static {
    /// The request method token, e.g. `"GET"`.
    fn method(&self) -> &str;

    /// The request path, without query string. Compared byte-for-byte.
    fn path(&self) -> &str;

    /// The mutable parameter map, if the host request carries one.
    fn params_mut(&mut self) -> Option<&mut Params> {
        None
    }
}

#[cfg(feature = "http")]
impl<B: Send + 'static> Request for http::Request<B> {
    fn method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn params_mut(&mut self) -> Option<&mut Params> {
        if self.extensions().get::<Params>().is_none() {
            self.extensions_mut().insert(Params::new());
        }
        self.extensions_mut().get_mut::<Params>()
    }
}
